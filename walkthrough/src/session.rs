//! Session state threaded through the checkout steps

use crate::models::{Address, Order};

/// What the walkthrough knows about the order so far
///
/// Each step consumes the session and hands back a new one; an updated
/// order from the server replaces the previous one wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Latest representation of the order
    pub order: Order,
    /// Address submitted for billing and shipping, once resolved
    pub address: Option<Address>,
}

impl Session {
    /// Start a session from a freshly fetched order
    #[must_use]
    pub const fn new(order: Order) -> Self {
        Self {
            order,
            address: None,
        }
    }

    /// Replace the order with a newer representation
    #[must_use]
    pub fn with_order(self, order: Order) -> Self {
        Self { order, ..self }
    }

    /// Record the address used for the order
    #[must_use]
    pub fn with_address(self, address: Address) -> Self {
        Self {
            address: Some(address),
            ..self
        }
    }

    /// Order number used in checkout paths
    #[must_use]
    pub fn number(&self) -> &str {
        &self.order.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckoutState;

    fn order(state: CheckoutState) -> Order {
        Order {
            number: "R100".to_string(),
            email: Some("spree@example.com".to_string()),
            state,
            shipments: vec![],
            payment_methods: vec![],
        }
    }

    #[test]
    fn test_order_is_replaced_wholesale() {
        let session = Session::new(order(CheckoutState::Address));
        let session = session.with_order(order(CheckoutState::Delivery));

        assert_eq!(session.order.state, CheckoutState::Delivery);
        assert_eq!(session.number(), "R100");
        assert!(session.address.is_none());
    }

    #[test]
    fn test_address_survives_order_updates() {
        let address = Address {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            address1: "Unit 1".to_string(),
            address2: "1 Test Lane".to_string(),
            city: "Bethesda".to_string(),
            zipcode: "20814".to_string(),
            phone: "(555) 555-5555".to_string(),
            country_id: 232,
            state_id: 3561,
        };

        let session = Session::new(order(CheckoutState::Address))
            .with_address(address.clone())
            .with_order(order(CheckoutState::Payment));

        assert_eq!(session.address, Some(address));
    }
}
