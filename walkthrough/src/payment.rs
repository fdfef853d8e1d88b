//! Payment sources attached during the payment step
//!
//! The storefront accepts either raw card fields (handled by its own
//! gateway) or a customer/payment profile pair that was vaulted with an
//! external gateway beforehand. [`PaymentGateway`] is the seam for the
//! latter.

use crate::error::GatewayError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Name of the store's built-in card payment method
pub const CREDIT_CARD_METHOD: &str = "Credit Card";

/// Name of the Braintree payment method
pub const BRAINTREE_METHOD: &str = "Braintree";

/// Raw card fields sent straight to the storefront
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CardDetails {
    /// Card number
    pub number: String,
    /// Expiry month
    pub month: String,
    /// Expiry year
    pub year: String,
    /// CVV
    pub verification_value: String,
    /// Name on the card
    pub name: String,
}

impl CardDetails {
    /// Card accepted by the storefront's dummy credit card gateway
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            number: "1".to_string(),
            month: "1".to_string(),
            year: "2017".to_string(),
            verification_value: "123".to_string(),
            name: "John Smith".to_string(),
        }
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"****")
            .field("month", &self.month)
            .field("year", &self.year)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Card holder registered as a gateway customer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardHolder {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl Default for CardHolder {
    fn default() -> Self {
        Self {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }
}

/// Card stored in the gateway's vault
#[derive(Clone, PartialEq, Eq)]
pub struct VaultCard {
    /// Card number
    pub number: String,
    /// Two-digit expiry month
    pub expiration_month: String,
    /// Four-digit expiry year
    pub expiration_year: String,
}

impl VaultCard {
    /// Gateway sandbox test Visa
    #[must_use]
    pub fn test_visa() -> Self {
        Self {
            number: "4111111111111111".to_string(),
            expiration_month: "05".to_string(),
            expiration_year: "2030".to_string(),
        }
    }
}

impl fmt::Debug for VaultCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultCard")
            .field("number", &"****")
            .field("expiration_month", &self.expiration_month)
            .field("expiration_year", &self.expiration_year)
            .finish()
    }
}

/// Tokenised card: the ids the storefront needs to charge a vaulted card
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayProfile {
    /// Gateway customer id
    pub customer_profile_id: String,
    /// Gateway payment method token
    pub payment_profile_id: String,
}

/// Gateway future type
pub type GatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GatewayProfile, GatewayError>> + Send + 'a>>;

/// External payment gateway able to vault a card for a new customer
pub trait PaymentGateway: Send + Sync {
    /// Register `holder` as a customer and vault `card` for them
    ///
    /// # Errors
    ///
    /// Returns error if the gateway is unreachable or refuses the card
    fn vault_card(&self, holder: &CardHolder, card: &VaultCard) -> GatewayFuture<'_>;
}

/// How the payment step pays for the order
#[derive(Clone)]
pub enum PaymentPlan {
    /// Send raw card fields to the store's `Credit Card` method
    Card(CardDetails),
    /// Vault a card with the gateway and send the resulting profile to the
    /// store's `Braintree` method
    Gateway {
        /// Gateway used to vault the card
        gateway: Arc<dyn PaymentGateway>,
        /// Customer to create
        holder: CardHolder,
        /// Card to vault
        card: VaultCard,
    },
}

impl PaymentPlan {
    /// Pay with the dummy card
    #[must_use]
    pub fn dummy_card() -> Self {
        Self::Card(CardDetails::dummy())
    }

    /// Vault the sandbox test card for a test customer through `gateway`
    #[must_use]
    pub fn gateway(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self::Gateway {
            gateway,
            holder: CardHolder::default(),
            card: VaultCard::test_visa(),
        }
    }

    /// Name of the storefront payment method this plan uses
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::Card(_) => CREDIT_CARD_METHOD,
            Self::Gateway { .. } => BRAINTREE_METHOD,
        }
    }

    /// Produce the payment source, vaulting the card if needed
    ///
    /// # Errors
    ///
    /// Returns the gateway's error when vaulting fails
    pub async fn source(&self) -> Result<PaymentSource, GatewayError> {
        match self {
            Self::Card(card) => Ok(PaymentSource::Card(card.clone())),
            Self::Gateway {
                gateway,
                holder,
                card,
            } => Ok(PaymentSource::Profile(gateway.vault_card(holder, card).await?)),
        }
    }
}

impl fmt::Debug for PaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card(card) => f.debug_tuple("Card").field(card).finish(),
            Self::Gateway { holder, card, .. } => f
                .debug_struct("Gateway")
                .field("holder", holder)
                .field("card", card)
                .finish_non_exhaustive(),
        }
    }
}

/// Credentials attached to the order's payment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentSource {
    /// Raw card fields
    Card(CardDetails),
    /// Vaulted gateway profile
    Profile(GatewayProfile),
}

impl PaymentSource {
    /// Checkout update body selecting `method_id` and attaching this source
    ///
    /// The two shapes differ the way the storefront's checkout controller
    /// expects them: card fields ride inside `order` next to a single
    /// `payments_attributes` hash, profiles go in a top-level
    /// `payment_source` next to a list of payments.
    #[must_use]
    pub fn checkout_payload(&self, method_id: u64) -> Value {
        let key = method_id.to_string();
        match self {
            Self::Card(card) => {
                let mut source = Map::new();
                source.insert(key, json!(card));
                json!({
                    "order": {
                        "payments_attributes": {"payment_method_id": method_id},
                        "payment_source": source,
                    }
                })
            }
            Self::Profile(profile) => {
                let mut source = Map::new();
                source.insert(
                    key,
                    json!({
                        "gateway_customer_profile_id": profile.customer_profile_id,
                        "gateway_payment_profile_id": profile.payment_profile_id,
                    }),
                );
                json!({
                    "order": {
                        "payments_attributes": [{"payment_method_id": method_id}],
                    },
                    "payment_source": source,
                })
            }
        }
    }
}
