//! Typed views of the storefront's JSON resources
//!
//! Only the fields the walkthroughs read are modelled; everything else in
//! a response is ignored. Collections default to empty so a partially
//! populated order (before delivery, say) still parses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the storefront's checkout state machine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckoutState {
    /// Items are being added
    Cart,
    /// Waiting for billing/shipping addresses
    Address,
    /// Waiting for a shipping rate selection
    Delivery,
    /// Waiting for payment details
    Payment,
    /// Waiting for the customer to confirm
    Confirm,
    /// Order placed
    Complete,
    /// Any state this client does not know about
    Other(String),
}

impl CheckoutState {
    /// Wire name of the state
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cart => "cart",
            Self::Address => "address",
            Self::Delivery => "delivery",
            Self::Payment => "payment",
            Self::Confirm => "confirm",
            Self::Complete => "complete",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for CheckoutState {
    fn from(name: String) -> Self {
        match name.as_str() {
            "cart" => Self::Cart,
            "address" => Self::Address,
            "delivery" => Self::Delivery,
            "payment" => Self::Payment,
            "confirm" => Self::Confirm,
            "complete" => Self::Complete,
            _ => Self::Other(name),
        }
    }
}

impl From<CheckoutState> for String {
    fn from(state: CheckoutState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order, as returned by `/api/orders` and `/api/checkouts`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Public order number (`R123456789`), used in every checkout path
    pub number: String,
    /// Customer email; new API orders get a placeholder address
    #[serde(default)]
    pub email: Option<String>,
    /// Current checkout stage
    pub state: CheckoutState,
    /// Shipments, populated once an address is known
    #[serde(default)]
    pub shipments: Vec<Shipment>,
    /// Payment methods available to this order
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
}

impl Order {
    /// First payment method with exactly this name
    #[must_use]
    pub fn payment_method_named(&self, name: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|method| method.name == name)
    }

    /// The first shipment and its first shipping rate
    #[must_use]
    pub fn first_shipping_choice(&self) -> Option<(&Shipment, &ShippingRate)> {
        let shipment = self.shipments.first()?;
        let rate = shipment.shipping_rates.first()?;
        Some((shipment, rate))
    }
}

/// A shipment on an order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Shipment id
    pub id: u64,
    /// Rates the customer may choose from
    #[serde(default)]
    pub shipping_rates: Vec<ShippingRate>,
}

/// A priced shipping option
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    /// Rate id
    pub id: u64,
    /// Display name, e.g. `UPS Ground`
    #[serde(default)]
    pub name: Option<String>,
}

/// A payment method configured on the store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Payment method id
    pub id: u64,
    /// Display name, e.g. `Credit Card`
    pub name: String,
}

/// A country
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Country id
    pub id: u64,
    /// Display name
    pub name: String,
    /// ISO 3166-1 alpha-2 code
    #[serde(default)]
    pub iso: Option<String>,
}

/// Body of `GET /api/countries`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CountryList {
    /// Matching countries
    #[serde(default)]
    pub countries: Vec<Country>,
}

/// A state or province within a country
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Postal abbreviation
    #[serde(default)]
    pub abbr: Option<String>,
}

/// Body of `GET /api/countries/{id}/states`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegionList {
    /// Matching regions
    #[serde(default)]
    pub states: Vec<Region>,
}

/// Address attributes submitted for billing and shipping
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// First address line
    pub address1: String,
    /// Second address line
    pub address2: String,
    /// City
    pub city: String,
    /// Postal code
    pub zipcode: String,
    /// Phone number
    pub phone: String,
    /// Country id from `/api/countries`
    pub country_id: u64,
    /// Region id from `/api/countries/{id}/states`
    pub state_id: u64,
}

/// An image attached to a product
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProductImage {
    /// Image id
    pub id: u64,
}
