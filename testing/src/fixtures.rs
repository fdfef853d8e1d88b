//! Canned storefront JSON bodies
//!
//! Shapes follow the storefront API's own responses, trimmed to the fields
//! the walkthroughs read plus a few they ignore.

use serde_json::{json, Value};

/// Shipment id used by canned orders
pub const SHIPMENT_ID: u64 = 1;

/// Shipping rate id used by canned orders
pub const SHIPPING_RATE_ID: u64 = 1;

/// An order in `state`
///
/// Orders past `address` carry one shipment with one rate; every order
/// lists the given payment methods as `(id, name)`.
#[must_use]
pub fn order(
    number: &str,
    email: Option<&str>,
    state: &str,
    payment_methods: &[(u64, &str)],
) -> Value {
    let shipments = if matches!(state, "cart" | "address") {
        json!([])
    } else {
        json!([{
            "id": SHIPMENT_ID,
            "number": "H12345678901",
            "shipping_rates": [
                {
                    "id": SHIPPING_RATE_ID,
                    "name": "UPS Ground (USD)",
                    "cost": "5.0",
                    "selected": true
                }
            ]
        }])
    };

    let methods: Vec<Value> = payment_methods
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name, "method_type": "gateway"}))
        .collect();

    json!({
        "id": 1,
        "number": number,
        "item_total": "19.99",
        "total": "24.99",
        "email": email,
        "state": state,
        "shipments": shipments,
        "payment_methods": methods,
    })
}

/// Body of a country lookup
#[must_use]
pub fn countries(countries: &[(u64, &str)]) -> Value {
    let countries: Vec<Value> = countries
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name, "iso": "US", "iso3": "USA"}))
        .collect();
    let count = countries.len();
    json!({"countries": countries, "count": count, "current_page": 1, "pages": 1})
}

/// Body of a state lookup
#[must_use]
pub fn states(states: &[(u64, &str)]) -> Value {
    let states: Vec<Value> = states
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name, "abbr": "MD", "country_id": 232}))
        .collect();
    json!({"states": states})
}

/// A created line item
#[must_use]
pub fn line_item(variant_id: u64, quantity: u32) -> Value {
    json!({"id": 1, "quantity": quantity, "price": "19.99", "variant_id": variant_id})
}

/// A created product image
#[must_use]
pub fn image(id: u64) -> Value {
    json!({
        "id": id,
        "position": 1,
        "attachment_content_type": "image/jpeg",
        "attachment_file_name": "thinking-cat.jpg",
        "type": "Spree::Image",
    })
}
