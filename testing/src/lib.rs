//! # Storefront Testing
//!
//! Testing utilities for the storefront walkthroughs.
//!
//! This crate provides:
//! - [`MockStorefront`]: a wiremock server with canned checkout and image endpoints
//! - [`RecordingReporter`]: captures reported lines for assertions
//! - [`FixedGateway`]: deterministic payment gateway
//! - [`fixtures`]: canned JSON bodies
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{CheckoutScenario, MockStorefront, RecordingReporter};
//! use storefront_walkthrough::{CheckoutPlan, CheckoutWalkthrough};
//!
//! #[tokio::test]
//! async fn test_checkout() {
//!     let storefront = MockStorefront::start().await;
//!     storefront.mount_checkout(&CheckoutScenario::default()).await;
//!
//!     let client = storefront.client();
//!     let reporter = RecordingReporter::new();
//!     let report = CheckoutWalkthrough::new(&client, &reporter, CheckoutPlan::default())
//!         .run()
//!         .await
//!         .unwrap();
//!
//!     assert!(report.all_succeeded());
//! }
//! ```

pub mod fixtures;
pub mod mocks;
pub mod storefront;

// Re-export commonly used items
pub use mocks::{FixedGateway, RecordingReporter, ReportKind, ReportLine};
pub use storefront::{CheckoutScenario, ImageScenario, MockStorefront, TEST_TOKEN};

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_walkthrough::Reporter;

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.succeeded("one");
        reporter.pending("two");
        reporter.failed("three");

        let kinds: Vec<ReportKind> = reporter.lines().iter().map(|line| line.kind).collect();
        assert_eq!(kinds, vec![ReportKind::Success, ReportKind::Pending, ReportKind::Failure]);
        assert_eq!(reporter.messages(ReportKind::Failure), vec!["three".to_string()]);
    }

    #[tokio::test]
    async fn test_fixed_gateway_counts_calls() {
        use storefront_walkthrough::{CardHolder, PaymentGateway, VaultCard};

        let gateway = FixedGateway::new("cust", "tok");
        let profile = gateway
            .vault_card(&CardHolder::default(), &VaultCard::test_visa())
            .await;

        assert!(profile.is_ok_and(|p| p.payment_profile_id == "tok"));
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn test_order_fixture_has_shipments_after_address() {
        let cart = fixtures::order("R1", None, "cart", &[]);
        let delivery = fixtures::order("R1", None, "delivery", &[(1, "Credit Card")]);

        assert_eq!(cart["shipments"].as_array().map(Vec::len), Some(0));
        assert_eq!(delivery["shipments"][0]["shipping_rates"][0]["id"], fixtures::SHIPPING_RATE_ID);
        assert_eq!(delivery["payment_methods"][0]["name"], "Credit Card");
    }

    #[test]
    fn test_scenario_can_withhold_shipping() {
        let scenario = CheckoutScenario {
            offers_shipping: false,
            ..CheckoutScenario::default()
        };

        let delivery = scenario.order("delivery");
        assert_eq!(delivery["shipments"].as_array().map(Vec::len), Some(0));
        assert_eq!(delivery["state"], "delivery");
    }
}
