//! Checkout walkthrough paying with the store's dummy credit card gateway.
//!
//! ## Usage
//!
//! ```bash
//! export STOREFRONT_URL="http://localhost:3000"
//! export STOREFRONT_API_KEY="your-api-key"
//! cargo run -p walkthrough-demos --bin checkout-walkthrough
//! ```

use std::process::ExitCode;
use storefront_client::StorefrontClient;
use storefront_walkthrough::{CheckoutPlan, CheckoutWalkthrough, ConsoleReporter, PaymentPlan};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    walkthrough_demos::init();

    let client = StorefrontClient::from_env()?;
    let reporter = ConsoleReporter::new();
    tracing::info!(base_url = %client.config().base_url(), "starting checkout walkthrough");

    let plan = CheckoutPlan::with_payment(PaymentPlan::dummy_card());
    let report = CheckoutWalkthrough::new(&client, &reporter, plan).run().await?;

    Ok(walkthrough_demos::checkout_exit_code(&report))
}
