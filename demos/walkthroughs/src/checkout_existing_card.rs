//! Checkout walkthrough paying with a card vaulted in Braintree.
//!
//! The card is registered with Braintree first; the storefront then
//! receives only the customer and payment profile ids.
//!
//! ## Usage
//!
//! Copy `braintree.yml.example` to `braintree.yml` and fill in sandbox
//! credentials (or point `BRAINTREE_CONFIG` at another file), then:
//!
//! ```bash
//! cargo run -p walkthrough-demos --bin checkout-existing-card
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use storefront_client::StorefrontClient;
use storefront_walkthrough::{
    BraintreeConfig, BraintreeGateway, CheckoutPlan, CheckoutWalkthrough, ConsoleReporter,
    PaymentPlan, Reporter, WalkthroughError,
};
use walkthrough_demos::{path_from_env, DEFAULT_BRAINTREE_CONFIG};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    walkthrough_demos::init();

    let reporter = ConsoleReporter::new();
    let config_path = path_from_env("BRAINTREE_CONFIG", DEFAULT_BRAINTREE_CONFIG);

    let config = match BraintreeConfig::load(&config_path) {
        Ok(config) => config,
        Err(WalkthroughError::MissingConfig(path)) => {
            reporter.pending(&format!("{} does not exist. Cannot proceed.", path.display()));
            return Ok(ExitCode::SUCCESS);
        }
        Err(error) => return Err(error.into()),
    };

    let client = StorefrontClient::from_env()?;
    tracing::info!(
        base_url = %client.config().base_url(),
        ?config,
        "starting checkout walkthrough"
    );

    let gateway = Arc::new(BraintreeGateway::new(config));
    let plan = CheckoutPlan::with_payment(PaymentPlan::gateway(gateway));
    let report = CheckoutWalkthrough::new(&client, &reporter, plan).run().await?;

    Ok(walkthrough_demos::checkout_exit_code(&report))
}
