//! # Storefront Walkthroughs
//!
//! Scripted walkthroughs of a Spree storefront's REST API.
//!
//! Each walkthrough is a fixed, linear sequence of requests. Every step
//! checks the status it needs, parses the response into a typed model,
//! reports the outcome through a [`Reporter`], and hands what it learned to
//! the next step.
//!
//! ## Walkthroughs
//!
//! - [`checkout`]: take a new order from creation to `complete`
//! - [`images`]: upload an image to a product and delete it again
//!
//! ## Example
//!
//! ```no_run
//! use storefront_client::StorefrontClient;
//! use storefront_walkthrough::{CheckoutPlan, CheckoutWalkthrough, ConsoleReporter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StorefrontClient::from_env()?;
//! let reporter = ConsoleReporter::new();
//!
//! let report = CheckoutWalkthrough::new(&client, &reporter, CheckoutPlan::default())
//!     .run()
//!     .await?;
//!
//! assert!(report.all_succeeded());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checkout;
pub mod error;
pub mod gateway;
pub mod images;
pub mod models;
pub mod payment;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use checkout::{
    AddressTemplate, CheckoutPlan, CheckoutStep, CheckoutWalkthrough, StepOutcome, StepRecord,
    WalkthroughReport,
};
pub use error::{GatewayError, WalkthroughError};
pub use gateway::{BraintreeConfig, BraintreeGateway};
pub use images::{ImageStep, ImageWalkthrough};
pub use models::{CheckoutState, Order};
pub use payment::{
    CardDetails, CardHolder, GatewayProfile, PaymentGateway, PaymentPlan, PaymentSource, VaultCard,
};
pub use report::{ConsoleReporter, Reporter};
pub use session::Session;
