//! Uploads an image to a product and deletes it again.
//!
//! ## Usage
//!
//! ```bash
//! export PRODUCT_ID=1
//! export PRODUCT_IMAGE_PATH="demos/walkthroughs/assets/thinking-cat.jpg"
//! cargo run -p walkthrough-demos --bin product-image
//! ```
//!
//! Exits with status 1 if either request gets an unexpected status.

use std::process::ExitCode;
use storefront_client::{FileUpload, StorefrontClient};
use storefront_walkthrough::images::ATTACHMENT_FIELD;
use storefront_walkthrough::{ConsoleReporter, ImageWalkthrough, WalkthroughError};
use walkthrough_demos::{id_from_env, path_from_env, DEFAULT_IMAGE};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    walkthrough_demos::init();

    let client = StorefrontClient::from_env()?;
    let reporter = ConsoleReporter::new();

    let product_id = id_from_env("PRODUCT_ID", 1);
    let image_path = path_from_env("PRODUCT_IMAGE_PATH", DEFAULT_IMAGE);
    let upload = FileUpload::from_path(ATTACHMENT_FIELD, &image_path).await?;

    match ImageWalkthrough::new(&client, &reporter, product_id, upload).run().await {
        Ok(image) => {
            tracing::info!(product_id, image_id = image.id, "image walkthrough finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(WalkthroughError::UnexpectedStatus { .. }) => Ok(ExitCode::FAILURE),
        Err(error) => Err(error.into()),
    }
}
