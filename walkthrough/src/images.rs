//! Product image walkthrough
//!
//! Uploads an image to a product and deletes it again. Unlike the checkout
//! walkthrough there is nothing to carry on with after a failure, so any
//! unexpected status ends the run with an error.

use crate::error::WalkthroughError;
use crate::models::ProductImage;
use crate::report::Reporter;
use std::fmt;
use storefront_client::{ApiRequest, FileUpload, StorefrontClient};

/// Multipart field the storefront reads the image from
pub const ATTACHMENT_FIELD: &str = "image[attachment]";

/// Steps of the image walkthrough
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStep {
    /// `POST /api/products/{id}/images`
    Upload,
    /// `DELETE /api/products/{id}/images/{image_id}`
    Delete,
}

impl fmt::Display for ImageStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => f.write_str("upload image"),
            Self::Delete => f.write_str("delete image"),
        }
    }
}

/// Uploads then deletes a product image
pub struct ImageWalkthrough<'a> {
    client: &'a StorefrontClient,
    reporter: &'a dyn Reporter,
    product_id: u64,
    upload: FileUpload,
}

impl<'a> ImageWalkthrough<'a> {
    /// Create a walkthrough for `product_id` uploading `upload`
    #[must_use]
    pub fn new(
        client: &'a StorefrontClient,
        reporter: &'a dyn Reporter,
        product_id: u64,
        upload: FileUpload,
    ) -> Self {
        Self {
            client,
            reporter,
            product_id,
            upload,
        }
    }

    /// Upload the image, then delete it
    ///
    /// Returns the image that was created and removed.
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError::UnexpectedStatus` if the upload does not
    /// answer 201 or the delete does not answer 204, and
    /// `WalkthroughError::Client` on transport or decoding failures.
    pub async fn run(&self) -> Result<ProductImage, WalkthroughError> {
        let base = format!("/api/products/{}/images", self.product_id);

        let mut upload = self.upload.clone();
        upload.field = ATTACHMENT_FIELD.to_string();

        let created = self
            .client
            .send(ApiRequest::post(base.as_str()).multipart(upload))
            .await?;
        if !created.is(201) {
            self.reporter.failed(&format!(
                "Could not create an image for a product ({})",
                created.status()
            ));
            return Err(unexpected(ImageStep::Upload, 201, created.status()));
        }
        self.reporter.succeeded("Created an image for a product.");

        let image: ProductImage = created.json()?;
        tracing::debug!(product_id = self.product_id, image_id = image.id, "image uploaded");

        let deleted = self
            .client
            .send(ApiRequest::delete(format!("{base}/{}", image.id)))
            .await?;
        if !deleted.is(204) {
            self.reporter.failed(&format!(
                "Could not delete the image we just created ({})",
                deleted.status()
            ));
            return Err(unexpected(ImageStep::Delete, 204, deleted.status()));
        }
        self.reporter.succeeded("Deleted the image we just created.");

        Ok(image)
    }
}

fn unexpected(step: ImageStep, expected: u16, actual: u16) -> WalkthroughError {
    WalkthroughError::UnexpectedStatus {
        step: step.to_string(),
        expected,
        actual,
    }
}
