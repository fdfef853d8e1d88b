//! # Storefront API Client
//!
//! A thin HTTP wrapper around a Spree storefront's REST API. It knows the
//! base URL and the API token, and nothing about checkout rules: every call
//! returns the raw status code and body so the caller can decide what
//! counts as success.
//!
//! ## Example
//!
//! ```no_run
//! use storefront_client::{ApiRequest, ClientConfig, StorefrontClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // STOREFRONT_URL / STOREFRONT_API_KEY from the environment
//!     let client = StorefrontClient::new(ClientConfig::from_env()?);
//!
//!     let response = client
//!         .send(ApiRequest::get("/api/countries").query("q[name_cont]", "United States"))
//!         .await?;
//!
//!     println!("{} {}", response.status(), response.body());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - GET/POST/PUT/DELETE with JSON bodies and query parameters
//! - Multipart file uploads
//! - Token authentication attached to every request
//! - No retries and no timeouts: a failure is reported once, as it happened

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;

// Re-export main types for convenience
pub use client::StorefrontClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use request::{ApiRequest, FileUpload, RequestBody};
pub use response::ApiResponse;
