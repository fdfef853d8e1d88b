//! Error types for the storefront API client

use thiserror::Error;

/// Errors that can occur when talking to the storefront API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL could not be parsed
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// The request never produced a response (connection refused, DNS, ...)
    #[error("Request to {path} failed: {source}")]
    Transport {
        /// Request path relative to the base URL
        path: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be parsed into the requested type
    #[error("Could not decode response body (status {status}): {source}")]
    Decode {
        /// HTTP status of the response
        status: u16,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// A file to upload could not be read
    #[error("Could not read upload {path}: {source}")]
    Upload {
        /// Path of the file
        path: String,
        /// I/O error
        #[source]
        source: std::io::Error,
    },
}
