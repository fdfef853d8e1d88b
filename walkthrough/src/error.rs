//! Error types for the walkthroughs and the payment gateway

use std::path::PathBuf;
use storefront_client::ClientError;
use thiserror::Error;

/// Errors that stop a walkthrough
///
/// Steps that fail against the storefront are normally reported and
/// recorded rather than raised; these are the conditions a caller has to
/// handle itself.
#[derive(Debug, Error)]
pub enum WalkthroughError {
    /// The storefront could not be reached
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A step got a status other than the one it needs to proceed
    #[error("{step}: expected status {expected}, got {actual}")]
    UnexpectedStatus {
        /// Step name
        step: String,
        /// Status the step needed
        expected: u16,
        /// Status actually returned
        actual: u16,
    },

    /// A required configuration file does not exist
    #[error("{} does not exist", .0.display())]
    MissingConfig(PathBuf),

    /// A configuration file exists but could not be read or parsed
    #[error("Invalid configuration in {path}: {message}")]
    InvalidConfig {
        /// File that was read
        path: PathBuf,
        /// Reader or parser message
        message: String,
    },

    /// The payment gateway refused a request
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors raised by a payment gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway could not be reached
    #[error("Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-success status
    #[error("Gateway error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The gateway processed the request but rejected it
    #[error("Gateway rejected the request: {0}")]
    Rejected(String),

    /// The gateway response did not have the expected shape
    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}
