//! Raw API responses

use crate::error::ClientError;
use serde::de::DeserializeOwned;

/// Status code and body of a completed request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    /// Create a response from its parts
    #[must_use]
    pub const fn new(status: u16, body: String) -> Self {
        Self { status, body }
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Raw body text
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the status equals `expected`
    #[must_use]
    pub const fn is(&self, expected: u16) -> bool {
        self.status == expected
    }

    /// Parse the body into a typed value
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if the body is not valid JSON for `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(|source| ClientError::Decode {
            status: self.status,
            source,
        })
    }

    /// Parse the body into an untyped JSON value
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if the body is not valid JSON
    pub fn json_value(&self) -> Result<serde_json::Value, ClientError> {
        self.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Image {
        id: u64,
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_typed_parse() {
        let response = ApiResponse::new(201, r#"{"id": 7, "position": 1}"#.to_string());
        assert!(response.is(201));
        assert_eq!(response.json::<Image>().unwrap(), Image { id: 7 });
    }

    #[test]
    fn test_decode_error_keeps_status() {
        let response = ApiResponse::new(500, "<html>oops</html>".to_string());
        match response.json::<Image>() {
            Err(ClientError::Decode { status, .. }) => assert_eq!(status, 500),
            other => unreachable!("expected decode error, got {other:?}"),
        }
    }
}
