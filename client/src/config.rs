//! Client configuration.
//!
//! Loaded from environment variables with sensible defaults for a local
//! Spree sandbox.

use crate::error::ClientError;
use reqwest::Url;
use std::env;

/// Default storefront location (a local `rails server`)
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "X-Spree-Token";

/// Where and how to reach the storefront API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    api_key: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the given base URL, without a token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: parsed,
            api_key: None,
        })
    }

    /// Builder: attach an API token sent with every request
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Load configuration from `STOREFRONT_URL` and `STOREFRONT_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `STOREFRONT_URL` is set to
    /// something that is not a URL.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = read("STOREFRONT_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let config = Self::new(&base_url)?;

        Ok(match read("STOREFRONT_API_KEY") {
            Some(key) => config.with_api_key(key),
            None => config,
        })
    }

    /// Base URL every request path is appended to
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// API token, if one is configured
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Absolute URL for a path such as `/api/orders`.
    ///
    /// A path prefix on the base URL (`https://shop.example/store`) is kept.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.endpoint("/api/orders"), "http://localhost:3000/api/orders");
        assert_eq!(config.api_key(), None);
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_reads_url_and_key() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("STOREFRONT_URL", "https://shop.example/store/"),
            ("STOREFRONT_API_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(
            config.endpoint("/api/checkouts/R1/next"),
            "https://shop.example/store/api/checkouts/R1/next"
        );
        assert_eq!(config.api_key(), Some("secret"));
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_blank_key_is_ignored() {
        let config =
            ClientConfig::from_lookup(lookup(&[("STOREFRONT_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://shop.example"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_relative_path_gets_a_separator() {
        let config = ClientConfig::new("http://localhost:3000").unwrap();
        assert_eq!(config.endpoint("api/orders"), "http://localhost:3000/api/orders");
    }
}
