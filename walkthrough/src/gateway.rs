//! Braintree payment gateway
//!
//! Vaults a card through Braintree's GraphQL API so the storefront can
//! charge it by profile id. Credentials come from a `braintree.yml` file:
//!
//! ```yaml
//! environment: sandbox
//! merchant_id: your_merchant_id
//! public_key: your_public_key
//! private_key: your_private_key
//! ```

use crate::error::{GatewayError, WalkthroughError};
use crate::payment::{CardHolder, GatewayFuture, GatewayProfile, PaymentGateway, VaultCard};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;

/// API version pinned in every request
const BRAINTREE_VERSION: &str = "2019-01-01";

const CREATE_CUSTOMER: &str = "mutation CreateCustomer($input: CreateCustomerInput!) { \
     createCustomer(input: $input) { customer { id legacyId } } }";

const TOKENIZE_CARD: &str = "mutation TokenizeCreditCard($input: TokenizeCreditCardInput!) { \
     tokenizeCreditCard(input: $input) { paymentMethod { id } } }";

const VAULT_PAYMENT_METHOD: &str =
    "mutation VaultPaymentMethod($input: VaultPaymentMethodInput!) { \
     vaultPaymentMethod(input: $input) { paymentMethod { id legacyId } } }";

/// Braintree environment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BraintreeEnvironment {
    /// Test accounts
    Sandbox,
    /// Live accounts
    Production,
}

impl BraintreeEnvironment {
    /// GraphQL endpoint for the environment
    #[must_use]
    pub const fn graphql_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://payments.sandbox.braintree-api.com/graphql",
            Self::Production => "https://payments.braintree-api.com/graphql",
        }
    }
}

/// Braintree account credentials
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct BraintreeConfig {
    /// Sandbox or production
    pub environment: BraintreeEnvironment,
    /// Merchant account id
    pub merchant_id: String,
    /// API public key
    pub public_key: String,
    /// API private key
    pub private_key: String,
}

impl BraintreeConfig {
    /// Parse credentials from YAML text
    ///
    /// # Errors
    ///
    /// Returns the parser message if the YAML is malformed or incomplete
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_norway::from_str(yaml).map_err(|e| e.to_string())
    }

    /// Load credentials from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `WalkthroughError::MissingConfig` if the file does not exist and
    /// `WalkthroughError::InvalidConfig` if it cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, WalkthroughError> {
        if !path.exists() {
            return Err(WalkthroughError::MissingConfig(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| WalkthroughError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|message| WalkthroughError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        })
    }
}

impl fmt::Debug for BraintreeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraintreeConfig")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"****")
            .finish()
    }
}

/// GraphQL response envelope
#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCustomerData {
    create_customer: CustomerPayload,
}

#[derive(Deserialize)]
struct CustomerPayload {
    customer: Node,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenizeData {
    tokenize_credit_card: PaymentMethodPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultData {
    vault_payment_method: PaymentMethodPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentMethodPayload {
    payment_method: Node,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    id: String,
    #[serde(default)]
    legacy_id: Option<String>,
}

impl Node {
    /// Legacy id if present (what the storefront's Braintree integration
    /// expects), else the GraphQL global id
    fn legacy_or_global(self) -> String {
        self.legacy_id.unwrap_or(self.id)
    }
}

/// Braintree GraphQL client
#[derive(Clone)]
pub struct BraintreeGateway {
    client: Client,
    endpoint: String,
    config: BraintreeConfig,
}

impl BraintreeGateway {
    /// Create a gateway for the configured environment
    #[must_use]
    pub fn new(config: BraintreeConfig) -> Self {
        let endpoint = config.environment.graphql_url().to_string();
        Self {
            client: Client::new(),
            endpoint,
            config,
        }
    }

    /// Builder: send requests to a different endpoint (used by tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.config.public_key, Some(&self.config.private_key))
            .header("Braintree-Version", BRAINTREE_VERSION)
            .json(&json!({"query": query, "variables": variables}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = body_or_empty(response.text().await);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(GatewayError::Rejected(messages.join("; ")));
        }

        envelope
            .data
            .ok_or_else(|| GatewayError::Decode("response carried no data".to_string()))
    }

    async fn vault(
        &self,
        holder: CardHolder,
        card: VaultCard,
    ) -> Result<GatewayProfile, GatewayError> {
        let created: CreateCustomerData = self
            .graphql(
                CREATE_CUSTOMER,
                json!({"input": {"customer": {
                    "firstName": holder.first_name,
                    "lastName": holder.last_name,
                }}}),
            )
            .await?;
        let customer = created.create_customer.customer;

        let tokenized: TokenizeData = self
            .graphql(
                TOKENIZE_CARD,
                json!({"input": {"creditCard": {
                    "number": card.number,
                    "expirationMonth": card.expiration_month,
                    "expirationYear": card.expiration_year,
                }}}),
            )
            .await?;

        let vaulted: VaultData = self
            .graphql(
                VAULT_PAYMENT_METHOD,
                json!({"input": {
                    "paymentMethodId": tokenized.tokenize_credit_card.payment_method.id,
                    "customerId": customer.id,
                }}),
            )
            .await?;

        let profile = GatewayProfile {
            customer_profile_id: customer.legacy_or_global(),
            payment_profile_id: vaulted.vault_payment_method.payment_method.legacy_or_global(),
        };

        tracing::info!(
            merchant_id = %self.config.merchant_id,
            customer_profile_id = %profile.customer_profile_id,
            "Vaulted card with Braintree"
        );

        Ok(profile)
    }
}

/// Error body for a failed call; an unreadable body becomes empty
fn body_or_empty(body: Result<String, reqwest::Error>) -> String {
    body.unwrap_or_else(|error| {
        tracing::debug!(%error, "could not read Braintree error body");
        String::new()
    })
}

impl PaymentGateway for BraintreeGateway {
    fn vault_card(&self, holder: &CardHolder, card: &VaultCard) -> GatewayFuture<'_> {
        let holder = holder.clone();
        let card = card.clone();
        Box::pin(self.vault(holder, card))
    }
}

impl fmt::Debug for BraintreeGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraintreeGateway")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
