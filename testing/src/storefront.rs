//! Mock storefront
//!
//! A wiremock server answering the checkout and product-image endpoints
//! with canned bodies. Scenarios describe what the server should say; the
//! defaults are a storefront where every step goes through.

use crate::fixtures;
use storefront_client::{ClientConfig, StorefrontClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Token the mock storefront expects on order creation
pub const TEST_TOKEN: &str = "test-token";

/// Matches a checkout update whose `order` object carries `key`
struct OrderAttribute(&'static str);

impl Match for OrderAttribute {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .ok()
            .is_some_and(|body| body["order"].get(self.0).is_some())
    }
}

/// What the mock storefront answers during a checkout
#[derive(Clone, Debug)]
pub struct CheckoutScenario {
    /// Order number handed out on creation
    pub number: String,
    /// Email on the new order
    pub email: Option<String>,
    /// Status of `POST /api/orders`
    pub create_status: u16,
    /// Status of `POST /api/orders/{n}/line_items`
    pub line_item_status: u16,
    /// Status of the first `PUT /api/checkouts/{n}/next`
    pub advance_status: u16,
    /// Status of the address update
    pub address_status: u16,
    /// Status of the delivery update
    pub delivery_status: u16,
    /// Status of the payment update
    pub payment_status: u16,
    /// Status of the final `PUT /api/checkouts/{n}/next`
    pub complete_status: u16,
    /// Name the country lookup is answered for
    pub country_query: String,
    /// Countries returned by the country lookup
    pub countries: Vec<(u64, String)>,
    /// Name the state lookup is answered for
    pub region_query: String,
    /// States returned by the state lookup
    pub states: Vec<(u64, String)>,
    /// Whether orders past `address` carry a shipment to choose from
    pub offers_shipping: bool,
    /// Order state after the address is submitted
    pub state_after_address: String,
    /// Order state after delivery is selected
    pub state_after_delivery: String,
    /// Order state after payment is submitted
    pub state_after_payment: String,
    /// Order state after the final `next`
    pub state_after_complete: String,
    /// Payment methods offered on the order
    pub payment_methods: Vec<(u64, String)>,
}

impl Default for CheckoutScenario {
    fn default() -> Self {
        Self {
            number: "R123456789".to_string(),
            email: Some("spree@example.com".to_string()),
            create_status: 201,
            line_item_status: 201,
            advance_status: 200,
            address_status: 200,
            delivery_status: 200,
            payment_status: 200,
            complete_status: 200,
            country_query: "United States".to_string(),
            countries: vec![(232, "United States".to_string())],
            region_query: "Maryland".to_string(),
            states: vec![(3561, "Maryland".to_string())],
            offers_shipping: true,
            state_after_address: "delivery".to_string(),
            state_after_delivery: "payment".to_string(),
            state_after_payment: "confirm".to_string(),
            state_after_complete: "complete".to_string(),
            payment_methods: vec![(1, "Credit Card".to_string()), (2, "Braintree".to_string())],
        }
    }
}

impl CheckoutScenario {
    pub(crate) fn order(&self, state: &str) -> serde_json::Value {
        let methods: Vec<(u64, &str)> = self
            .payment_methods
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        let mut order = fixtures::order(&self.number, self.email.as_deref(), state, &methods);
        if !self.offers_shipping {
            order["shipments"] = serde_json::json!([]);
        }
        order
    }
}

/// What the mock storefront answers during the image walkthrough
#[derive(Clone, Copy, Debug)]
pub struct ImageScenario {
    /// Product receiving the image
    pub product_id: u64,
    /// Id given to the uploaded image
    pub image_id: u64,
    /// Status of the upload
    pub upload_status: u16,
    /// Status of the delete
    pub delete_status: u16,
}

impl Default for ImageScenario {
    fn default() -> Self {
        Self {
            product_id: 1,
            image_id: 42,
            upload_status: 201,
            delete_status: 204,
        }
    }
}

/// A running mock storefront
pub struct MockStorefront {
    server: MockServer,
}

impl MockStorefront {
    /// Start an empty mock storefront on a random local port
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the server
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server, for ad-hoc mocks
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Client pointed at this server, authenticated with [`TEST_TOKEN`]
    ///
    /// # Panics
    ///
    /// Panics if wiremock hands out an unparsable URI
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client(&self) -> StorefrontClient {
        let config = ClientConfig::new(&self.uri())
            .expect("mock server URI should always parse")
            .with_api_key(TEST_TOKEN);
        StorefrontClient::new(config)
    }

    /// Mount every checkout endpoint according to `scenario`
    pub async fn mount_checkout(&self, scenario: &CheckoutScenario) {
        let number = &scenario.number;
        let checkout = format!("/api/checkouts/{number}");
        let next = format!("{checkout}/next");

        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .and(header("X-Spree-Token", TEST_TOKEN))
            .respond_with(
                ResponseTemplate::new(scenario.create_status).set_body_json(scenario.order("cart")),
            )
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("/api/orders/{number}/line_items")))
            .respond_with(
                ResponseTemplate::new(scenario.line_item_status)
                    .set_body_json(fixtures::line_item(1, 1)),
            )
            .mount(&self.server)
            .await;

        // First `next` moves to address, every later one completes
        Mock::given(method("PUT"))
            .and(path(next.as_str()))
            .respond_with(
                ResponseTemplate::new(scenario.advance_status)
                    .set_body_json(scenario.order("address")),
            )
            .up_to_n_times(1)
            .mount(&self.server)
            .await;

        Mock::given(method("PUT"))
            .and(path(next.as_str()))
            .respond_with(
                ResponseTemplate::new(scenario.complete_status)
                    .set_body_json(scenario.order(&scenario.state_after_complete)),
            )
            .mount(&self.server)
            .await;

        let countries: Vec<(u64, &str)> =
            scenario.countries.iter().map(|(id, name)| (*id, name.as_str())).collect();
        Mock::given(method("GET"))
            .and(path("/api/countries"))
            .and(query_param("q[name_cont]", scenario.country_query.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::countries(&countries)))
            .mount(&self.server)
            .await;

        if let Some((country_id, _)) = scenario.countries.first() {
            let states: Vec<(u64, &str)> =
                scenario.states.iter().map(|(id, name)| (*id, name.as_str())).collect();
            Mock::given(method("GET"))
                .and(path(format!("/api/countries/{country_id}/states")))
                .and(query_param("q[name_cont]", scenario.region_query.as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::states(&states)))
                .mount(&self.server)
                .await;
        }

        for (attribute, status, state) in [
            ("bill_address_attributes", scenario.address_status, &scenario.state_after_address),
            ("shipments_attributes", scenario.delivery_status, &scenario.state_after_delivery),
            ("payments_attributes", scenario.payment_status, &scenario.state_after_payment),
        ] {
            Mock::given(method("PUT"))
                .and(path(checkout.as_str()))
                .and(OrderAttribute(attribute))
                .respond_with(ResponseTemplate::new(status).set_body_json(scenario.order(state)))
                .mount(&self.server)
                .await;
        }
    }

    /// Mount the product image endpoints according to `scenario`
    pub async fn mount_images(&self, scenario: &ImageScenario) {
        let images = format!("/api/products/{}/images", scenario.product_id);

        Mock::given(method("POST"))
            .and(path(images.as_str()))
            .respond_with(
                ResponseTemplate::new(scenario.upload_status)
                    .set_body_json(fixtures::image(scenario.image_id)),
            )
            .mount(&self.server)
            .await;

        Mock::given(method("DELETE"))
            .and(path(format!("{images}/{}", scenario.image_id)))
            .respond_with(ResponseTemplate::new(scenario.delete_status))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far as `(method, path)` pairs
    ///
    /// # Panics
    ///
    /// Panics if request recording was disabled on the server
    #[allow(clippy::expect_used)]
    pub async fn requests(&self) -> Vec<(String, String)> {
        self.server
            .received_requests()
            .await
            .expect("request recording is enabled by default")
            .iter()
            .map(|request| (request.method.to_string(), request.url.path().to_string()))
            .collect()
    }

    /// JSON bodies of requests sent to `request_path`, in order
    ///
    /// # Panics
    ///
    /// Panics if request recording was disabled on the server
    #[allow(clippy::expect_used)]
    pub async fn bodies_sent_to(&self, request_path: &str) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .expect("request recording is enabled by default")
            .iter()
            .filter(|request| request.url.path() == request_path)
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
