//! HTTP-level tests for the storefront client against a wiremock server.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use serde_json::json;
use storefront_client::{ApiRequest, ClientConfig, ClientError, FileUpload, StorefrontClient};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, key: Option<&str>) -> StorefrontClient {
    let config = ClientConfig::new(&server.uri()).expect("mock server URI should parse");
    StorefrontClient::new(match key {
        Some(key) => config.with_api_key(key),
        None => config,
    })
}

#[tokio::test]
async fn test_post_attaches_token_and_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders/R100/line_items"))
        .and(header("X-Spree-Token", "secret"))
        .and(body_json(json!({"line_item": {"variant_id": 1, "quantity": 1}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let response = client
        .post(
            "/api/orders/R100/line_items",
            Some(json!({"line_item": {"variant_id": 1, "quantity": 1}})),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    assert_eq!(response.json_value().unwrap()["id"], 1);
}

#[tokio::test]
async fn test_query_parameters_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/countries"))
        .and(query_param("q[name_cont]", "United States"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"countries": []})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server, None)
        .send(ApiRequest::get("/api/countries").query("q[name_cont]", "United States"))
        .await
        .unwrap();

    assert!(response.is(200));
}

#[tokio::test]
async fn test_error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/checkouts/R100/next"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"error":"cannot transition"}"#),
        )
        .mount(&server)
        .await;

    let response = client_for(&server, None)
        .put("/api/checkouts/R100/next", None)
        .await
        .unwrap();

    assert_eq!(response.status(), 422);
    assert!(response.body().contains("cannot transition"));
}

#[tokio::test]
async fn test_multipart_upload_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products/1/images"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/products/1/images/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let upload = FileUpload::new("image[attachment]", "cat.jpg", "image/jpeg", vec![0xFF, 0xD8]);
    let created = client
        .send(ApiRequest::post("/api/products/1/images").multipart(upload))
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    let requests = server.received_requests().await.expect("recording enabled");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(String::from_utf8_lossy(&requests[0].body).contains("name=\"image[attachment]\""));

    let deleted = client.delete("/api/products/1/images/42").await.unwrap();
    assert_eq!(deleted.status(), 204);
    assert!(deleted.body().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Port 9 (discard) is closed on test machines
    let client = StorefrontClient::new(ClientConfig::new("http://127.0.0.1:9").unwrap());
    let result = client.get("/api/orders").await;
    assert!(matches!(result, Err(ClientError::Transport { .. })));
}
