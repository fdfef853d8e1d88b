//! Product image walkthrough against the mock storefront.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use storefront_client::FileUpload;
use storefront_testing::{ImageScenario, MockStorefront, RecordingReporter, ReportKind};
use storefront_walkthrough::{ImageWalkthrough, WalkthroughError};

fn cat_picture() -> FileUpload {
    FileUpload::new("image", "thinking-cat.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xD9])
}

async fn run(
    scenario: ImageScenario,
) -> (Result<u64, WalkthroughError>, RecordingReporter, MockStorefront) {
    let storefront = MockStorefront::start().await;
    storefront.mount_images(&scenario).await;

    let client = storefront.client();
    let reporter = RecordingReporter::new();
    let result = ImageWalkthrough::new(&client, &reporter, scenario.product_id, cat_picture())
        .run()
        .await
        .map(|image| image.id);

    (result, reporter, storefront)
}

#[tokio::test]
async fn test_upload_then_delete_returned_image() {
    let (result, reporter, storefront) = run(ImageScenario::default()).await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(
        reporter.messages(ReportKind::Success),
        vec![
            "Created an image for a product.".to_string(),
            "Deleted the image we just created.".to_string(),
        ]
    );
    assert_eq!(
        storefront.requests().await,
        vec![
            ("POST".to_string(), "/api/products/1/images".to_string()),
            ("DELETE".to_string(), "/api/products/1/images/42".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_upload_uses_attachment_field() {
    let (_result, _reporter, storefront) = run(ImageScenario::default()).await;

    let requests = storefront.server().received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"image[attachment]\""));
    assert!(body.contains("filename=\"thinking-cat.jpg\""));
}

#[tokio::test]
async fn test_failed_upload_skips_delete() {
    let (result, reporter, storefront) = run(ImageScenario {
        upload_status: 422,
        ..ImageScenario::default()
    })
    .await;

    assert!(matches!(
        result,
        Err(WalkthroughError::UnexpectedStatus { expected: 201, actual: 422, .. })
    ));
    assert!(reporter.contains("Could not create an image for a product (422)"));
    assert_eq!(storefront.requests().await.len(), 1);
}

#[tokio::test]
async fn test_delete_must_answer_no_content() {
    let (result, reporter, _storefront) = run(ImageScenario {
        delete_status: 200,
        ..ImageScenario::default()
    })
    .await;

    assert!(matches!(
        result,
        Err(WalkthroughError::UnexpectedStatus { expected: 204, actual: 200, .. })
    ));
    assert_eq!(reporter.count(ReportKind::Success), 1);
    assert!(reporter.contains("Could not delete the image we just created (200)"));
}

#[tokio::test]
async fn test_other_product() {
    let (result, _reporter, storefront) = run(ImageScenario {
        product_id: 7,
        image_id: 99,
        ..ImageScenario::default()
    })
    .await;

    assert_eq!(result.unwrap(), 99);
    assert_eq!(
        storefront.requests().await[1],
        ("DELETE".to_string(), "/api/products/7/images/99".to_string())
    );
}
