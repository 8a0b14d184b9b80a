use nutriscan::{GoogleVisionSource, ScanError, TextAnnotationSource};

fn vision_body(full_text: &str, fragments: &[&str]) -> String {
    let mut annotations = vec![serde_json::json!({ "description": full_text })];
    for fragment in fragments {
        annotations.push(serde_json::json!({ "description": fragment }));
    }
    serde_json::json!({
        "responses": [{
            "textAnnotations": annotations
        }]
    })
    .to_string()
}

#[tokio::test]
async fn annotate_returns_full_text_and_fragments() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/images:annotate?key=test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(vision_body(
            "ChocoBar\nCalories 240\nTotal Fat 12g",
            &["ChocoBar", "Calories", "240"],
        ))
        .create_async()
        .await;

    let source = GoogleVisionSource::with_base_url("test-key", server.url());
    let annotations = source.annotate(b"fake image bytes").await.unwrap();

    assert!(annotations.full_text.contains("Calories 240"));
    assert_eq!(annotations.fragments.len(), 3);
    assert_eq!(annotations.product_name_hint(), Some("ChocoBar"));
}

#[tokio::test]
async fn per_request_error_is_tagged_vision_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/images:annotate?key=test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"responses": [{"error": {"code": 3, "message": "Bad image data"}}]}"#,
        )
        .create_async()
        .await;

    let source = GoogleVisionSource::with_base_url("test-key", server.url());
    let err = source.annotate(b"not an image").await.unwrap_err();

    match err {
        ScanError::Vision(message) => assert!(message.contains("Bad image data")),
        other => panic!("expected Vision error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_annotations_is_no_text_detected() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/images:annotate?key=test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"responses": [{}]}"#)
        .create_async()
        .await;

    let source = GoogleVisionSource::with_base_url("test-key", server.url());
    let err = source.annotate(b"blank image").await.unwrap_err();
    assert!(matches!(err, ScanError::NoTextDetected));
}

#[tokio::test]
async fn http_failure_is_tagged_vision_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/images:annotate?key=test-key")
        .with_status(403)
        .with_body("API key invalid")
        .create_async()
        .await;

    let source = GoogleVisionSource::with_base_url("test-key", server.url());
    let err = source.annotate(b"image").await.unwrap_err();

    match err {
        ScanError::Vision(message) => {
            assert!(message.contains("403"));
            assert!(message.contains("API key invalid"));
        }
        other => panic!("expected Vision error, got {:?}", other),
    }
}
