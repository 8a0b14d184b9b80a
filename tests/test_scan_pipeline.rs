//! Image-to-record pipeline with the OCR service mocked out.

use std::time::Duration;

use async_trait::async_trait;
use nutriscan::{
    GoogleVisionSource, ProductScanner, ScanError, ScanOutcome, TextAnnotationSource,
    TextAnnotations,
};

const LABEL_TEXT: &str = "ChocoBar Deluxe\nNutrition Facts\nCalories 240\nTotal Fat 12g\nSaturated Fat 6g\nTotal Carbohydrate 30g\nProtein 5g\nIngredients:\nWheat Flour, Sugar, Palm Oil, Cocoa, Salt";

fn vision_body() -> String {
    serde_json::json!({
        "responses": [{
            "textAnnotations": [
                { "description": LABEL_TEXT },
                { "description": "ChocoBar Deluxe" },
                { "description": "Nutrition" },
                { "description": "Facts" }
            ]
        }]
    })
    .to_string()
}

#[tokio::test]
async fn image_bytes_to_parsed_record() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/images:annotate?key=test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(vision_body())
        .create_async()
        .await;

    let source = GoogleVisionSource::with_base_url("test-key", server.url());
    let outcome = ProductScanner::builder()
        .image_data(b"fake jpeg bytes".to_vec())
        .annotation_source(Box::new(source))
        .parse_only()
        .build()
        .await
        .unwrap();

    let record = match outcome {
        ScanOutcome::Record(record) => record,
        ScanOutcome::Report(_) => panic!("expected parse-only outcome"),
    };

    assert_eq!(record.calories, Some(240));
    assert_eq!(record.fat, Some(12.0));
    assert_eq!(record.carbohydrates, Some(30.0));
    assert_eq!(record.protein, Some(5.0));
    assert_eq!(
        record.ingredients,
        vec!["Wheat Flour", "Sugar", "Palm Oil", "Cocoa", "Salt"]
    );
    assert_eq!(record.raw_text, LABEL_TEXT);
}

#[tokio::test]
async fn ocr_failure_surfaces_before_parsing() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/images:annotate?key=test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"responses": [{}]}"#)
        .create_async()
        .await;

    let source = GoogleVisionSource::with_base_url("test-key", server.url());
    let result = ProductScanner::builder()
        .image_data(b"blank".to_vec())
        .annotation_source(Box::new(source))
        .parse_only()
        .build()
        .await;

    assert!(matches!(result, Err(nutriscan::ScanError::NoTextDetected)));
}

#[tokio::test]
async fn default_ocr_source_honors_vision_config() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/images:annotate?key=config-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(vision_body())
        .create_async()
        .await;

    // No annotation_source injected: the builder must construct the default
    // source from the vision section of the configuration.
    std::env::set_var("NUTRISCAN__VISION__API_KEY", "config-key");
    std::env::set_var("NUTRISCAN__VISION__BASE_URL", server.url());

    let result = ProductScanner::builder()
        .image_data(b"fake jpeg bytes".to_vec())
        .parse_only()
        .build()
        .await;

    std::env::remove_var("NUTRISCAN__VISION__API_KEY");
    std::env::remove_var("NUTRISCAN__VISION__BASE_URL");

    match result.unwrap() {
        ScanOutcome::Record(record) => {
            assert_eq!(record.calories, Some(240));
            assert_eq!(record.raw_text, LABEL_TEXT);
        }
        ScanOutcome::Report(_) => panic!("expected parse-only outcome"),
    }
}

struct SlowSource;

#[async_trait]
impl TextAnnotationSource for SlowSource {
    async fn annotate(&self, _image_data: &[u8]) -> Result<TextAnnotations, ScanError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(TextAnnotations {
            full_text: LABEL_TEXT.to_string(),
            fragments: Vec::new(),
        })
    }
}

#[tokio::test]
async fn slow_ocr_source_hits_the_deadline() {
    let result = ProductScanner::builder()
        .image_data(b"bytes".to_vec())
        .annotation_source(Box::new(SlowSource))
        .timeout(Duration::from_millis(50))
        .parse_only()
        .build()
        .await;

    match result {
        Err(ScanError::Timeout(limit)) => assert_eq!(limit, Duration::from_millis(50)),
        other => panic!("expected Timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn text_input_skips_ocr_entirely() {
    // No mock server at all: a text source must never hit the network in
    // parse-only mode.
    let outcome = ProductScanner::builder()
        .text(LABEL_TEXT)
        .parse_only()
        .build()
        .await
        .unwrap();

    match outcome {
        ScanOutcome::Record(record) => assert_eq!(record.calories, Some(240)),
        ScanOutcome::Report(_) => panic!("expected parse-only outcome"),
    }
}
