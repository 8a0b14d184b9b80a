//! Analyzer flow against a mocked OpenAI-compatible endpoint.

use nutriscan::providers::OpenAIProvider;
use nutriscan::{NutritionAnalyzer, ScanError, UserProfile};

fn chat_completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{
            "message": { "content": content }
        }]
    })
    .to_string()
}

fn sample_record() -> nutriscan::NutritionRecord {
    nutriscan::parse_nutrition_facts(
        "Calories 240\nTotal Fat 12g\nProtein 5g\nIngredients:\nWheat Flour, Sugar, Peanuts",
    )
}

#[tokio::test]
async fn analysis_and_verdict_from_valid_response() {
    let analysis_json = r#"{
        "summary": "Sweet snack, go easy 🍬",
        "health_score": "4",
        "positive_aspects": ["Contains some protein 💪"],
        "concerns": ["High in sugar 🍭", "Palm oil"],
        "allergen_warnings": ["peanuts"],
        "alternatives": ["Dark chocolate square"],
        "tips": ["Pair with fruit"],
        "fit_for_user": "No",
        "explanation": "Conflicts with the peanut allergy."
    }"#;

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(&format!(
            "```json\n{}\n```",
            analysis_json
        )))
        .create_async()
        .await;

    let provider = OpenAIProvider::with_base_url(
        "test-key".to_string(),
        server.url(),
        "gpt-4o-mini".to_string(),
    );
    let analyzer = NutritionAnalyzer::new(Box::new(provider));

    let mut profile = UserProfile::new("user123");
    profile.allergies = vec!["peanuts".to_string()];

    let (analysis, verdict) = analyzer
        .analyze_with_verdict(&sample_record(), Some(&profile), Some("ChocoBar"))
        .await
        .unwrap();

    assert_eq!(analysis.health_score, 4);
    assert_eq!(analysis.allergen_warnings, vec!["peanuts"]);
    assert_eq!(analysis.fit_for_user.as_deref(), Some("No"));

    assert_eq!(verdict.color, "#F44336");
    assert_eq!(verdict.icon, "thumb_down");
    assert_eq!(verdict.title, "Sweet snack, go easy 🍬");
}

#[tokio::test]
async fn prose_response_is_malformed_analysis() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(
            "I think this product is quite unhealthy overall.",
        ))
        .create_async()
        .await;

    let provider = OpenAIProvider::with_base_url(
        "test-key".to_string(),
        server.url(),
        "gpt-4o-mini".to_string(),
    );
    let analyzer = NutritionAnalyzer::new(Box::new(provider));

    let err = analyzer
        .analyze(&sample_record(), None, None)
        .await
        .unwrap_err();

    match err {
        ScanError::MalformedAnalysis { raw_response, .. } => {
            assert!(raw_response.contains("unhealthy"));
        }
        other => panic!("expected MalformedAnalysis, got {:?}", other),
    }
}

#[tokio::test]
async fn prompt_carries_record_and_profile() {
    // The mock asserts on the request body: the prompt must include the
    // parsed values and the profile sections.
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("Calories: 240 kcal".to_string()),
            mockito::Matcher::Regex("Wheat Flour, Sugar, Peanuts".to_string()),
            mockito::Matcher::Regex("User Profile".to_string()),
            mockito::Matcher::Regex("peanuts".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(r#"{"summary": "ok", "health_score": 5}"#))
        .create_async()
        .await;

    let provider = OpenAIProvider::with_base_url(
        "test-key".to_string(),
        server.url(),
        "gpt-4o-mini".to_string(),
    );
    let analyzer = NutritionAnalyzer::new(Box::new(provider));

    let mut profile = UserProfile::new("user123");
    profile.allergies = vec!["peanuts".to_string()];

    analyzer
        .analyze(&sample_record(), Some(&profile), None)
        .await
        .unwrap();

    mock.assert_async().await;
}
