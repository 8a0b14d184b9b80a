use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::ScanError;

const GOOGLE_VISION_BASE_URL: &str = "https://vision.googleapis.com";

/// Text detected in a product photograph.
#[derive(Debug, Clone, Default)]
pub struct TextAnnotations {
    /// Best-effort transcription of all text in the image
    pub full_text: String,
    /// Individual detected text regions, in detection order
    pub fragments: Vec<String>,
}

impl TextAnnotations {
    /// Heuristic product name: the first detected fragment, which on product
    /// photos is usually the brand or product name printed largest.
    pub fn product_name_hint(&self) -> Option<&str> {
        self.fragments
            .iter()
            .map(|f| f.trim())
            .find(|f| !f.is_empty())
    }
}

/// Source of OCR text annotations for an image.
///
/// Implementations own their API clients; callers construct one and inject it
/// wherever text is needed, so tests can substitute a canned source.
#[async_trait]
pub trait TextAnnotationSource: Send + Sync {
    async fn annotate(&self, image_data: &[u8]) -> Result<TextAnnotations, ScanError>;
}

/// Google Cloud Vision `images:annotate` client with `TEXT_DETECTION`.
pub struct GoogleVisionSource {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleVisionSource {
    pub fn new(api_key: impl Into<String>) -> Self {
        GoogleVisionSource {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GOOGLE_VISION_BASE_URL.to_string(),
        }
    }

    /// Read the API key from the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ScanError> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| ScanError::Vision("GOOGLE_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key))
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        GoogleVisionSource {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TextAnnotationSource for GoogleVisionSource {
    async fn annotate(&self, image_data: &[u8]) -> Result<TextAnnotations, ScanError> {
        let base64_image = STANDARD.encode(image_data);

        let url = format!(
            "{}/v1/images:annotate?key={}",
            self.base_url, self.api_key
        );

        let request_body = json!({
            "requests": [{
                "image": {
                    "content": base64_image
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }]
            }]
        });

        debug!("Sending OCR request to Google Vision API");

        let response = self.client.post(&url).json(&request_body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(ScanError::Vision(format!(
                "Google Vision API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        debug!("Google Vision API response: {:?}", response_body);

        let result = &response_body["responses"][0];

        // Per-request errors arrive inside the response body with a 200 status
        if let Some(message) = result["error"]["message"].as_str() {
            return Err(ScanError::Vision(message.to_string()));
        }

        let annotations = result["textAnnotations"]
            .as_array()
            .filter(|a| !a.is_empty())
            .ok_or(ScanError::NoTextDetected)?;

        // The first annotation is the whole detected block; the rest are the
        // individual regions in detection order.
        let full_text = annotations[0]["description"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if full_text.trim().is_empty() {
            return Err(ScanError::NoTextDetected);
        }

        let fragments = annotations[1..]
            .iter()
            .filter_map(|a| a["description"].as_str())
            .map(str::to_string)
            .collect();

        debug!("Extracted text from image: {} characters", full_text.len());

        Ok(TextAnnotations {
            full_text,
            fragments,
        })
    }
}
