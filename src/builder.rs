use std::path::Path;
use std::time::Duration;

use log::debug;
use tokio::time::timeout;

use crate::analysis::NutritionAnalyzer;
use crate::config::{ProviderConfig, ScanConfig};
use crate::error::ScanError;
use crate::model::{NutritionRecord, ScanReport};
use crate::parser::parse_nutrition_facts;
use crate::profile::UserProfile;
use crate::providers::{AnalysisProvider, FallbackProvider, ProviderFactory};
use crate::vision::{GoogleVisionSource, TextAnnotationSource, TextAnnotations};

/// Represents the input source for a scan
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Read an image file from disk and OCR it
    ImagePath(String),
    /// OCR raw image bytes (e.g., an HTTP upload)
    ImageData(Vec<u8>),
    /// Skip OCR and parse the given text directly
    Text(String),
}

/// Represents the desired output
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputMode {
    /// Parse and run the LLM analysis (default)
    #[default]
    Report,
    /// Stop after parsing; no provider is contacted
    Record,
}

/// Result of a scan operation
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// Parsed record only (from `.parse_only()`)
    Record(NutritionRecord),
    /// Full report with analysis and verdict
    Report(ScanReport),
}

/// Analysis backend selection for the builder
#[derive(Debug, Clone, Copy)]
pub enum AnalysisBackend {
    Google,
    OpenAI,
    Anthropic,
}

impl AnalysisBackend {
    /// Convert to provider name string used by the factory
    fn as_str(&self) -> &'static str {
        match self {
            AnalysisBackend::Google => "google",
            AnalysisBackend::OpenAI => "openai",
            AnalysisBackend::Anthropic => "anthropic",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            AnalysisBackend::Google => "gemini-2.0-flash",
            AnalysisBackend::OpenAI => "gpt-4o-mini",
            AnalysisBackend::Anthropic => "claude-3-5-haiku-latest",
        }
    }
}

/// Entry point for the scanning API.
///
/// # Example
/// ```no_run
/// # use nutriscan::ProductScanner;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = ProductScanner::builder()
///     .image("/path/to/label.jpg")
///     .parse_only()
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ProductScanner;

impl ProductScanner {
    pub fn builder() -> ProductScanBuilder {
        ProductScanBuilder::default()
    }
}

/// Builder for configuring and executing product scans
#[derive(Default)]
pub struct ProductScanBuilder {
    source: Option<InputSource>,
    mode: OutputMode,
    backend: Option<AnalysisBackend>,
    api_key: Option<String>,
    model: Option<String>,
    product_name: Option<String>,
    profile: Option<UserProfile>,
    vision: Option<Box<dyn TextAnnotationSource>>,
    timeout: Option<Duration>,
}

impl ProductScanBuilder {
    /// Set the input source to an image file path
    pub fn image(mut self, path: impl Into<String>) -> Self {
        self.source = Some(InputSource::ImagePath(path.into()));
        self
    }

    /// Set the input source to raw image bytes
    pub fn image_data(mut self, data: Vec<u8>) -> Self {
        self.source = Some(InputSource::ImageData(data));
        self
    }

    /// Set the input source to OCR text that has already been obtained
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Text(text.into()));
        self
    }

    /// Stop after parsing; the analysis provider is never contacted
    pub fn parse_only(mut self) -> Self {
        self.mode = OutputMode::Record;
        self
    }

    /// Select the analysis backend explicitly instead of using configuration
    pub fn backend(mut self, backend: AnalysisBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the API key for the analysis backend directly
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the analysis backend
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Provide the product name instead of guessing it from detected text
    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Personalize the analysis with a user profile
    pub fn profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Inject a custom OCR source (test doubles, alternate engines)
    pub fn annotation_source(mut self, source: Box<dyn TextAnnotationSource>) -> Self {
        self.vision = Some(source);
        self
    }

    /// Deadline applied to each external call (OCR, analysis)
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Execute the scan.
    ///
    /// # Errors
    /// Returns `ScanError` if no input source was specified, the image cannot
    /// be read, OCR fails or finds no text, or the analysis provider fails.
    /// Parsing itself never fails: a text input always yields a record.
    pub async fn build(self) -> Result<ScanOutcome, ScanError> {
        let ProductScanBuilder {
            source,
            mode,
            backend,
            api_key,
            model,
            product_name,
            profile,
            vision,
            timeout: deadline,
        } = self;

        let source = source.ok_or_else(|| {
            ScanError::Builder(
                "No input source specified. Use .image(), .image_data() or .text()".to_string(),
            )
        })?;

        // Resolve the source to a text blob plus an optional product hint
        let (text, annotations) = match source {
            InputSource::Text(text) => (text, None),
            InputSource::ImagePath(path) => {
                let data = tokio::fs::read(Path::new(&path)).await?;
                let annotations = annotate(vision.as_deref(), &data, deadline).await?;
                (annotations.full_text.clone(), Some(annotations))
            }
            InputSource::ImageData(data) => {
                let annotations = annotate(vision.as_deref(), &data, deadline).await?;
                (annotations.full_text.clone(), Some(annotations))
            }
        };

        let record = parse_nutrition_facts(&text);
        debug!("scan parsed record, empty={}", record.is_empty());

        let product_name = product_name.or_else(|| {
            annotations
                .as_ref()
                .and_then(|a| a.product_name_hint())
                .map(str::to_string)
        });

        if let OutputMode::Record = mode {
            return Ok(ScanOutcome::Record(record));
        }

        let provider = make_provider(backend, api_key, model)?;
        let analyzer = NutritionAnalyzer::new(provider);

        let analyze =
            analyzer.analyze_with_verdict(&record, profile.as_ref(), product_name.as_deref());
        let (analysis, verdict) = match deadline {
            Some(limit) => timeout(limit, analyze)
                .await
                .map_err(|_| ScanError::Timeout(limit))??,
            None => analyze.await?,
        };

        Ok(ScanOutcome::Report(ScanReport {
            product_name,
            record,
            analysis: Some(analysis),
            verdict: Some(verdict),
        }))
    }
}

fn make_provider(
    backend: Option<AnalysisBackend>,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<Box<dyn AnalysisProvider>, ScanError> {
    match backend {
        Some(backend) => {
            let config = ProviderConfig {
                enabled: true,
                model: model.unwrap_or_else(|| backend.default_model().to_string()),
                temperature: 0.7,
                max_tokens: 2000,
                api_key,
                base_url: None,
            };
            ProviderFactory::create(backend.as_str(), &config)
        }
        None => {
            let config = ScanConfig::load()?;
            Ok(Box::new(FallbackProvider::new(&config)?))
        }
    }
}

/// Construct the OCR source from configuration: `vision.api_key` first, then
/// the `GOOGLE_API_KEY` environment variable; `vision.base_url` is honored
/// when set.
fn default_vision_source() -> Result<GoogleVisionSource, ScanError> {
    let vision = ScanConfig::load()?.vision;

    let api_key = vision
        .api_key
        .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
        .ok_or_else(|| {
            ScanError::Vision(
                "Vision API key not found: set vision.api_key in config or GOOGLE_API_KEY".into(),
            )
        })?;

    Ok(match vision.base_url {
        Some(base_url) => GoogleVisionSource::with_base_url(api_key, base_url),
        None => GoogleVisionSource::new(api_key),
    })
}

async fn annotate(
    source: Option<&dyn TextAnnotationSource>,
    image_data: &[u8],
    deadline: Option<Duration>,
) -> Result<TextAnnotations, ScanError> {
    let default_source;
    let source = match source {
        Some(source) => source,
        None => {
            default_source = default_vision_source()?;
            &default_source
        }
    };

    match deadline {
        Some(limit) => timeout(limit, source.annotate(image_data))
            .await
            .map_err(|_| ScanError::Timeout(limit))?,
        None => source.annotate(image_data).await,
    }
}
