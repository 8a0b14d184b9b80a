//! NutriScan: structured nutrition facts from photographed product labels.
//!
//! The pipeline has three stages with a single data flow between them:
//! an OCR source ([`vision::TextAnnotationSource`]) turns an image into a
//! text blob, the parser ([`parser::parse_nutrition_facts`]) turns the blob
//! into a [`NutritionRecord`], and an optional analysis provider turns the
//! record into a narrative [`Analysis`] with a display [`Verdict`].
//!
//! The parser is the heart of the crate and is pure: it never touches the
//! network and never fails, degrading to partial or empty records on noisy
//! input. Everything around it is injectable glue.

pub mod analysis;
pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod profile;
pub mod providers;
pub mod vision;

pub use analysis::NutritionAnalyzer;
pub use builder::{AnalysisBackend, InputSource, OutputMode, ProductScanBuilder, ProductScanner, ScanOutcome};
pub use config::ScanConfig;
pub use error::ScanError;
pub use model::{Analysis, NutritionRecord, ScanReport, Verdict};
pub use parser::parse_nutrition_facts;
pub use profile::{InMemoryProfileRepository, ProfileRepository, UserProfile};
pub use vision::{GoogleVisionSource, TextAnnotationSource, TextAnnotations};

use std::path::Path;

/// Scan an image file end to end using environment configuration:
/// OCR with `GOOGLE_API_KEY`, analysis with the configured default provider.
pub async fn scan_image_file(path: impl AsRef<Path>) -> Result<ScanReport, ScanError> {
    let outcome = ProductScanner::builder()
        .image(path.as_ref().to_string_lossy())
        .build()
        .await?;

    match outcome {
        ScanOutcome::Report(report) => Ok(report),
        // Unreachable: the default output mode always produces a report
        ScanOutcome::Record(record) => Ok(ScanReport {
            product_name: None,
            record,
            analysis: None,
            verdict: None,
        }),
    }
}

/// Parse already-obtained OCR text and analyze it with the configured
/// default provider.
pub async fn scan_text(text: impl Into<String>) -> Result<ScanReport, ScanError> {
    let outcome = ProductScanner::builder().text(text).build().await?;

    match outcome {
        ScanOutcome::Report(report) => Ok(report),
        ScanOutcome::Record(record) => Ok(ScanReport {
            product_name: None,
            record,
            analysis: None,
            verdict: None,
        }),
    }
}
