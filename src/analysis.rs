//! Narrative nutrition assessment via an injected LLM provider.
//!
//! The analyzer owns no global client state: it is constructed with a boxed
//! [`AnalysisProvider`] and can be handed a test double in its place.

use log::{debug, warn};

use crate::error::ScanError;
use crate::model::{Analysis, NutritionRecord, Verdict};
use crate::profile::UserProfile;
use crate::providers::{build_analysis_prompt, AnalysisProvider};

pub struct NutritionAnalyzer {
    provider: Box<dyn AnalysisProvider>,
}

impl NutritionAnalyzer {
    pub fn new(provider: Box<dyn AnalysisProvider>) -> Self {
        NutritionAnalyzer { provider }
    }

    /// Ask the provider for a health assessment of a parsed record.
    ///
    /// A provider response that is not the requested JSON shape yields
    /// [`ScanError::MalformedAnalysis`] carrying the verbatim response.
    pub async fn analyze(
        &self,
        record: &NutritionRecord,
        profile: Option<&UserProfile>,
        product_name: Option<&str>,
    ) -> Result<Analysis, ScanError> {
        let prompt = build_analysis_prompt(record, profile, product_name);
        debug!(
            "Requesting analysis from {} ({} prompt chars)",
            self.provider.provider_name(),
            prompt.len()
        );

        let response = self.provider.complete(&prompt).await?;
        let payload = strip_code_fences(&response);

        serde_json::from_str::<Analysis>(payload).map_err(|e| {
            warn!(
                "Provider {} returned non-conforming JSON: {}",
                self.provider.provider_name(),
                e
            );
            ScanError::MalformedAnalysis {
                reason: e.to_string(),
                raw_response: response.clone(),
            }
        })
    }

    /// Convenience wrapper: analysis plus its display verdict.
    pub async fn analyze_with_verdict(
        &self,
        record: &NutritionRecord,
        profile: Option<&UserProfile>,
        product_name: Option<&str>,
    ) -> Result<(Analysis, Verdict), ScanError> {
        let analysis = self.analyze(record, profile, product_name).await?;
        let verdict = Verdict::from_analysis(&analysis);
        Ok((analysis, verdict))
    }
}

/// Models often wrap the requested JSON in markdown fences despite being told
/// not to; accept ```json ... ``` and bare ``` ... ``` wrappers.
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();

    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(fence) {
            if let Some(end) = rest.find("```") {
                return rest[..end].trim();
            }
            return rest.trim();
        }
    }

    trimmed
}
