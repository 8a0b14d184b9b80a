mod anthropic;
mod factory;
mod fallback;
mod google;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_analysis_prompt, ANALYSIS_PROMPT};

use async_trait::async_trait;

use crate::error::ScanError;

/// Unified trait for all analysis providers
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Send a fully rendered analysis prompt and return the raw completion
    async fn complete(&self, prompt: &str) -> Result<String, ScanError>;
}
