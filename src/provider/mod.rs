// src/provider/mod.rs — Model provider layer

pub mod cooldown;
pub mod extract;
pub mod fallback;
pub mod google;

use async_trait::async_trait;

use crate::infra::config::GenerationConfig;
use crate::infra::errors::GhostquillError;

/// A backend capable of one-shot text generation. Implementations map
/// their transport failures to a typed `ProviderErrorKind` so the
/// fallback chain never inspects message strings.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Issue a single generation call against `model` and return the raw
    /// response text, untrimmed and unparsed.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, GhostquillError>;
}

#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 1000,
            temperature: 0.9,
        }
    }
}

impl From<&GenerationConfig> for GenerateParams {
    fn from(cfg: &GenerationConfig) -> Self {
        Self {
            max_output_tokens: cfg.max_output_tokens,
            temperature: cfg.temperature,
        }
    }
}
