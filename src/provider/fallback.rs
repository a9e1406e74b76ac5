// src/provider/fallback.rs — Fallback chain for model resilience
//
// Tries candidate models strictly one at a time in priority order. A
// single logical request must never bill two models at once, so there is
// no parallel racing — first success wins.

use std::sync::Arc;

use super::cooldown::CooldownRegistry;
use super::{extract, GenerateParams, ModelProvider};
use crate::infra::errors::GhostquillError;

pub struct FallbackChain {
    candidates: Vec<String>,
    provider: Arc<dyn ModelProvider>,
    cooldowns: Arc<CooldownRegistry>,
    params: GenerateParams,
}

impl FallbackChain {
    pub fn new(
        candidates: Vec<String>,
        provider: Arc<dyn ModelProvider>,
        cooldowns: Arc<CooldownRegistry>,
        params: GenerateParams,
    ) -> Self {
        Self {
            candidates,
            provider,
            cooldowns,
            params,
        }
    }

    /// One call against one model: generate, reject empty output, then run
    /// the two-stage extraction.
    async fn invoke_model(&self, model: &str, prompt: &str) -> Result<String, GhostquillError> {
        let raw = self.provider.generate(model, prompt, &self.params).await?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(GhostquillError::EmptyResponse {
                model: model.to_string(),
            });
        }
        Ok(extract::extract_post(raw))
    }

    /// Run `prompt` through the candidate list, skipping models on
    /// cooldown. Failures with a cooldown-eligible kind put the model on
    /// cooldown; every failure is recorded and the loop moves on.
    pub async fn generate(&self, prompt: &str) -> Result<String, GhostquillError> {
        let available = self.cooldowns.available_models(&self.candidates);
        if available.is_empty() {
            return Err(GhostquillError::AllModelsCoolingDown);
        }

        let mut last_error = None;

        for model in available {
            tracing::info!(model = %model, "attempting generation");

            match self.invoke_model(model, prompt).await {
                Ok(content) => {
                    tracing::info!(model = %model, "generation succeeded");
                    return Ok(content);
                }
                Err(e) => {
                    tracing::warn!(model = %model, "model failed: {}", e);

                    if e.provider_kind().map_or(false, |k| k.triggers_cooldown()) {
                        self.cooldowns.set_cooldown(model, &e.to_string());
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(GhostquillError::AllModelsFailed))
    }
}
