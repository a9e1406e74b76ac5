// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::GhostquillError;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Candidate models in fallback priority order, highest first.
    /// The list order is the sole priority ordering.
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,
}

fn default_candidates() -> Vec<String> {
    // High free-tier quota (~1500/day), primary
    vec!["gemma-3-27b-it".into()]
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    /// Elevated to reduce repetition across daily generations.
    pub temperature: f32,
    pub request_timeout_secs: u64,
    /// Prior posts fed to the prompt as negative examples.
    pub history_limit: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 1000,
            temperature: 0.9,
            request_timeout_secs: 30,
            history_limit: 5,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, GhostquillError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| GhostquillError::Config(e.to_string()))
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, GhostquillError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// The provider API key, from the environment. A missing key is an
/// operator misconfiguration, not a retryable condition.
pub fn api_key_from_env() -> Result<String, GhostquillError> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(GhostquillError::MissingApiKey),
    }
}
