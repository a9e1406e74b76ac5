// src/infra/errors.rs — Error types for Ghostquill

use thiserror::Error;

/// Classification of a provider-call failure, assigned by the boundary
/// adapter that talks to the real provider API. Keeps substring matching
/// out of the fallback orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// HTTP 429 or equivalent throttling signal.
    RateLimited,
    /// Daily/hard quota exhausted; distinct from transient throttling.
    QuotaExceeded,
    /// Bad request, invalid or rejected credentials (400/401/403).
    InvalidRequest,
    /// Request timed out before a response arrived.
    Timeout,
    /// Connection failures, 5xx — worth trying the next candidate.
    Transient,
    Unknown,
}

impl ProviderErrorKind {
    /// Kinds that put the failing model on cooldown before moving on.
    pub fn triggers_cooldown(&self) -> bool {
        matches!(
            self,
            ProviderErrorKind::RateLimited
                | ProviderErrorKind::QuotaExceeded
                | ProviderErrorKind::InvalidRequest
                | ProviderErrorKind::Timeout
        )
    }
}

#[derive(Error, Debug)]
pub enum GhostquillError {
    // Provider errors
    #[error("Model '{model}' error: {message}")]
    Provider {
        model: String,
        message: String,
        kind: ProviderErrorKind,
    },

    #[error("Model '{model}' returned an empty response")]
    EmptyResponse { model: String },

    #[error("All AI models are currently rate-limited or on cooldown")]
    AllModelsCoolingDown,

    #[error("All models failed generation")]
    AllModelsFailed,

    // User / domain errors
    #[error("Board '{0}' not found")]
    BoardNotFound(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    // Configuration — operator misconfiguration, never recovered with
    // fallback content
    #[error("API key missing. Set GEMINI_API_KEY.")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    // Infra
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GhostquillError {
    /// The provider classification, if this is a provider-call failure.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            GhostquillError::Provider { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True for failures the generation service papers over with
    /// synthesized fallback content. Configuration and persistence
    /// errors are not model-layer and must surface to the caller.
    pub fn is_model_layer(&self) -> bool {
        matches!(
            self,
            GhostquillError::Provider { .. }
                | GhostquillError::EmptyResponse { .. }
                | GhostquillError::AllModelsCoolingDown
                | GhostquillError::AllModelsFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_trigger_kinds() {
        assert!(ProviderErrorKind::RateLimited.triggers_cooldown());
        assert!(ProviderErrorKind::QuotaExceeded.triggers_cooldown());
        assert!(ProviderErrorKind::InvalidRequest.triggers_cooldown());
        assert!(ProviderErrorKind::Timeout.triggers_cooldown());
        assert!(!ProviderErrorKind::Transient.triggers_cooldown());
        assert!(!ProviderErrorKind::Unknown.triggers_cooldown());
    }

    #[test]
    fn test_model_layer_classification() {
        let e = GhostquillError::Provider {
            model: "m".into(),
            message: "boom".into(),
            kind: ProviderErrorKind::Unknown,
        };
        assert!(e.is_model_layer());
        assert!(GhostquillError::AllModelsCoolingDown.is_model_layer());
        assert!(GhostquillError::AllModelsFailed.is_model_layer());
        assert!(!GhostquillError::MissingApiKey.is_model_layer());
        assert!(!GhostquillError::BoardNotFound("b1".into()).is_model_layer());
    }

    #[test]
    fn test_provider_kind_accessor() {
        let e = GhostquillError::Provider {
            model: "m".into(),
            message: "quota".into(),
            kind: ProviderErrorKind::QuotaExceeded,
        };
        assert_eq!(e.provider_kind(), Some(ProviderErrorKind::QuotaExceeded));
        assert_eq!(GhostquillError::AllModelsFailed.provider_kind(), None);
    }
}
