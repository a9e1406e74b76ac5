// src/content/service.rs — Generation service
//
// Top-level entry point for one content generation: gather context, build
// the prompt, run the fallback chain, and persist the outcome. The caller
// always gets a record back; model-layer instability is absorbed here and
// reported through the rationale field, never as an error.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

use super::prompt::{self, PromptContext};
use super::store::ContentStore;
use super::types::{ContentRecord, ContentStatus, LengthPreference, NewContentRecord};
use crate::infra::errors::{GhostquillError, ProviderErrorKind};
use crate::provider::fallback::FallbackChain;

/// Pre-written generic posts substituted when every model call fails.
pub const FALLBACK_POSTS: [&str; 10] = [
    "honestly, consistency is just showing up when you don't feel like it. most people want the prize but hate the process.",
    "stop overthinking your first step. just take it. you can't optimize a blank page.",
    "unpopular opinion: you don't need more tools, you need more focus. delete the apps.",
    "building in public is scary until you realize nobody is watching that closely. just ship it.",
    "the best networking hack? actually be good at what you do. people notice competence.",
    "it's not about being the smartest in the room. it's about being the most persistent. talent is overrated.",
    "growth is 80% showing up and 20% skill. just keep posting.",
    "your first iteration will be bad. that is the point. ship it anyway.",
    "stop waiting for permission to build the thing you want to build.",
    "engagement is just talking to people. treat twitter like a group chat, not a podium.",
];

pub const RATIONALE_STANDARD: &str = "AI-generated based on your profile style & board goal.";
pub const RATIONALE_FALLBACK_AUTH: &str = "mocked (invalid API key - check configuration)";
pub const RATIONALE_FALLBACK_OVERLOADED: &str = "mocked (AI service overloaded - cooldowns active)";

pub struct GenerationService {
    store: Arc<dyn ContentStore>,
    chain: FallbackChain,
    history_limit: usize,
    rng: Mutex<StdRng>,
}

impl GenerationService {
    pub fn new(store: Arc<dyn ContentStore>, chain: FallbackChain, history_limit: usize) -> Self {
        Self::with_rng(store, chain, history_limit, StdRng::from_entropy())
    }

    /// Construct with a seeded RNG so angle and fallback selection are
    /// deterministic under test.
    pub fn with_rng(
        store: Arc<dyn ContentStore>,
        chain: FallbackChain,
        history_limit: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            chain,
            history_limit,
            rng: Mutex::new(rng),
        }
    }

    /// Generate and persist one post for `board_id`.
    ///
    /// Model-layer failure is recovered with a fixed fallback post and a
    /// rationale flagging the degradation. Only missing-board, missing
    /// configuration, and persistence failures surface as errors.
    pub async fn generate_content(
        &self,
        board_id: &str,
        length: LengthPreference,
    ) -> Result<ContentRecord, GhostquillError> {
        let board = self
            .store
            .get_board(board_id)?
            .ok_or_else(|| GhostquillError::BoardNotFound(board_id.to_string()))?;

        let user = self
            .store
            .get_user_profile(&board.user_id)?
            .ok_or_else(|| GhostquillError::UserNotFound(board.user_id.clone()))?;

        let history = self.store.recent_content(board_id, self.history_limit)?;

        let angle = {
            let mut rng = self.rng.lock().unwrap();
            prompt::pick_angle(&mut *rng)
        };
        tracing::debug!(board = %board.id, angle = %angle, "building generation prompt");

        let ctx = PromptContext {
            board: &board,
            user: &user,
            history: &history,
            length,
        };
        let full_prompt = prompt::build_prompt(&ctx, angle);

        let (content, rationale) = match self.chain.generate(&full_prompt).await {
            Ok(text) => (text, RATIONALE_STANDARD.to_string()),
            Err(e) if e.is_model_layer() => {
                tracing::error!(board = %board.id, "all models exhausted: {}", e);
                let pick = {
                    let mut rng = self.rng.lock().unwrap();
                    rng.gen_range(0..FALLBACK_POSTS.len())
                };
                (FALLBACK_POSTS[pick].to_string(), fallback_rationale(&e))
            }
            Err(e) => return Err(e),
        };

        self.store.insert_content(NewContentRecord {
            board_id: board.id,
            content,
            rationale,
            status: ContentStatus::Pending,
            created_at: Utc::now(),
        })
    }
}

/// Attribute the terminal failure to bad credentials or overload.
///
/// Best-effort: the chain reports only the last candidate's error, so an
/// earlier credential failure can be misattributed as overload. Typed
/// kind first, message substrings as a fallback signal.
fn fallback_rationale(e: &GhostquillError) -> String {
    let looks_auth = matches!(e.provider_kind(), Some(ProviderErrorKind::InvalidRequest)) || {
        let msg = e.to_string();
        msg.contains("400") || msg.contains("key") || msg.contains("valid")
    };

    if looks_auth {
        RATIONALE_FALLBACK_AUTH.to_string()
    } else {
        RATIONALE_FALLBACK_OVERLOADED.to_string()
    }
}
