// src/content/types.rs — Domain types for boards, users and posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback descriptor used when a user has no stored profile audit.
pub const DEFAULT_STYLE: &str =
    "casual, lowercase, short sentences, minimal emojis. authentic individual, not corporate.";

/// A growth board: the unit of content strategy. Read-only input to
/// generation; edits happen elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Target topic the board exists to push.
    pub objective: String,
    /// Content style descriptor, e.g. "build-in-public".
    pub strategy: String,
    pub custom_prompt: Option<String>,
    /// Posting cadence, e.g. "daily". Consumed by the external scheduler.
    pub frequency: String,
}

/// The slice of a user the generation core needs.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: String,
    pub niche: Option<String>,
    pub custom_tone: Option<String>,
    pub audit: Option<ProfileAudit>,
}

impl UserProfile {
    /// One-line style fingerprint for the prompt: audit-derived when an
    /// audit exists, the static default descriptor otherwise.
    pub fn style_fingerprint(&self) -> String {
        match &self.audit {
            Some(a) => format!(
                "Tone: {}. Topics: {}. Avg Length: {} chars.",
                a.tone,
                a.topics.join(", "),
                a.avg_length
            ),
            None => DEFAULT_STYLE.to_string(),
        }
    }
}

/// Stored result of a profile audit: derived statistics over the user's
/// recent timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileAudit {
    pub analyzed_at: DateTime<Utc>,
    pub post_count: usize,
    pub tone: String,
    pub avg_length: u32,
    pub avg_engagement: u32,
    pub top_post: TopPost,
    pub topics: Vec<String>,
    pub best_posting_hour: u32,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPost {
    /// First 100 chars of the best-performing post.
    pub text: String,
    pub engagement: u32,
}

/// A post fetched from the user's timeline, as handed over by the
/// external social-platform integration.
#[derive(Debug, Clone)]
pub struct TimelinePost {
    pub text: String,
    pub likes: u32,
    pub reposts: u32,
    pub replies: u32,
    pub created_at: DateTime<Utc>,
}

/// Per-call length preference. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreference {
    #[default]
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentStatus {
    Pending,
    Confirmed,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "PENDING",
            ContentStatus::Confirmed => "CONFIRMED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(ContentStatus::Pending),
            "CONFIRMED" => Some(ContentStatus::Confirmed),
            _ => None,
        }
    }
}

/// A generated post as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: i64,
    pub board_id: String,
    pub content: String,
    /// How this content came to be: standard generation or a flagged
    /// fallback.
    pub rationale: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new post.
#[derive(Debug, Clone)]
pub struct NewContentRecord {
    pub board_id: String,
    pub content: String,
    pub rationale: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}
