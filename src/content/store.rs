// src/content/store.rs — Persistence seam + SQLite implementation

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use super::types::{
    BoardConfig, ContentRecord, ContentStatus, NewContentRecord, ProfileAudit, UserProfile,
};
use crate::infra::errors::GhostquillError;

/// Persistence operations the generation core depends on. A trait so
/// tests can substitute a stub without a database.
pub trait ContentStore: Send + Sync {
    fn get_board(&self, board_id: &str) -> Result<Option<BoardConfig>, GhostquillError>;

    fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, GhostquillError>;

    /// Up to `limit` prior post texts for the board, most recent first.
    fn recent_content(&self, board_id: &str, limit: usize)
        -> Result<Vec<String>, GhostquillError>;

    fn insert_content(&self, record: NewContentRecord)
        -> Result<ContentRecord, GhostquillError>;

    fn save_audit(&self, user_id: &str, audit: &ProfileAudit) -> Result<(), GhostquillError>;
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    niche         TEXT,
    custom_tone   TEXT,
    audit_data    TEXT,
    last_audit_at TEXT
);

CREATE TABLE IF NOT EXISTS boards (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(id),
    title         TEXT NOT NULL,
    objective     TEXT NOT NULL,
    strategy      TEXT NOT NULL,
    custom_prompt TEXT,
    frequency     TEXT NOT NULL DEFAULT 'daily'
);

CREATE TABLE IF NOT EXISTS posts (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id   TEXT NOT NULL REFERENCES boards(id),
    content    TEXT NOT NULL,
    rationale  TEXT NOT NULL,
    status     TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_board_created
    ON posts(board_id, created_at DESC);
"#;

/// SQLite-backed store. The connection sits behind a mutex since
/// generation calls run concurrently.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, GhostquillError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, GhostquillError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, GhostquillError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // Seeding helpers for the outer layers (and tests); not part of the
    // generation core's trait surface.

    pub fn insert_user(
        &self,
        id: &str,
        niche: Option<&str>,
        custom_tone: Option<&str>,
    ) -> Result<(), GhostquillError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, niche, custom_tone) VALUES (?1, ?2, ?3)",
            params![id, niche, custom_tone],
        )?;
        Ok(())
    }

    pub fn insert_board(&self, board: &BoardConfig) -> Result<(), GhostquillError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO boards (id, user_id, title, objective, strategy, custom_prompt, frequency)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                board.id,
                board.user_id,
                board.title,
                board.objective,
                board.strategy,
                board.custom_prompt,
                board.frequency
            ],
        )?;
        Ok(())
    }
}

impl ContentStore for SqliteStore {
    fn get_board(&self, board_id: &str) -> Result<Option<BoardConfig>, GhostquillError> {
        let conn = self.conn.lock().unwrap();
        let board = conn
            .query_row(
                "SELECT id, user_id, title, objective, strategy, custom_prompt, frequency
                 FROM boards WHERE id = ?1",
                params![board_id],
                |row| {
                    Ok(BoardConfig {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        title: row.get(2)?,
                        objective: row.get(3)?,
                        strategy: row.get(4)?,
                        custom_prompt: row.get(5)?,
                        frequency: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(board)
    }

    fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, GhostquillError> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT id, niche, custom_tone, audit_data FROM users WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(id, niche, custom_tone, audit_data)| {
            // A corrupt stored audit degrades to the default style rather
            // than failing the generation call.
            let audit = audit_data.and_then(|raw| serde_json::from_str(&raw).ok());
            UserProfile {
                id,
                niche,
                custom_tone,
                audit,
            }
        }))
    }

    fn recent_content(
        &self,
        board_id: &str,
        limit: usize,
    ) -> Result<Vec<String>, GhostquillError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT content FROM posts WHERE board_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![board_id, limit as i64], |row| row.get(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn insert_content(
        &self,
        record: NewContentRecord,
    ) -> Result<ContentRecord, GhostquillError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO posts (board_id, content, rationale, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.board_id,
                record.content,
                record.rationale,
                record.status.as_str(),
                record.created_at.to_rfc3339()
            ],
        )?;
        let id = conn.last_insert_rowid();

        Ok(ContentRecord {
            id,
            board_id: record.board_id,
            content: record.content,
            rationale: record.rationale,
            status: record.status,
            created_at: record.created_at,
        })
    }

    fn save_audit(&self, user_id: &str, audit: &ProfileAudit) -> Result<(), GhostquillError> {
        let raw = serde_json::to_string(audit)
            .map_err(|e| GhostquillError::Config(e.to_string()))?;
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE users SET audit_data = ?1, last_audit_at = ?2 WHERE id = ?3",
            params![raw, Utc::now().to_rfc3339(), user_id],
        )?;
        if updated == 0 {
            return Err(GhostquillError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_user("u1", Some("indie SaaS"), None).unwrap();
        store
            .insert_board(&BoardConfig {
                id: "b1".into(),
                user_id: "u1".into(),
                title: "Launch board".into(),
                objective: "shipping fast".into(),
                strategy: "build-in-public".into(),
                custom_prompt: None,
                frequency: "daily".into(),
            })
            .unwrap();
        store
    }

    fn record(board_id: &str, content: &str, created_at: DateTime<Utc>) -> NewContentRecord {
        NewContentRecord {
            board_id: board_id.into(),
            content: content.into(),
            rationale: "r".into(),
            status: ContentStatus::Pending,
            created_at,
        }
    }

    #[test]
    fn test_get_board() {
        let store = seeded_store();
        let board = store.get_board("b1").unwrap().unwrap();
        assert_eq!(board.objective, "shipping fast");
        assert!(store.get_board("nope").unwrap().is_none());
    }

    #[test]
    fn test_get_user_profile_without_audit() {
        let store = seeded_store();
        let user = store.get_user_profile("u1").unwrap().unwrap();
        assert_eq!(user.niche.as_deref(), Some("indie SaaS"));
        assert!(user.audit.is_none());
    }

    #[test]
    fn test_save_and_load_audit() {
        let store = seeded_store();
        let audit = ProfileAudit {
            analyzed_at: Utc::now(),
            post_count: 5,
            tone: "technical".into(),
            avg_length: 120,
            avg_engagement: 8,
            top_post: super::super::types::TopPost {
                text: "top".into(),
                engagement: 20,
            },
            topics: vec!["rust".into()],
            best_posting_hour: 9,
            recommendations: vec![],
        };
        store.save_audit("u1", &audit).unwrap();

        let user = store.get_user_profile("u1").unwrap().unwrap();
        assert_eq!(user.audit.unwrap().tone, "technical");
    }

    #[test]
    fn test_save_audit_unknown_user() {
        let store = seeded_store();
        let audit = ProfileAudit {
            analyzed_at: Utc::now(),
            post_count: 0,
            tone: "casual".into(),
            avg_length: 0,
            avg_engagement: 0,
            top_post: super::super::types::TopPost {
                text: String::new(),
                engagement: 0,
            },
            topics: vec![],
            best_posting_hour: 0,
            recommendations: vec![],
        };
        let err = store.save_audit("ghost", &audit).unwrap_err();
        assert!(matches!(err, GhostquillError::UserNotFound(_)));
    }

    #[test]
    fn test_recent_content_order_and_limit() {
        let store = seeded_store();
        let base = Utc::now();
        for i in 0..7 {
            store
                .insert_content(record(
                    "b1",
                    &format!("post {}", i),
                    base + Duration::minutes(i),
                ))
                .unwrap();
        }

        let recent = store.recent_content("b1", 5).unwrap();
        assert_eq!(recent.len(), 5);
        // Most recent first
        assert_eq!(recent[0], "post 6");
        assert_eq!(recent[4], "post 2");
    }

    #[test]
    fn test_insert_content_returns_record() {
        let store = seeded_store();
        let rec = store
            .insert_content(record("b1", "hello", Utc::now()))
            .unwrap();
        assert!(rec.id > 0);
        assert_eq!(rec.status, ContentStatus::Pending);
    }

}
