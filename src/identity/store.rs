//! Durable slot for the token pair, so a restarted client resumes its
//! session. Replaces the browser-local storage of the original portal:
//! save/clear are best-effort and never fail the auth flow itself.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl StoredTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            saved_at: Utc::now(),
        }
    }
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<StoredTokens>;
    fn save(&self, tokens: &StoredTokens);
    fn clear(&self);
}

/// In-process store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<StoredTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self { slot: RwLock::new(Some(tokens)) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<StoredTokens> {
        self.slot.read().clone()
    }

    fn save(&self, tokens: &StoredTokens) {
        *self.slot.write() = Some(tokens.clone());
    }

    fn clear(&self) {
        *self.slot.write() = None;
    }
}

/// JSON file on disk. A missing or corrupt file loads as "no session".
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<StoredTokens> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!("token_store.load path={} err={}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, tokens: &StoredTokens) {
        if let Some(dir) = self.path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        let body = match serde_json::to_vec_pretty(tokens) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("token_store.save path={} err={}", self.path.display(), e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, body) {
            tracing::warn!("token_store.save path={} err={}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("token_store.clear path={} err={}", self.path.display(), e);
            }
        }
    }
}
