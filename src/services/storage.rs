// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable storage for the single session-token slot.

use crate::error::AppError;
use crate::models::StoredSession;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A single persisted slot holding the current session token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted session, if any.
    fn load(&self) -> Result<Option<StoredSession>, AppError>;

    /// Overwrite the slot.
    fn save(&self, session: &StoredSession) -> Result<(), AppError>;

    /// Empty the slot. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), AppError>;
}

/// JSON file backed token store.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Storage(format!("read {}: {}", self.path.display(), e)))?;

        // A corrupt slot reads as logged out rather than blocking startup.
        match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) if !session.token.is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable session file"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Storage(format!("encode session: {}", e)))?;
        fs::write(&self.path, content)
            .map_err(|e| AppError::Storage(format!("write {}: {}", self.path.display(), e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AppError::Storage(format!("chmod {}: {}", self.path.display(), e))
            })?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-memory token store (tests and throwaway sessions).
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token, as if persisted by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(StoredSession::new(token))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<StoredSession>>, AppError> {
        self.slot
            .lock()
            .map_err(|_| AppError::Storage("token slot lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, AppError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), AppError> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        *self.lock()? = None;
        Ok(())
    }
}
