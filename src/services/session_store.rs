// src/services/session_store.rs
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: Value,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store io: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Where the logged-in session lives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<AuthSession>, StoreError>;
    async fn save(&self, session: &AuthSession) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<RwLock<Option<AuthSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<AuthSession>, StoreError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, session: &AuthSession) -> Result<(), StoreError> {
        *self.inner.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.inner.write().await = None;
        Ok(())
    }
}

/// One JSON document on disk.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<AuthSession>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn save(&self, session: &AuthSession) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_vec(session)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Logged-in user state on top of a [`SessionStore`].
pub struct AuthState<S> {
    store: S,
    user: Option<Value>,
}

impl<S: SessionStore> AuthState<S> {
    /// Restore whatever the store holds. A record that fails to load is
    /// cleared and the state starts logged out.
    pub async fn restore(store: S) -> Self {
        let user = match store.load().await {
            Ok(session) => session.map(|s| s.user),
            Err(e) => {
                tracing::error!(error = %e, "failed to restore session, clearing it");
                if let Err(e) = store.clear().await {
                    tracing::warn!(error = %e, "failed to clear session store");
                }
                None
            }
        };
        Self { store, user }
    }

    pub async fn login(&mut self, user: Value, token: impl Into<String>) -> Result<(), StoreError> {
        let session = AuthSession { token: token.into(), user };
        self.store.save(&session).await?;
        self.user = Some(session.user);
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<(), StoreError> {
        self.user = None;
        self.store.clear().await
    }

    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
