//! Operator session
//!
//! The console keeps one authenticated session: the bearer token issued by the
//! backend and the identity that came with it. [`SessionContext`] is handed to
//! the API client and the pages explicitly; [`SessionStore`] persists it to a
//! JSON file under the keys `yeti_token` and `yeti_user`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::SessionUser,
};

pub const TOKEN_KEY: &str = "yeti_token";
pub const USER_KEY: &str = "yeti_user";

/// Authenticated operator session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Session {
    /// Expiry timestamp of the token, when it is a JWT carrying `exp`.
    ///
    /// The signature is not checked: the backend remains the authority, this
    /// only spares a round-trip with a token that is known to be stale.
    pub fn expires_at(&self) -> Option<i64> {
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<ExpiryClaims>(&self.token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .and_then(|data| data.claims.exp)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .map(|exp| exp <= Utc::now().timestamp())
            .unwrap_or(false)
    }
}

/// On-disk layout, mirroring the browser storage keys.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "yeti_token")]
    token: String,
    /// JSON-serialized [`SessionUser`]
    #[serde(rename = "yeti_user")]
    user: String,
}

/// File-backed persistence for the session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing or unreadable file yields `None`.
    pub async fn load(&self) -> Option<Session> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Cannot read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        let stored: StoredSession = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Ignoring malformed session file: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<SessionUser>(&stored.user) {
            Ok(user) => Some(Session {
                token: stored.token,
                user,
            }),
            Err(e) => {
                tracing::warn!("Ignoring malformed {} entry: {}", USER_KEY, e);
                None
            }
        }
    }

    pub async fn save(&self, session: &Session) -> AppResult<()> {
        let stored = StoredSession {
            token: session.token.clone(),
            user: serde_json::to_string(&session.user)?,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&stored)?).await?;
        Ok(())
    }

    pub async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shared handle on the current session, passed to every API-calling module.
#[derive(Debug, Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Option<SessionStore>,
}

impl SessionContext {
    /// Session living in memory only.
    pub fn in_memory() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store: None,
        }
    }

    /// Session restored from, and written back to, `store`.
    pub async fn restore(store: SessionStore) -> Self {
        let session = store.load().await;
        if let Some(s) = &session {
            tracing::info!("Restored session for {} ({})", s.user.name, s.user.role);
        }
        Self {
            current: Arc::new(RwLock::new(session)),
            store: Some(store),
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Bearer token of a live session.
    pub async fn token(&self) -> AppResult<String> {
        self.require().await.map(|s| s.token)
    }

    /// The live session, or an authentication error when missing or expired.
    pub async fn require(&self) -> AppResult<Session> {
        match self.current().await {
            None => Err(AppError::Authentication("No active session".to_string())),
            Some(s) if s.is_expired() => {
                Err(AppError::Authentication("Session token has expired".to_string()))
            }
            Some(s) => Ok(s),
        }
    }

    pub async fn user(&self) -> AppResult<SessionUser> {
        self.require().await.map(|s| s.user)
    }

    pub async fn set(&self, session: Session) -> AppResult<()> {
        if let Some(store) = &self.store {
            store.save(&session).await?;
        }
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Replace the cached identity, keeping the token.
    pub async fn update_user(&self, user: SessionUser) -> AppResult<()> {
        let session = self.require().await?;
        self.set(Session { user, ..session }).await
    }

    pub async fn clear(&self) -> AppResult<()> {
        *self.current.write().await = None;
        if let Some(store) = &self.store {
            store.clear().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn user() -> SessionUser {
        SessionUser {
            id: 1,
            name: "Ada".into(),
            email: "ada@yeti.org".into(),
            role: Role::Admin,
        }
    }

    fn jwt(exp: i64) -> String {
        encode(
            &Header::default(),
            &serde_json::json!({ "sub": "1", "exp": exp }),
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_expired_jwt_detected() {
        let expired = Session {
            token: jwt(Utc::now().timestamp() - 60),
            user: user(),
        };
        assert!(expired.is_expired());

        let live = Session {
            token: jwt(Utc::now().timestamp() + 3600),
            user: user(),
        };
        assert!(!live.is_expired());
    }

    #[test]
    fn test_opaque_token_never_expires_client_side() {
        let session = Session {
            token: "opaque-token".into(),
            user: user(),
        };
        assert_eq!(session.expires_at(), None);
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn test_store_round_trip_uses_storage_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let session = Session {
            token: "abc".into(),
            user: user(),
        };
        store.save(&session).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[TOKEN_KEY], "abc");
        assert!(json[USER_KEY].as_str().unwrap().contains("\"role\":\"admin\""));

        assert_eq!(store.load().await, Some(session));
        store.clear().await.unwrap();
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn test_context_requires_live_session() {
        let ctx = SessionContext::in_memory();
        assert!(matches!(ctx.token().await, Err(AppError::Authentication(_))));

        ctx.set(Session {
            token: jwt(Utc::now().timestamp() - 1),
            user: user(),
        })
        .await
        .unwrap();
        assert!(matches!(ctx.user().await, Err(AppError::Authentication(_))));

        ctx.set(Session {
            token: "opaque".into(),
            user: user(),
        })
        .await
        .unwrap();
        assert_eq!(ctx.token().await.unwrap(), "opaque");

        ctx.clear().await.unwrap();
        assert!(ctx.current().await.is_none());
    }
}
