// ABOUTME: SQLite-backed session issuance, verification, and revocation
// ABOUTME: Only SHA-256 hashes of tokens are stored; plaintext is returned once at creation

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use subtle::ConstantTimeEq;
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::{AuthContext, SessionVerifier};
use crate::error::{AuthError, AuthResult};

/// A freshly created session. `token` is never stored and cannot be recovered.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_id: String,
    pub user_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Random 32-byte token, base64 URL-safe without padding
    pub fn generate_token() -> String {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hex-encoded SHA-256 of the token, as stored in the database
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn hash_matches(token: &str, stored_hash: &str) -> bool {
        Self::hash_token(token)
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    pub async fn create_session(&self, user_id: &str, ttl: Duration) -> AuthResult<IssuedSession> {
        if user_id.trim().is_empty() {
            return Err(AuthError::InvalidInput("user_id is required".to_string()));
        }
        if ttl <= Duration::zero() {
            return Err(AuthError::InvalidInput(
                "session lifetime must be positive".to_string(),
            ));
        }

        let session_id = Uuid::new_v4().to_string();
        let token = Self::generate_token();
        let now = Utc::now();
        let expires_at = now + ttl;

        sqlx::query(
            "INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&session_id)
        .bind(user_id)
        .bind(Self::hash_token(&token))
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        info!("Created session {} for user {}", session_id, user_id);

        Ok(IssuedSession {
            session_id,
            user_id: user_id.to_string(),
            token,
            expires_at,
        })
    }

    /// Revoke a session by id. Revoking twice is an error.
    pub async fn revoke(&self, session_id: &str) -> AuthResult<()> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL",
        )
        .bind(Utc::now())
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::SessionNotFound(session_id.to_string()));
        }

        info!("Revoked session {}", session_id);
        Ok(())
    }

    /// Delete expired and revoked sessions, returning how many were removed
    pub async fn purge_expired(&self) -> AuthResult<u64> {
        let result =
            sqlx::query("DELETE FROM sessions WHERE expires_at <= ? OR revoked_at IS NOT NULL")
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        let removed = result.rows_affected();
        info!("Purged {} expired or revoked sessions", removed);
        Ok(removed)
    }
}

#[async_trait]
impl SessionVerifier for SessionStore {
    async fn verify(&self, token: &str) -> AuthResult<Option<AuthContext>> {
        if token.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query(
            "SELECT id, user_id, token_hash FROM sessions
             WHERE token_hash = ? AND revoked_at IS NULL AND expires_at > ?",
        )
        .bind(Self::hash_token(token))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!("Session token not recognised");
            return Ok(None);
        };

        let stored_hash: String = row.try_get("token_hash")?;
        if !Self::hash_matches(token, &stored_hash) {
            return Ok(None);
        }

        Ok(Some(AuthContext {
            session_id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_storage::connect_in_memory;

    async fn store() -> SessionStore {
        SessionStore::new(connect_in_memory().await.unwrap())
    }

    #[test]
    fn test_generate_token_produces_unique_values() {
        let token1 = SessionStore::generate_token();
        let token2 = SessionStore::generate_token();
        assert_ne!(token1, token2);
        assert_eq!(token1.len(), 43);
    }

    #[test]
    fn test_hash_token_is_deterministic_hex() {
        let hash = SessionStore::hash_token("abc");
        assert_eq!(hash, SessionStore::hash_token("abc"));
        assert_eq!(hash.len(), 64);
        assert!(SessionStore::hash_matches("abc", &hash));
        assert!(!SessionStore::hash_matches("abd", &hash));
    }

    #[tokio::test]
    async fn test_created_session_verifies() {
        let store = store().await;
        let issued = store
            .create_session("user-1", Duration::hours(1))
            .await
            .unwrap();

        let ctx = store.verify(&issued.token).await.unwrap().unwrap();
        assert_eq!(ctx.user_id, "user-1");
        assert_eq!(ctx.session_id, issued.session_id);
    }

    #[tokio::test]
    async fn test_unknown_token_is_none() {
        let store = store().await;
        assert_eq!(store.verify("not-a-session").await.unwrap(), None);
        assert_eq!(store.verify("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoked_session_no_longer_verifies() {
        let store = store().await;
        let issued = store
            .create_session("user-1", Duration::hours(1))
            .await
            .unwrap();

        store.revoke(&issued.session_id).await.unwrap();
        assert_eq!(store.verify(&issued.token).await.unwrap(), None);
        assert!(matches!(
            store.revoke(&issued.session_id).await,
            Err(AuthError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_session_rejected_and_purged() {
        let store = store().await;
        let issued = store
            .create_session("user-1", Duration::milliseconds(1))
            .await
            .unwrap();
        let live = store
            .create_session("user-2", Duration::hours(1))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(store.verify(&issued.token).await.unwrap(), None);
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.verify(&live.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_session_validates_input() {
        let store = store().await;
        assert!(matches!(
            store.create_session(" ", Duration::hours(1)).await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            store.create_session("user-1", Duration::zero()).await,
            Err(AuthError::InvalidInput(_))
        ));
    }
}
