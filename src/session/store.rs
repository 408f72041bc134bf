//! Session storage implementation
//!
//! This module handles persistence of login sessions using Redis. A session
//! maps an opaque token to the public id of the signed-in account.

use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use crate::config::{RedisConfig, SessionConfig};
use crate::utils::errors::Result;

/// Opaque session handle issued at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Issue a fresh random token
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token received back from a client
    pub fn from_string(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User and admin sessions live in separate key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    User,
    Admin,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::User => "user",
            SessionKind::Admin => "admin",
        }
    }
}

/// How long a session lives, decided by the "remember me" choice at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExpiry {
    SessionScoped,
    Remembered,
}

/// Redis-based session storage manager
#[derive(Clone)]
pub struct SessionStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
    /// Session lifetime configuration
    session: SessionConfig,
}

impl SessionStore {
    /// Create a new session store instance
    pub async fn new(config: RedisConfig, session: SessionConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
            session,
        })
    }

    /// Bind a token to an account id for the chosen lifetime
    pub async fn store(
        &self,
        kind: SessionKind,
        token: &SessionToken,
        account_id: &str,
        expiry: SessionExpiry,
    ) -> Result<()> {
        let key = self.session_key(kind, token);
        let ttl_seconds = match expiry {
            SessionExpiry::SessionScoped => self.session.ttl_seconds,
            SessionExpiry::Remembered => self.session.remember_ttl_seconds,
        };
        debug!(kind = kind.as_str(), key = %key, ttl_seconds = ttl_seconds, "Storing session");

        let mut conn = self.connection_manager.clone();
        conn.set_ex::<_, _, ()>(&key, account_id, ttl_seconds).await?;

        Ok(())
    }

    /// Resolve a token to the account id it was bound to
    pub async fn lookup(
        &self,
        kind: SessionKind,
        token: &SessionToken,
    ) -> Result<Option<String>> {
        let key = self.session_key(kind, token);
        let mut conn = self.connection_manager.clone();

        let account_id: Option<String> = conn.get::<&str, Option<String>>(&key).await?;
        debug!(kind = kind.as_str(), key = %key, found = account_id.is_some(), "Session lookup");

        Ok(account_id)
    }

    /// Drop a session, absent tokens are not an error
    pub async fn clear(&self, kind: SessionKind, token: &SessionToken) -> Result<()> {
        let key = self.session_key(kind, token);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;

        if deleted > 0 {
            debug!(kind = kind.as_str(), key = %key, "Session cleared");
        } else {
            debug!(kind = kind.as_str(), key = %key, "No session to clear");
        }

        Ok(())
    }

    /// Get the Redis key for a session token
    fn session_key(&self, kind: SessionKind, token: &SessionToken) -> String {
        format!("{}{}:{}", self.config.prefix, kind.as_str(), token.as_str())
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
