// Session store
//
// Keeps the signed-in user's auth token, profile and id between runs.
// - MemorySessionStore: process-local, the default
// - RedisSessionStore: shared, keys prefixed and optionally expiring

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::Settings;
use crate::models::LoginResponse;
use crate::redis::RedisPool;
use crate::utils::{AppError, Result};

/// Values kept for a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    AuthToken,
    UserData,
    UserId,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [Self::AuthToken, Self::UserData, Self::UserId];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthToken => "authToken",
            Self::UserData => "userData",
            Self::UserId => "userId",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage for session values
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: SessionKey) -> Result<Option<String>>;

    async fn set(&self, key: SessionKey, value: &str) -> Result<()>;

    /// Remove every session value (logout)
    async fn clear(&self) -> Result<()>;
}

/// In-memory session store
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: Arc<RwLock<HashMap<SessionKey, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        self.values.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.values.write().await.clear();
        Ok(())
    }
}

/// Redis-backed session store
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: RedisPool,
    prefix: String,
    ttl_seconds: Option<u64>,
}

impl RedisSessionStore {
    pub fn new(redis: RedisPool, prefix: impl Into<String>, ttl_seconds: Option<u64>) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
            ttl_seconds: ttl_seconds.filter(|ttl| *ttl > 0),
        }
    }

    /// Full Redis key for a session value
    pub fn redis_key(&self, key: SessionKey) -> String {
        format!("{}{}", self.prefix, key.as_str())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>> {
        self.redis.get::<String>(&self.redis_key(key)).await
    }

    async fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        let redis_key = self.redis_key(key);
        match self.ttl_seconds {
            Some(ttl) => self.redis.setex(&redis_key, value, ttl).await,
            None => self.redis.set(&redis_key, value).await,
        }
    }

    async fn clear(&self) -> Result<()> {
        let keys: Vec<String> = SessionKey::ALL.iter().map(|k| self.redis_key(*k)).collect();
        self.redis.del(&keys).await
    }
}

/// Build the store selected in settings
pub fn create_session_store(settings: &Settings) -> Result<Arc<dyn SessionStore>> {
    match settings.session.backend.as_str() {
        "memory" => {
            debug!("Using in-memory session store");
            Ok(Arc::new(MemorySessionStore::new()))
        }
        "redis" => {
            let redis = RedisPool::new(settings)?;
            info!(
                "🗄️  Using Redis session store at {}:{}",
                settings.redis.host, settings.redis.port
            );
            Ok(Arc::new(RedisSessionStore::new(
                redis,
                settings.session.key_prefix.clone(),
                settings.session.ttl_seconds,
            )))
        }
        other => Err(AppError::ConfigError(format!(
            "Unknown session backend: {}",
            other
        ))),
    }
}

/// Store the token, profile and user id from a successful login
pub async fn remember_login(store: &dyn SessionStore, login: &LoginResponse) -> Result<()> {
    let user_data = serde_json::to_string(&login.user)?;

    store.set(SessionKey::AuthToken, &login.token).await?;
    store.set(SessionKey::UserData, &user_data).await?;
    store
        .set(SessionKey::UserId, &login.user.user_id_string())
        .await?;

    debug!("Session stored for user {}", login.user.user_id_string());
    Ok(())
}
