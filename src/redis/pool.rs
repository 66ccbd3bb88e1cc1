use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;

use crate::config::Settings;
use crate::utils::{AppError, Result};

/// Redis connection pool wrapper
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl RedisPool {
    /// Create a new Redis connection pool
    pub fn new(settings: &Settings) -> Result<Self> {
        let redis_url = settings.redis_url();

        let mut cfg = Config::from_url(redis_url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(settings.redis.pool_size));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AppError::RedisError(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self { pool })
    }

    /// Get a connection from the pool
    pub async fn get_connection(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| AppError::RedisError(format!("Failed to get Redis connection: {}", e)))
    }

    /// Ping Redis to check connectivity
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::RedisError(format!("Redis ping failed: {}", e)))?;
        Ok(())
    }

    /// Get a value from Redis
    pub async fn get<T: redis::FromRedisValue>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.get_connection().await?;
        conn.get(key)
            .await
            .map_err(|e| AppError::RedisError(format!("Failed to get key '{}': {}", key, e)))
    }

    /// Set a value in Redis
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        conn.set(key, value)
            .await
            .map_err(|e| AppError::RedisError(format!("Failed to set key '{}': {}", key, e)))
    }

    /// Set a value with expiration
    pub async fn setex(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        let mut conn = self.get_connection().await?;
        conn.set_ex(key, value, seconds)
            .await
            .map_err(|e| AppError::RedisError(format!("Failed to setex key '{}': {}", key, e)))
    }

    /// Delete one or more keys
    pub async fn del(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.get_connection().await?;
        conn.del(keys)
            .await
            .map_err(|e| AppError::RedisError(format!("Failed to delete keys {:?}: {}", keys, e)))
    }

    /// Remaining time to live of a key in seconds (-1 no expiry, -2 missing)
    pub async fn ttl(&self, key: &str) -> Result<i64> {
        let mut conn = self.get_connection().await?;
        conn.ttl(key)
            .await
            .map_err(|e| AppError::RedisError(format!("Failed to get TTL for '{}': {}", key, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::create_test_settings;

    #[test]
    fn test_pool_creation_is_lazy() {
        // No connection is made until the first command
        let settings = create_test_settings();
        assert!(RedisPool::new(&settings).is_ok());
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_redis_ping() {
        let settings = Settings::new().expect("Failed to load settings");
        let pool = RedisPool::new(&settings).expect("Failed to create Redis pool");

        let result = pool.ping().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_set_get_del() {
        let settings = Settings::new().expect("Failed to load settings");
        let pool = RedisPool::new(&settings).expect("Failed to create Redis pool");

        let test_key = "test:quality_compute:key";
        let test_value = "test_value";

        pool.set(test_key, test_value).await.expect("Failed to set");

        let result: Option<String> = pool.get(test_key).await.expect("Failed to get");
        assert_eq!(result, Some(test_value.to_string()));

        pool.del(&[test_key.to_string()])
            .await
            .expect("Failed to delete");
        let result: Option<String> = pool.get(test_key).await.expect("Failed to get");
        assert_eq!(result, None);
    }
}
