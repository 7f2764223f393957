//! Per-viewer "last seen alert" markers.
//!
//! Unread state is derived, never stored on the alert: a viewer has unread
//! alerts when the newest alert visible to them differs from their marker.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::CACHE_PREFIX_ALERT_SEEN;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Key-value store for alert markers, keyed by username.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SeenMarkerStore: Send + Sync {
    async fn last_seen(&self, username: &str) -> AppResult<Option<Uuid>>;

    async fn mark_seen(&self, username: &str, alert_id: Uuid) -> AppResult<()>;
}

/// Process-local markers.
#[derive(Debug, Default)]
pub struct InMemorySeenMarkers {
    markers: RwLock<HashMap<String, Uuid>>,
}

impl InMemorySeenMarkers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeenMarkerStore for InMemorySeenMarkers {
    async fn last_seen(&self, username: &str) -> AppResult<Option<Uuid>> {
        Ok(self.markers.read().await.get(username).copied())
    }

    async fn mark_seen(&self, username: &str, alert_id: Uuid) -> AppResult<()> {
        self.markers
            .write()
            .await
            .insert(username.to_string(), alert_id);
        Ok(())
    }
}

/// Markers shared through Redis, so they survive restarts and are seen by
/// every instance.
#[derive(Clone)]
pub struct RedisSeenMarkers {
    connection: ConnectionManager,
}

impl RedisSeenMarkers {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis alert markers connected");

        Ok(Self { connection })
    }

    fn key(username: &str) -> String {
        format!("{}{}", CACHE_PREFIX_ALERT_SEEN, username)
    }
}

#[async_trait]
impl SeenMarkerStore for RedisSeenMarkers {
    async fn last_seen(&self, username: &str) -> AppResult<Option<Uuid>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(Self::key(username)).await?;

        value
            .map(|raw| {
                Uuid::parse_str(&raw)
                    .map_err(|e| AppError::internal(format!("Corrupt alert marker: {}", e)))
            })
            .transpose()
    }

    async fn mark_seen(&self, username: &str, alert_id: Uuid) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(Self::key(username), alert_id.to_string())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_markers_are_per_viewer() {
        let markers = InMemorySeenMarkers::new();
        let alert = Uuid::new_v4();

        markers.mark_seen("admin", alert).await.unwrap();

        assert_eq!(markers.last_seen("admin").await.unwrap(), Some(alert));
        assert_eq!(markers.last_seen("user1").await.unwrap(), None);
    }

    #[test]
    fn test_redis_key_layout() {
        assert_eq!(RedisSeenMarkers::key("user1"), "alerts:last_seen:user1");
    }
}
