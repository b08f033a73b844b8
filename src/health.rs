//! Health check module
//! Provides health status for the application and its dependencies

use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{error, info, warn};

#[cfg(feature = "cache")]
use crate::cache::RedisCache;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Health status response
#[derive(Debug, Serialize, Clone)]
pub struct HealthStatus {
    pub status: HealthState,
    pub checks: HashMap<String, ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Overall health state
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    /// Serving, but an optional dependency (the cache) is down
    Degraded,
    Unhealthy,
}

/// Individual component health status
#[derive(Debug, Serialize, Clone)]
pub struct ComponentHealth {
    pub status: ComponentState,
    pub response_time_ms: Option<u128>,
    pub details: Option<String>,
}

/// Component state
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum ComponentState {
    Up,
    Down,
    Warning,
}

impl HealthStatus {
    pub fn new() -> Self {
        Self {
            status: HealthState::Healthy,
            checks: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthState::Healthy)
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentHealth {
    pub fn up(response_time_ms: Option<u128>) -> Self {
        Self {
            status: ComponentState::Up,
            response_time_ms,
            details: None,
        }
    }

    pub fn down(details: Option<String>) -> Self {
        Self {
            status: ComponentState::Down,
            response_time_ms: None,
            details,
        }
    }

    pub fn warning(response_time_ms: Option<u128>, details: Option<String>) -> Self {
        Self {
            status: ComponentState::Warning,
            response_time_ms,
            details,
        }
    }
}

/// Health checker for the application
///
/// Without a pool the service runs on the in-memory store, which is
/// reported as up.
#[derive(Clone, Default)]
pub struct HealthChecker {
    db_pool: Option<sqlx::PgPool>,
    #[cfg(feature = "cache")]
    cache: Option<RedisCache>,
}

impl HealthChecker {
    pub fn new(db_pool: Option<sqlx::PgPool>) -> Self {
        Self {
            db_pool,
            #[cfg(feature = "cache")]
            cache: None,
        }
    }

    #[cfg(feature = "cache")]
    pub fn with_cache(mut self, cache: Option<RedisCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Perform comprehensive health check
    pub async fn check_health(&self) -> HealthStatus {
        let mut health_status = HealthStatus::new();
        let mut unhealthy = false;
        let mut degraded = false;

        match &self.db_pool {
            Some(pool) => match timeout(CHECK_TIMEOUT, check_database_health(pool)).await {
                Ok(Ok(response_time)) => {
                    health_status.checks.insert(
                        "database".to_string(),
                        ComponentHealth::up(Some(response_time)),
                    );
                    info!("Database health check: OK ({}ms)", response_time);
                }
                Ok(Err(e)) => {
                    unhealthy = true;
                    health_status.checks.insert(
                        "database".to_string(),
                        ComponentHealth::down(Some(e.to_string())),
                    );
                    error!("Database health check failed: {}", e);
                }
                Err(_) => {
                    unhealthy = true;
                    health_status.checks.insert(
                        "database".to_string(),
                        ComponentHealth::down(Some("Timeout".to_string())),
                    );
                    error!("Database health check timed out");
                }
            },
            None => {
                let mut store = ComponentHealth::up(None);
                store.details = Some("in-memory store".to_string());
                health_status.checks.insert("database".to_string(), store);
            }
        }

        #[cfg(feature = "cache")]
        if let Some(cache) = &self.cache {
            match timeout(CHECK_TIMEOUT, check_cache_health(cache)).await {
                Ok(Ok(response_time)) => {
                    health_status.checks.insert(
                        "cache".to_string(),
                        ComponentHealth::up(Some(response_time)),
                    );
                    info!("Cache health check: OK ({}ms)", response_time);
                }
                Ok(Err(e)) => {
                    degraded = true;
                    health_status.checks.insert(
                        "cache".to_string(),
                        ComponentHealth::warning(None, Some(e.to_string())),
                    );
                    warn!("Cache health check failed, reads fall back to database: {}", e);
                }
                Err(_) => {
                    degraded = true;
                    health_status.checks.insert(
                        "cache".to_string(),
                        ComponentHealth::warning(None, Some("Timeout".to_string())),
                    );
                    warn!("Cache health check timed out");
                }
            }
        }

        health_status.status = if unhealthy {
            HealthState::Unhealthy
        } else if degraded {
            HealthState::Degraded
        } else {
            HealthState::Healthy
        };

        health_status
    }
}

pub async fn check_database_health(
    pool: &sqlx::PgPool,
) -> Result<u128, Box<dyn std::error::Error + Send + Sync>> {
    let start = Instant::now();

    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => Ok(start.elapsed().as_millis()),
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(feature = "cache")]
pub async fn check_cache_health(
    cache: &RedisCache,
) -> Result<u128, Box<dyn std::error::Error + Send + Sync>> {
    let start = Instant::now();

    match cache.get_connection().await {
        Ok(mut conn) => {
            let result: redis::RedisResult<String> =
                redis::cmd("PING").query_async(&mut *conn).await;
            match result {
                Ok(_) => Ok(start.elapsed().as_millis()),
                Err(e) => Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
            }
        }
        Err(e) => Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_status_creation() {
        let health_status = HealthStatus::new();
        assert!(matches!(health_status.status, HealthState::Healthy));
        assert!(health_status.checks.is_empty());
        assert!(health_status.timestamp <= chrono::Utc::now());
    }

    #[test]
    fn test_component_health_states() {
        let up_health = ComponentHealth::up(Some(100));
        assert!(matches!(up_health.status, ComponentState::Up));
        assert_eq!(up_health.response_time_ms, Some(100));

        let down_health = ComponentHealth::down(Some("Test error".to_string()));
        assert!(matches!(down_health.status, ComponentState::Down));
        assert_eq!(down_health.details, Some("Test error".to_string()));

        let warning_health = ComponentHealth::warning(Some(500), Some("Slow response".to_string()));
        assert!(matches!(warning_health.status, ComponentState::Warning));
        assert_eq!(warning_health.details, Some("Slow response".to_string()));
    }

    #[tokio::test]
    async fn test_in_memory_checker_is_healthy() {
        let status = HealthChecker::new(None).check_health().await;

        assert!(status.is_healthy());
        assert_eq!(status.checks["database"].status, ComponentState::Up);
        assert_eq!(
            status.checks["database"].details.as_deref(),
            Some("in-memory store")
        );
    }
}
