use anyhow::Context;
use gateway_settings_backend::api::{build_router, AdminState};
use gateway_settings_backend::config::AppConfig;
use gateway_settings_backend::database::memory::InMemorySettingsStore;
use gateway_settings_backend::database::repository::SettingsStore;
use gateway_settings_backend::database::settings_repository::PgSettingsStore;
use gateway_settings_backend::database::{init_pool_from_config, TableNames};
use gateway_settings_backend::health::HealthChecker;
use gateway_settings_backend::logging::init_tracing;
use gateway_settings_backend::middleware::logging::{request_logging_middleware, UuidRequestId};
use gateway_settings_backend::payments::registry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::{error, info};

#[cfg(feature = "cache")]
use gateway_settings_backend::cache::{init_cache_pool, CacheConfig, RedisCache};
#[cfg(feature = "cache")]
use gateway_settings_backend::database::cached_store::CachedSettingsStore;
#[cfg(feature = "cache")]
use std::time::Duration;

/// Redis in front of the option table, or `None` to read straight from
/// Postgres
#[cfg(feature = "cache")]
async fn connect_cache(config: &AppConfig) -> Option<RedisCache> {
    if !config.cache.enabled {
        return None;
    }

    info!("🔄 Initializing Redis cache connection pool...");
    match init_cache_pool(CacheConfig::from(&config.cache)).await {
        Ok(cache_pool) => {
            info!(redis_url = %config.cache.redis_url, "✅ Cache connection pool initialized");
            Some(
                RedisCache::new(cache_pool)
                    .with_default_ttl(Duration::from_secs(config.cache.default_ttl)),
            )
        }
        Err(e) => {
            tracing::warn!("Redis unavailable, serving options from the database: {}", e);
            None
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.logging);
    config.validate().context("invalid configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        skip_externals = config.skip_externals,
        "🚀 Starting payment gateway settings backend"
    );

    registry::validate().context("provider registry is inconsistent")?;
    info!(
        providers = registry::PROVIDER_SCHEMAS.len(),
        "✅ Provider registry loaded"
    );

    let (store, health): (Arc<dyn SettingsStore>, HealthChecker) = if config.skip_externals {
        info!("⏭️  Using in-memory settings store (SKIP_EXTERNALS=true)");
        (
            Arc::new(InMemorySettingsStore::seeded_from_registry()),
            HealthChecker::new(None),
        )
    } else {
        info!("📊 Initializing database connection pool...");
        let pool = init_pool_from_config(&config.database).await.map_err(|e| {
            error!("Failed to initialize database pool: {}", e);
            anyhow::anyhow!(e.to_string())
        })?;
        info!(
            max_connections = pool.options().get_max_connections(),
            "✅ Database connection pool initialized"
        );

        let tables = TableNames::with_prefix(&config.database.table_prefix)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        let store = PgSettingsStore::new(pool.clone(), &tables);
        let health = HealthChecker::new(Some(pool));

        #[cfg(feature = "cache")]
        let (store, health): (Arc<dyn SettingsStore>, HealthChecker) =
            match connect_cache(&config).await {
                Some(cache) => (
                    Arc::new(CachedSettingsStore::new(store, cache.clone())),
                    health.with_cache(Some(cache)),
                ),
                None => (Arc::new(store), health),
            };

        #[cfg(not(feature = "cache"))]
        let store: Arc<dyn SettingsStore> = Arc::new(store);

        (store, health)
    };

    let app = build_router(AdminState::new(store, config.site.clone()).with_health(health)).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(axum::middleware::from_fn(request_logging_middleware))
            .layer(PropagateRequestIdLayer::x_request_id()),
    );
    info!("✅ Routes configured");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid SERVER_HOST/SERVER_PORT")?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("❌ Failed to bind to address {}: {}", addr, e);
        e
    })?;

    info!(address = %addr, "🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}
