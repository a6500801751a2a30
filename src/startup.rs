//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::services::Notifier;
use crate::config::Settings;
use crate::domain::{EventPublisher, NoopPublisher, OfflinePresence, PresenceTracker};
use crate::infrastructure::cache::{self, RedisEventPublisher, RedisPresence};
use crate::infrastructure::database;
use crate::infrastructure::repositories::PgNotificationRepository;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// `None` when Redis is unreachable at startup; events are then dropped
    /// and everyone shows as offline.
    pub redis: Option<ConnectionManager>,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub publisher: Arc<dyn EventPublisher>,
    pub presence: Arc<dyn PresenceTracker>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State without Redis: events are dropped, presence is always offline.
    pub fn without_redis(db: PgPool, settings: Settings) -> Self {
        Self {
            db,
            redis: None,
            snowflake: Arc::new(SnowflakeGenerator::new(
                settings.snowflake.machine_id as u64,
                settings.snowflake.epoch,
            )),
            publisher: Arc::new(NoopPublisher),
            presence: Arc::new(OfflinePresence),
            settings: Arc::new(settings),
        }
    }

    /// State backed by Redis for events and presence.
    pub fn with_redis(db: PgPool, redis: ConnectionManager, settings: Settings) -> Self {
        let prefix = settings.redis.key_prefix.clone();
        let ttl = settings.chat.presence_ttl_secs;

        Self {
            publisher: Arc::new(RedisEventPublisher::new(redis.clone(), prefix.clone())),
            presence: Arc::new(RedisPresence::new(redis.clone(), prefix, ttl)),
            redis: Some(redis),
            ..Self::without_redis(db, settings)
        }
    }

    /// Deduplicating notifier over the PostgreSQL notification store
    pub fn notifier(&self) -> Notifier<PgNotificationRepository> {
        Notifier::new(
            Arc::new(PgNotificationRepository::new(self.db.clone())),
            self.publisher.clone(),
            self.snowflake.clone(),
        )
    }
}

/// Router with middleware applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);

    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db).await?;
            tracing::info!("Database migrations applied");
        }

        let state = match cache::create_redis_client(&settings.redis).await {
            Ok(redis) => AppState::with_redis(db, redis, settings.clone()),
            Err(e) if !settings.is_production() => {
                tracing::warn!(error = %e, "Redis unavailable, running without events and presence");
                AppState::without_redis(db, settings.clone())
            }
            Err(e) => return Err(e.into()),
        };

        let router = build_router(state);

        let addr: SocketAddr = settings.server_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
