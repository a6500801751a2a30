//! Health Handlers
//!
//! `/health/ready` checks Postgres and reports how pushes and presence are
//! delivered. Without Redis the API keeps serving, but notification and chat
//! pushes are dropped and every user shows as offline, so readiness reports
//! `degraded` rather than failing.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::infrastructure::metrics;
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct Check {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Check {
    fn healthy() -> Self {
        Self {
            status: CheckStatus::Healthy,
            message: None,
        }
    }

    fn failed(status: CheckStatus, message: String) -> Self {
        Self {
            status,
            message: Some(message),
        }
    }
}

/// Where domain events and presence currently go
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Delivery {
    /// `redis-pubsub` or `dropped`
    pub events: &'static str,
    /// `redis` or `offline`
    pub presence: &'static str,
}

impl Delivery {
    fn for_state(state: &AppState) -> Self {
        if state.redis.is_some() {
            Self {
                events: "redis-pubsub",
                presence: "redis",
            }
        } else {
            Self {
                events: "dropped",
                presence: "offline",
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Checks {
    pub database: Check,
    pub redis: Check,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: CheckStatus,
    pub version: &'static str,
    pub checks: Checks,
    pub delivery: Delivery,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe: 200 while the process is serving requests
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "alive" })
}

/// Readiness probe: 503 only when the database is unreachable
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let database = check_database(&state).await;
    metrics::update_db_pool_stats(
        state.db.num_idle() as u32,
        state.db.size().saturating_sub(state.db.num_idle() as u32),
    );
    let redis = check_redis(&state).await;

    let status = overall_status(&database, &redis);
    let code = match status {
        CheckStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        CheckStatus::Healthy | CheckStatus::Degraded => StatusCode::OK,
    };

    let body = ReadinessResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: Checks { database, redis },
        delivery: Delivery::for_state(&state),
    };

    (code, Json(body))
}

async fn check_database(state: &AppState) -> Check {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Check::healthy(),
        Err(e) => Check::failed(
            CheckStatus::Unhealthy,
            format!("Database connection failed: {}", e),
        ),
    }
}

async fn check_redis(state: &AppState) -> Check {
    let Some(redis) = &state.redis else {
        return Check::failed(
            CheckStatus::Degraded,
            "Redis not configured: pushes are dropped and presence is offline".to_string(),
        );
    };

    let mut conn = redis.clone();
    match redis::cmd("PING").query_async::<String>(&mut conn).await {
        Ok(_) => Check::healthy(),
        Err(e) => Check::failed(
            CheckStatus::Degraded,
            format!("Redis connection failed: {}", e),
        ),
    }
}

/// The database gates readiness; Redis only degrades it.
fn overall_status(database: &Check, redis: &Check) -> CheckStatus {
    if database.status == CheckStatus::Unhealthy {
        CheckStatus::Unhealthy
    } else if redis.status != CheckStatus::Healthy {
        CheckStatus::Degraded
    } else {
        CheckStatus::Healthy
    }
}
