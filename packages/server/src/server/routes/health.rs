use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Duration;

use crate::server::app::AxumAppState;

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
    connection_pool: PoolStats,
    llm_provider: String,
    llm_model: String,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DatabaseHealth {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Serialize)]
pub struct PoolStats {
    size: u32,
    idle_connections: usize,
    max_connections: u32,
}

async fn check_database(pool: &PgPool) -> DatabaseHealth {
    let error = match tokio::time::timeout(DB_CHECK_TIMEOUT, sqlx::query("SELECT 1").execute(pool))
        .await
    {
        Ok(Ok(_)) => None,
        Ok(Err(e)) => Some(format!("Query failed: {}", e)),
        Err(_) => Some(format!("Query timeout (>{}s)", DB_CHECK_TIMEOUT.as_secs())),
    };

    DatabaseHealth {
        status: if error.is_none() { "ok" } else { "error" },
        error,
    }
}

/// GET /health
///
/// 503 when the database check fails; the active LLM provider is reported
/// but never called.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state.db_pool).await;
    let llm = state.server_deps.llm.current_config().await;

    let connection_pool = PoolStats {
        size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
        max_connections: state.db_pool.options().get_max_connections(),
    };

    let (code, status) = if database.is_ok() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            connection_pool,
            llm_provider: llm.provider.to_string(),
            llm_model: llm.model,
        }),
    )
}
