use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Settings;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub schema_file: String,
    pub assets_dir: String,
}

pub struct HealthHandler {
    settings: Arc<Settings>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            start_time: std::time::Instant::now(),
        }
    }

    fn checks(&self) -> HealthChecks {
        let describe = |configured: bool, present: bool| match (configured, present) {
            (false, _) => "not_configured",
            (true, true) => "ok",
            (true, false) => "missing",
        };
        let schema = self.settings.editor.schema_path.as_deref();
        let assets = self.settings.assets.dir.as_deref();

        HealthChecks {
            schema_file: describe(schema.is_some(), schema.is_some_and(|p| p.is_file())).to_string(),
            assets_dir: describe(assets.is_some(), assets.is_some_and(|p| p.is_dir())).to_string(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: self.checks(),
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - fails when a configured file has gone missing
    pub async fn ready(&self) -> impl IntoResponse {
        let checks = self.checks();
        let ok = checks.schema_file != "missing" && checks.assets_dir != "missing";

        if ok {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "checks": checks
            })))
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "checks": checks
            })))
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(serde_json::json!({
            "status": "alive",
            "message": "Server is alive"
        })))
    }
}
