//! HTTP API for report downloads

use crate::domain::ReportPeriod;
use crate::error::AppResult;
use crate::report::ReportEngine;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub const SERVICE_NAME: &str = "payroll-report";

/// HTTP server exposing report generation
pub struct ReportServer {
    engine: Arc<ReportEngine>,
    addr: SocketAddr,
}

impl ReportServer {
    pub fn new(engine: Arc<ReportEngine>, addr: SocketAddr) -> Self {
        Self { engine, addr }
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> AppResult<()> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("Starting report API server on {}", listener.local_addr()?);

        axum::serve(listener, build_router(self.engine))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Report API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[derive(Clone)]
struct ApiState {
    engine: Arc<ReportEngine>,
}

pub fn build_router(engine: Arc<ReportEngine>) -> Router {
    let shared_state = Arc::new(ApiState { engine });

    Router::new()
        .route("/api/report/{year}/{month}", get(download_report))
        .route("/api/test", get(service_info))
        .route("/api/test/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    timestamp: DateTime<Local>,
    version: &'static str,
    endpoints: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    service: &'static str,
    timestamp: DateTime<Local>,
}

fn bad_request(message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

async fn download_report(
    State(state): State<Arc<ApiState>>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> Response {
    let (year, month) = match path {
        Ok(Path(segments)) => segments,
        Err(rejection) => {
            warn!("Rejected report request: {}", rejection.body_text());
            return bad_request("Year and month must be integers");
        }
    };

    let period = match ReportPeriod::new(year, month) {
        Ok(period) => period,
        Err(e) => {
            warn!("Rejected report request {}/{}: {}", year, month, e.message());
            return bad_request(e.message());
        }
    };

    let file = state.engine.generate(period).await;
    if file.is_error {
        warn!("Serving system error report {}", file.file_name);
    }

    let headers = [
        (header::CONTENT_TYPE, file.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ),
    ];
    (headers, file.into_bytes()).into_response()
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Payroll report service is running",
        timestamp: Local::now(),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: [
            "/api/test - This test endpoint",
            "/api/report/{year}/{month} - Generate report for specific year/month",
        ],
    })
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Local::now(),
    })
}
