//! HTTP API: suggestions, health checks and Prometheus metrics

use advisor_lib::{
    compute_suggestions, present,
    observability::{AdvisorMetrics, StructuredLogger},
    resolve_workloads, ErrorBody, SuggestRequest, SuggestResponse, SuggestionSummary,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state
pub struct AppState {
    pub metrics: AdvisorMetrics,
    pub logger: StructuredLogger,
    pub instance: String,
    pub version: String,
    ready: AtomicBool,
}

impl AppState {
    pub fn new(
        metrics: AdvisorMetrics,
        logger: StructuredLogger,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            metrics,
            logger,
            instance: instance.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ready: AtomicBool::new(false),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    instance: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct ReadinessStatus {
    ready: bool,
}

/// Liveness check, always 200 while the process serves requests
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthStatus {
        status: "healthy",
        instance: state.instance.clone(),
        version: state.version.clone(),
    };
    (StatusCode::OK, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ready = state.is_ready();
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(ReadinessStatus { ready }))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(e.to_string())))
            .into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Evaluate one namespace snapshot
async fn suggestions(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<SuggestRequest>,
) -> Response {
    let window = match request.lookback_window() {
        Ok(window) => window,
        Err(e) => {
            state.metrics.inc_rejected_requests();
            state.logger.log_rejected(&e.to_string());
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string()))).into_response();
        }
    };

    resolve_workloads(&mut request.workloads);

    let started = Instant::now();
    let ranked = compute_suggestions(&request.workloads, request.history.as_ref());
    let evaluated = SuggestionSummary::from_suggestions(&ranked);
    let elapsed = started.elapsed().as_secs_f64();

    let history_entries = request
        .history
        .as_ref()
        .map(|h| h.containers.len())
        .unwrap_or(0);
    state
        .metrics
        .record_evaluation(elapsed, request.workloads.len(), &evaluated);
    state.logger.log_evaluation(
        request.namespace(),
        request.workloads.len(),
        history_entries,
        &evaluated,
    );

    let view = present(ranked, &request.display_options());
    (StatusCode::OK, Json(SuggestResponse::from_view(view, window))).into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/suggestions", post(suggestions))
        .with_state(state)
}

/// Start the API server
///
/// The ready flag is raised once the listener is bound.
pub async fn serve(addr: String, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state.clone());

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    state.set_ready(true);
    axum::serve(listener, app).await?;

    Ok(())
}
