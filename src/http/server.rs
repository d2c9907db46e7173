//! HTTP server setup and handlers.
//!
//! # Responsibilities
//! - Create the Axum router with the transaction endpoints
//! - Serve static files from the configured directory
//! - Wire up middleware (request timeout, request ID, tracing)
//! - Run with graceful shutdown
//!
//! Failures inside the submission pipeline are logged with their cause and
//! collapsed into a single opaque 502 envelope for the caller; the HTTP
//! surface never distinguishes failure causes.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::BridgeConfig;
use crate::gateway::{GatewayConnector, Submitter, TransactionRequest, TransactionResult};
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub submitter: Arc<Submitter>,
}

/// HTTP server for the gateway bridge.
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given gateway connector.
    pub fn new(config: BridgeConfig, connector: Arc<dyn GatewayConnector>) -> Self {
        let state = AppState {
            submitter: Arc::new(Submitter::new(connector)),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BridgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/submitTX", post(submit_tx))
            .route("/evaluateTX", post(evaluate_tx))
            .fallback_service(ServeDir::new(&config.listener.static_dir))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown coordinator fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut signal = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = signal.recv().await;
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

/// `POST /submitTX`: submit a transaction and wait for commit.
async fn submit_tx(
    State(state): State<AppState>,
    Json(request): Json<TransactionRequest>,
) -> Response {
    tracing::info!(
        organization = %request.organization,
        channel = %request.channel,
        chaincode = %request.chaincode,
        transaction = %request.tx_name,
        params = request.tx_params.len(),
        "submitting transaction"
    );

    match state.submitter.submit(&request).await {
        Ok(result) => result_response(result),
        Err(e) => {
            tracing::error!(transaction = %request.tx_name, error = %e, "transaction submission failed");
            failure_response()
        }
    }
}

/// `POST /evaluateTX`: evaluate a transaction without committing.
async fn evaluate_tx(
    State(state): State<AppState>,
    Json(request): Json<TransactionRequest>,
) -> Response {
    tracing::info!(
        organization = %request.organization,
        channel = %request.channel,
        chaincode = %request.chaincode,
        transaction = %request.tx_name,
        "evaluating transaction"
    );

    match state.submitter.evaluate(&request).await {
        Ok(result) => result_response(result),
        Err(e) => {
            tracing::error!(transaction = %request.tx_name, error = %e, "transaction evaluation failed");
            failure_response()
        }
    }
}

/// JSON results are returned as JSON; anything else as text.
fn result_response(result: TransactionResult) -> Response {
    match result.json() {
        Some(json) => Json(json).into_response(),
        None => result.text().into_owned().into_response(),
    }
}

fn failure_response() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": "transaction submission failed" })),
    )
        .into_response()
}
