// Host-facing HTTP server
//
// Implements the five routes Journey Builder expects from a custom activity.
// The execute route is the only one with real behavior; the host treats any
// non-200 or unparsable answer as a broken activity, so every outcome is
// mapped onto the fixed response shape at HTTP 200.

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::contact::ContactRecord;
use crate::dispatch::{DispatchError, WebhookDispatcher};

/// Authoring-UI document served to the host's configuration modal.
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Execute request as sent by the host.
///
/// Both fields default to empty so partial bodies still parse; the host is
/// free to include additional fields, which are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionRequest {
    /// Ordered attribute bundles for the contact in flight
    pub in_arguments: Vec<Map<String, Value>>,
    /// Operator-authored activity settings, notably webhookUrl
    pub configuration_arguments: Map<String, Value>,
}

/// The single response shape the host can parse for /execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "webhookStatus", skip_serializing_if = "Option::is_none")]
    pub webhook_status: Option<u16>,
}

/// Unconditional acknowledgment for save/publish/validate.
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

/// Shared per-server state; everything else is request-local.
#[derive(Clone)]
pub struct AppState {
    dispatcher: WebhookDispatcher,
}

/// Build the host-facing router.
pub fn build_router(config: &Config) -> Router {
    let state = AppState {
        dispatcher: WebhookDispatcher::new(Duration::from_secs(config.webhook_timeout_secs)),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/save", post(save_handler))
        .route("/publish", post(publish_handler))
        .route("/validate", post(validate_handler))
        .route("/execute", post(execute_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and run the server until it is shut down externally.
pub async fn serve(config: &Config) -> Result<()> {
    let app = build_router(config);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://localhost:{}", config.port);
    info!(
        "Execute endpoint: POST http://localhost:{}/execute",
        config.port
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Serve the authoring-UI document
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Host-side configuration acknowledgment
async fn save_handler(body: Bytes) -> Json<AckResponse> {
    info!("/save called: {}", String::from_utf8_lossy(&body));
    Json(AckResponse { success: true })
}

/// Activation acknowledgment
async fn publish_handler() -> Json<AckResponse> {
    info!("/publish called");
    Json(AckResponse { success: true })
}

/// Pre-activation acknowledgment
async fn validate_handler() -> Json<AckResponse> {
    info!("/validate called");
    Json(AckResponse { success: true })
}

/// Core execution path: normalize, dispatch, respond.
///
/// The body is read as raw bytes and parsed leniently; an unparsable body
/// degrades to the empty request instead of a framework 4xx, keeping the
/// always-200 contract. Transport failures are reported to the host as
/// `success: true` (the inherited contract) but logged here so operators
/// still see the true outcome.
async fn execute_handler(State(state): State<AppState>, body: Bytes) -> Json<ExecutionResponse> {
    let request: ExecutionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("/execute body not parsable as JSON ({}), treating as empty", e);
            ExecutionRequest::default()
        }
    };

    info!(
        "/execute called with {} inArgument bundle(s)",
        request.in_arguments.len()
    );

    let contact = ContactRecord::from_in_arguments(&request.in_arguments);
    let webhook_url = request
        .configuration_arguments
        .get("webhookUrl")
        .and_then(Value::as_str);

    let response = match state.dispatcher.dispatch(webhook_url, contact).await {
        Ok(status) => {
            info!("Webhook responded with status {}", status);
            ExecutionResponse {
                success: true,
                error: None,
                webhook_status: Some(status),
            }
        }
        Err(DispatchError::Unconfigured) => {
            warn!("No webhookUrl in configurationArguments");
            ExecutionResponse {
                success: false,
                error: Some(DispatchError::Unconfigured.to_string()),
                webhook_status: None,
            }
        }
        Err(DispatchError::Transport(message)) => {
            // Masked from the host so the journey keeps progressing; this log
            // line is the operator-visible record of the real outcome.
            warn!("Webhook delivery failed: {}", message);
            ExecutionResponse {
                success: true,
                error: Some(message),
                webhook_status: None,
            }
        }
    };

    Json(response)
}
