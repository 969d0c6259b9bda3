// Copyright 2026 Transcript Engine Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API in front of the engine.
//!
//! Routes:
//! - `GET /health`: liveness, no key required
//! - `GET /Cgpa` and `GET /Cgpa/`: banner
//! - `POST /Cgpa/result`: `{ "regNo": "..." }` as JSON or a url-encoded form
//!
//! Everything under `/Cgpa` requires an `x-api-key` header matching the
//! configured key. `warning` outcomes answer 400, `error` outcomes 500.

use crate::engine::{outcome_json, TranscriptEngine};
use crate::error::Severity;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info};

/// Origin of the local frontend dev server.
const DEV_FRONTEND_ORIGIN: &str = "http://localhost:5173";

const API_KEY_HEADER: &str = "x-api-key";

/// Options for the REST layer itself.
#[derive(Debug, Clone)]
pub struct RestOptions {
    /// Key clients must send in `x-api-key`. `None` rejects every request.
    pub api_key: Option<String>,
    /// Extra allowed CORS origin.
    pub frontend_url: Option<String>,
    /// Upper bound on lookups running at once.
    pub max_concurrent_lookups: usize,
}

impl Default for RestOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            frontend_url: None,
            max_concurrent_lookups: 4,
        }
    }
}

/// Shared state behind every handler.
pub struct AppState {
    engine: TranscriptEngine,
    api_key: Option<String>,
    lookups: Semaphore,
}

impl AppState {
    pub fn new(engine: TranscriptEngine, options: &RestOptions) -> Self {
        Self {
            engine,
            api_key: options.api_key.clone(),
            lookups: Semaphore::new(options.max_concurrent_lookups.max(1)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LookupRequest {
    #[serde(rename = "regNo", default)]
    reg_no: Option<String>,
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>, frontend_url: Option<&str>) -> Router {
    // Both `/Cgpa` and `/Cgpa/` answer the banner.
    let cgpa = Router::new()
        .route("/Cgpa", get(home))
        .route("/Cgpa/", get(home))
        .route("/Cgpa/result", post(result))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(cgpa)
        .layer(cors(frontend_url))
        .with_state(state)
}

/// Start the REST API server.
pub async fn start(
    addr: std::net::SocketAddr,
    state: Arc<AppState>,
    frontend_url: Option<String>,
) -> anyhow::Result<()> {
    let app = router(state, frontend_url.as_deref());
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors(frontend_url: Option<&str>) -> CorsLayer {
    let mut origins = vec![HeaderValue::from_static(DEV_FRONTEND_ORIGIN)];
    if let Some(url) = frontend_url {
        match HeaderValue::from_str(url.trim_end_matches('/')) {
            Ok(v) => origins.push(v),
            Err(e) => error!("ignoring invalid frontend origin {url:?}: {e}"),
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::HEAD,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
        .allow_credentials(true)
}

// ── Middleware ──────────────────────────────────────────────────

async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(server_key) = state.api_key.as_deref() else {
        error!("API key is not configured");
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Server env missing API key");
    };

    let client_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if client_key != Some(server_key) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized request");
    }

    next.run(req).await
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "type": "error", "message": message }))).into_response()
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn home() -> Json<Value> {
    Json(json!({ "type": "info", "message": "Result Scraper Home" }))
}

async fn result(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let body = read_lookup_request(req).await;

    let Ok(_permit) = state.lookups.acquire().await else {
        return failure(StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down");
    };

    let reg_no = body.reg_no.unwrap_or_default();
    let outcome = state.engine.submit_registration_number(&reg_no).await;
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => match e.severity() {
            Severity::Warning => StatusCode::BAD_REQUEST,
            Severity::Error => StatusCode::INTERNAL_SERVER_ERROR,
        },
    };
    info!(status = status.as_u16(), "POST /Cgpa/result");

    (status, Json(outcome_json(&outcome))).into_response()
}

/// Accept JSON or url-encoded bodies. An unreadable body counts as empty.
async fn read_lookup_request(req: Request) -> LookupRequest {
    let is_form = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        Form::<LookupRequest>::from_request(req, &())
            .await
            .map(|Form(body)| body)
            .unwrap_or_default()
    } else {
        Json::<LookupRequest>::from_request(req, &())
            .await
            .map(|Json(body)| body)
            .unwrap_or_default()
    }
}
