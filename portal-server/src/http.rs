//! Portal HTTP REST API
//!
//! Axum front for the character facade. Each endpoint has a thin axum
//! handler that delegates to a testable inner function, so the routing
//! layer stays boilerplate and the behavior can be exercised without
//! dispatch machinery.
//!
//! Endpoints:
//! - GET /                      — welcome document listing the endpoints
//! - GET /health                — liveness + version
//! - GET /api/character/random  — one uniformly random character
//! - GET /api/character/statuses — the fixed status vocabulary
//! - GET /api/character/status/:status — random character with that status
//! - GET /api/character/search?q={query} — name search
//! - GET /api/character/mock    — fixed sample payload, no upstream call

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use portal_core::{CharacterService, PortalConfig, PortalError, UpstreamClient};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

/// Shared state for all HTTP handlers.
pub struct HttpState {
    pub service: CharacterService,
}

/// Build the Axum router with all endpoints. CORS is permissive — the
/// facade serves public read-only data.
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/api/character/random", get(random_handler))
        .route("/api/character/statuses", get(statuses_handler))
        .route("/api/character/status/:status", get(by_status_handler))
        .route("/api/character/search", get(search_handler))
        .route("/api/character/mock", get(mock_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    config: PortalConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let client = UpstreamClient::new(&config.upstream)?;
    let state = Arc::new(HttpState {
        service: CharacterService::new(client),
    });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Portal HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

// ============================================================================
// Error mapping
// ============================================================================

/// Map the facade's error taxonomy onto HTTP statuses. Upstream non-2xx
/// codes pass through unchanged.
pub fn error_status(err: &PortalError) -> StatusCode {
    match err {
        PortalError::Validation(_) => StatusCode::BAD_REQUEST,
        PortalError::NotFound(_) => StatusCode::NOT_FOUND,
        PortalError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        PortalError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        PortalError::Upstream { status } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        PortalError::MalformedUpstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PortalError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a facade result into `(status_code, json_body)`.
pub fn respond<T: Serialize>(result: Result<T, PortalError>) -> (StatusCode, serde_json::Value) {
    match result {
        Ok(payload) => match serde_json::to_value(&payload) {
            Ok(body) => (StatusCode::OK, body),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": e.to_string(),
                    "status_code": 500,
                }),
            ),
        },
        Err(e) => {
            let status = error_status(&e);
            tracing::error!(status = status.as_u16(), error = %e, "request failed");
            (
                status,
                serde_json::json!({
                    "error": e.to_string(),
                    "status_code": status.as_u16(),
                }),
            )
        }
    }
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Inner home — welcome document (pure, no IO).
pub fn home_inner() -> serde_json::Value {
    serde_json::json!({
        "message": "Welcome to the character portal",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "random_character": "/api/character/random",
            "character_statuses": "/api/character/statuses",
            "character_by_status": "/api/character/status/{status}",
            "search_characters": "/api/character/search?q={query}"
        }
    })
}

/// Inner health — liveness only; the upstream is not probed here.
pub fn health_inner() -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    })
}

/// Inner mock — fixed sample of the flattened shape, no upstream call.
pub fn mock_inner() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "name": "Rick Sanchez",
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": "Earth (C-137)",
        "location": "Citadel of Ricks",
        "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
        "episodeCount": 51,
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub async fn random_inner(service: &CharacterService) -> (StatusCode, serde_json::Value) {
    respond(service.random_character().await)
}

pub fn statuses_inner(service: &CharacterService) -> (StatusCode, serde_json::Value) {
    respond(Ok(service.character_statuses()))
}

pub async fn by_status_inner(
    service: &CharacterService,
    status: &str,
) -> (StatusCode, serde_json::Value) {
    respond(service.character_by_status(status).await)
}

/// Inner search — a missing `q` parameter is the same validation failure
/// as a too-short one.
pub async fn search_inner(
    service: &CharacterService,
    params: SearchParams,
) -> (StatusCode, serde_json::Value) {
    let query = params.q.unwrap_or_default();
    respond(service.search_characters(&query).await)
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn home_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(home_inner()))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(health_inner()))
}

pub async fn mock_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(mock_inner()))
}

pub async fn random_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = random_inner(&state.service).await;
    (status, Json(body))
}

pub async fn statuses_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = statuses_inner(&state.service);
    (status, Json(body))
}

pub async fn by_status_handler(
    State(state): State<Arc<HttpState>>,
    Path(status_filter): Path<String>,
) -> impl IntoResponse {
    let (status, body) = by_status_inner(&state.service, &status_filter).await;
    (status, Json(body))
}

pub async fn search_handler(
    State(state): State<Arc<HttpState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let (status, body) = search_inner(&state.service, params).await;
    (status, Json(body))
}

// ============================================================================
// Unit tests — inner functions, no axum dispatch
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_inner_lists_endpoints() {
        let body = home_inner();
        assert!(body["version"].is_string());
        assert_eq!(
            body["endpoints"]["random_character"],
            "/api/character/random"
        );
    }

    #[test]
    fn test_health_inner_reports_healthy() {
        let body = health_inner();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_mock_inner_matches_flat_shape() {
        let body = mock_inner();
        assert_eq!(body["id"], 1);
        assert_eq!(body["episodeCount"], 51);
        assert_eq!(body["origin"], "Earth (C-137)");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&PortalError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&PortalError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&PortalError::Upstream { status: 404 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&PortalError::Upstream { status: 429 }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            error_status(&PortalError::MalformedUpstream("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_status_invalid_upstream_code_falls_back_to_502() {
        assert_eq!(
            error_status(&PortalError::Upstream { status: 42 }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_respond_error_body_carries_status_code() {
        let (status, body) =
            respond::<serde_json::Value>(Err(PortalError::Validation("too short".into())));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status_code"], 400);
        assert!(body["error"].as_str().unwrap().contains("too short"));
    }

    #[test]
    fn test_respond_ok_serializes_payload() {
        let (status, body) = respond(Ok(serde_json::json!({"total": 0, "result": []})));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
    }
}
