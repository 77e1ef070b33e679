mod journalpost;
mod soknad;

use std::time::Instant;

use axum::extract::{MatchedPath, State};
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router, body::Body, middleware};
use serde::Serialize;

use punsj_domain::error::DomainError;

use crate::error::ApiError;
use crate::middleware as app_middleware;
use crate::observability;
use crate::state::AppState;

pub const NORSK_IDENT_HEADER: &str = "x-nav-norskident";
pub const SAKSBEHANDLER_HEADER: &str = "x-nav-saksbehandler";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route(
            "/api/journalpost/:journalpost_id",
            get(journalpost::hent_journalpost_info),
        )
        .route(
            "/api/journalpost/:journalpost_id/vent",
            post(journalpost::sett_paa_vent),
        )
        .route("/api/:soknad_type", post(soknad::ny_soknad))
        .route("/api/:soknad_type/mappe", get(soknad::hent_mappe))
        .route(
            "/api/:soknad_type/mappe/:soknad_id",
            get(soknad::hent_soknad),
        )
        .route("/api/:soknad_type/oppdater", put(soknad::oppdater_soknad))
        .route(
            "/api/:soknad_type/send",
            post(soknad::send_soknad).delete(soknad::slett_soknad),
        )
        .route("/api/:soknad_type/valider", post(soknad::valider_soknad))
        .layer(app_middleware::timeout_layer())
        .layer(app_middleware::trace_layer())
        .layer(app_middleware::set_request_id_layer())
        .layer(app_middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(
            app_middleware::correlation_id_middleware,
        ))
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.app_env.clone(),
    })
}

async fn metrics() -> Result<String, ApiError> {
    observability::render_metrics().ok_or(ApiError::Internal)
}

async fn track_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    observability::register_http_request(&method, &route, response.status(), start.elapsed());
    response
}

pub(crate) fn norsk_ident_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(NORSK_IDENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(std::string::ToString::to_string)
        .ok_or_else(|| ApiError::Validation("missing norsk ident header".into()))
}

pub(crate) fn saksbehandler_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SAKSBEHANDLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(std::string::ToString::to_string)
}

pub(crate) fn map_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(message) => ApiError::Validation(message),
        DomainError::ManglerYtelse => {
            ApiError::Validation("new folder requires a benefit type".into())
        }
        DomainError::NotFound => ApiError::NotFound,
        DomainError::Conflict => ApiError::Conflict,
        DomainError::AccessDenied => ApiError::AccessDenied,
        DomainError::Publish(message) => {
            tracing::error!(error = %message, "publisering feilet, lokal tilstand er urørt");
            ApiError::Internal
        }
        DomainError::IllegalState(message) => {
            tracing::error!(error = %message, "illegal state");
            ApiError::Internal
        }
    }
}
