// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the portfolio service.
//!
//! Pages are rendered server-side. The contact form can be posted either as
//! JSON to `/api/contact` or as a regular form to `/contact`; both run the
//! same [`ContactPipeline`].

use crate::config::Config;
use crate::error::SubmitError;
use crate::form::FormView;
use crate::metrics::Metrics;
use crate::pipeline::ContactPipeline;
use crate::site::{Page, Site};
use crate::validator::{FormData, FormErrors};
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub pipeline: ContactPipeline,
    pub site: Site,
    pub metrics: Arc<Metrics>,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Contact submission response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "FormErrors::is_empty")]
    pub errors: FormErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(page))
        .route("/about", get(page))
        .route("/projects", get(page))
        .route("/contact", get(page).post(contact_form))
        .route("/api/contact", post(contact_api))
        .route("/health", get(health))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "portfolio-contact",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Render one of the static pages.
pub async fn page(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match Page::from_path(uri.path()) {
        Some(page) => Html(state.site.render(page, None)).into_response(),
        None => not_found(State(state)).await,
    }
}

pub async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    (StatusCode::NOT_FOUND, Html(state.site.render_not_found())).into_response()
}

/// Accept a JSON contact submission.
pub async fn contact_api(
    State(state): State<Arc<AppState>>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(form): Json<FormData>,
) -> Response {
    let client = client_key(&headers, connect.map(|c| c.0));
    debug!(client = %client, "Processing contact submission");

    match state.pipeline.submit(&client, &form).await {
        Ok(()) => Json(ContactResponse {
            success: true,
            code: None,
            errors: FormErrors::default(),
            retry_after_secs: None,
        })
        .into_response(),
        Err(err) => {
            let status = status_for(&err);
            let body = Json(ContactResponse {
                success: false,
                code: Some(err.code()),
                errors: err.to_form_errors(),
                retry_after_secs: retry_after_secs(&err),
            });
            with_retry_after(&err, (status, body).into_response())
        }
    }
}

/// Accept a classic form post and re-render the contact page.
pub async fn contact_form(
    State(state): State<Arc<AppState>>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Form(form): Form<FormData>,
) -> Response {
    let client = client_key(&headers, connect.map(|c| c.0));

    let result = state.pipeline.submit(&client, &form).await;
    let (status, view) = match &result {
        Ok(()) => (
            StatusCode::OK,
            FormView {
                data: FormData::default(),
                errors: FormErrors::default(),
                is_submitting: false,
                submitted: true,
                is_rate_limited: false,
                time_to_reset_ms: 0,
            },
        ),
        Err(err) => {
            let mut data = form.sanitized();
            data.honeypot.clear();
            let retry_after = match err {
                SubmitError::RateLimited { retry_after } => Some(*retry_after),
                _ => None,
            };
            (
                status_for(err),
                FormView {
                    data,
                    errors: err.to_form_errors(),
                    is_submitting: false,
                    submitted: false,
                    is_rate_limited: retry_after.is_some(),
                    time_to_reset_ms: retry_after.map_or(0, |d| d.as_millis() as u64),
                },
            )
        }
    };

    let response = (status, Html(state.site.render(Page::Contact, Some(&view)))).into_response();
    match &result {
        Err(err) => with_retry_after(err, response),
        Ok(()) => response,
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Identify the submitting client: first `X-Forwarded-For` hop, else the peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn status_for(err: &SubmitError) -> StatusCode {
    match err {
        SubmitError::Invalid(_) | SubmitError::BotDetected => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        SubmitError::Delivery(_) => StatusCode::BAD_GATEWAY,
        SubmitError::InProgress | SubmitError::AlreadySent => StatusCode::CONFLICT,
    }
}

fn retry_after_secs(err: &SubmitError) -> Option<u64> {
    match err {
        SubmitError::RateLimited { retry_after } => Some(retry_after.as_millis().div_ceil(1000) as u64),
        _ => None,
    }
}

fn with_retry_after(err: &SubmitError, mut response: Response) -> Response {
    if let Some(secs) = retry_after_secs(err) {
        if let Ok(value) = secs.to_string().parse() {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_key_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn test_client_key_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.1:4444".parse().unwrap();
        assert_eq!(client_key(&HeaderMap::new(), Some(peer)), "192.0.2.1");
        assert_eq!(client_key(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&SubmitError::BotDetected), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(&SubmitError::RateLimited {
                retry_after: std::time::Duration::from_secs(1)
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
