// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the Webmention verifier service.
//!
//! The receiving endpoint accepts a form-encoded `source`/`target` pair,
//! runs the verification pipeline, and reports what was found. How a
//! rejection is presented is decided here, the pipeline only classifies.

use crate::config::Config;
use crate::error::ErrorKind;
use crate::matcher::MatchSet;
use crate::metrics::Metrics;
use crate::mf2::Mf2Document;
use crate::verifier::{VerificationOutcome, Verifier, VerifyOptions};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub verifier: Verifier,
    pub options: VerifyOptions,
    pub metrics: Metrics,
    pub config: Config,
}

/// Form body of a Webmention request.
#[derive(Debug, Default, Deserialize)]
pub struct WebmentionForm {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Result of receiving a Webmention.
#[derive(Debug, Serialize)]
pub struct WebmentionReport {
    pub source: Option<String>,
    pub target: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<MatchSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Mf2Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportError>,
}

/// Classified rejection in a report.
#[derive(Debug, Serialize)]
pub struct ReportError {
    pub kind: ErrorKind,
    pub detail: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/webmention", post(receive));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "webmention-verifier",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Receive and verify a Webmention.
///
/// A request without `source` and `target` is answered without running the
/// pipeline. Verified mentions get `202 Accepted`, rejections `400`.
pub async fn receive(
    State(state): State<Arc<AppState>>,
    Form(form): Form<WebmentionForm>,
) -> Response {
    if form.source.is_none() && form.target.is_none() {
        debug!("Empty Webmention body, nothing to verify");
        let report = WebmentionReport {
            source: None,
            target: None,
            verified: false,
            matches: None,
            data: None,
            error: None,
        };
        return (StatusCode::BAD_REQUEST, Json(report)).into_response();
    }

    let source = form.source.unwrap_or_default();
    let target = form.target.unwrap_or_default();

    let started = Instant::now();
    let outcome = state.verifier.verify(&source, &target, &state.options).await;
    state.metrics.observe(&outcome, started.elapsed());

    let (status, report) = match outcome {
        VerificationOutcome::Accepted { matches, document } => (
            StatusCode::ACCEPTED,
            WebmentionReport {
                source: Some(source),
                target: Some(target),
                verified: true,
                matches: Some(matches),
                data: Some(document),
                error: None,
            },
        ),
        VerificationOutcome::Rejected { reason, detail } => (
            StatusCode::BAD_REQUEST,
            WebmentionReport {
                source: Some(source),
                target: Some(target),
                verified: false,
                matches: None,
                data: None,
                error: Some(ReportError {
                    kind: reason,
                    detail,
                }),
            },
        ),
    };

    (status, Json(report)).into_response()
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
