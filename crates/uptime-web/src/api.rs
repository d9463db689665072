//! HTTP handlers for the uptime node.

use crate::metrics::UptimeMetrics;
use axum::{
    body::Body,
    extract::Extension,
    http::{
        header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use uptime_common::time::TimeSourceMode;
use uptime_core::{
    resource::{UptimeResource, SUPPORTED_FORMATS},
    rest::{self, Accept, ContentFormat},
};

/// State shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    /// The registered uptime resource.
    pub resource: UptimeResource,
    /// Capacity of the working buffer handed to the resource.
    pub chunk_size: usize,
}

/// Classify the `Accept` header for the uptime resource.
///
/// A header that is not valid visible ASCII cannot name a supported format.
#[must_use]
pub fn classify_accept(headers: &HeaderMap) -> Accept {
    match headers.get(ACCEPT) {
        None => Accept::Unspecified,
        Some(value) => value.to_str().map_or(Accept::Unrecognized, |header| {
            Accept::from_header(Some(header), SUPPORTED_FORMATS)
        }),
    }
}

/// Convert a resource response into an HTTP response.
#[must_use]
pub fn into_http(response: rest::Response) -> Response {
    let status = StatusCode::from_u16(response.status.http_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut http = (status, Body::from(response.payload)).into_response();
    let headers = http.headers_mut();
    if let Some(format) = response.content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(format.mime()));
    }
    if let Some(max_age) = response.max_age {
        headers.insert(CACHE_CONTROL, max_age_value(max_age));
    }
    http
}

fn max_age_value(seconds: u32) -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={seconds}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

/// Uptime resource.
///
/// GET /{resource.path}
pub async fn get_uptime(
    Extension(state): Extension<Arc<AppState>>,
    Extension(metrics): Extension<Arc<UptimeMetrics>>,
    headers: HeaderMap,
) -> Response {
    let accept = classify_accept(&headers);
    let mut buffer = vec![0u8; state.chunk_size];
    let mut response = rest::Response::new();

    state.resource.handle_get(accept, &mut buffer, &mut response);
    metrics.record_request(response.status);

    into_http(response)
}

/// CoRE resource discovery.
///
/// GET /.well-known/core
pub async fn well_known_core(Extension(state): Extension<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            HeaderValue::from_static(ContentFormat::LinkFormat.mime()),
        )],
        state.resource.info().link_format(),
    )
        .into_response()
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server answers.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Active time source.
    pub time_source: TimeSourceMode,
    /// Current uptime in seconds.
    pub uptime_seconds: u64,
}

/// Health check endpoint.
///
/// GET /health
pub async fn health_check(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    let clock = state.resource.clock();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        time_source: clock.mode(),
        uptime_seconds: clock.uptime_seconds(),
    })
}
