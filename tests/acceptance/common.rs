//! Common utilities for acceptance tests.
//!
//! Provides a node wired from a [`ManualTimer`] and [`ManualClock`] so tests
//! control every raw sample the accumulator sees.

#![allow(dead_code)] // Not every helper is used by every test module

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uptime_common::config::{TimerConfig, WebConfig};
use uptime_core::{init, ManualClock, ManualTimer, UptimeClock, UptimeResource};
use uptime_web::UptimeServer;

/// A node whose timer and wall clock are set by the test.
pub struct TestNode {
    /// Raw tick register seen by the accumulator.
    pub timer: ManualTimer,
    /// Seconds-since-boot clock.
    pub wall: ManualClock,
    /// Read-only uptime view.
    pub clock: UptimeClock,
    /// Router serving the uptime resource.
    pub router: Router,
}

/// Response parts returned by [`TestNode::get`].
pub struct Reply {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body as text.
    pub body: String,
}

impl Reply {
    /// Value of `Cache-Control`, if present.
    pub fn cache_control(&self) -> Option<&str> {
        self.headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
    }

    /// Value of `Content-Type`, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Timer configuration that samples on every scheduler pass.
pub fn timer_config(ticks_per_second: u32, tick_max: u32) -> TimerConfig {
    TimerConfig {
        enabled: true,
        ticks_per_second,
        tick_max,
        sample_period: Duration::ZERO,
    }
}

impl TestNode {
    /// Start a node on the current runtime.
    pub fn start(use_tick_source: bool, timer_config: &TimerConfig, chunk_size: usize) -> Self {
        let timer = ManualTimer::new();
        let wall = ManualClock::new();

        let sampled = timer.clone();
        let clock = init(
            use_tick_source,
            timer_config,
            move |_| sampled,
            Arc::new(wall.clone()),
        )
        .expect("timer config should be valid");

        let resource = UptimeResource::new(clock.clone(), "system/uptime");
        let router = UptimeServer::new(WebConfig::default(), resource, chunk_size).router();

        Self {
            timer,
            wall,
            clock,
            router,
        }
    }

    /// Set the raw timer value and let the accumulator sample it.
    pub async fn sample(&self, raw: u32) {
        self.timer.set(raw);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
    }

    /// GET the uptime resource with an optional `Accept` header.
    pub async fn get(&self, accept: Option<&str>) -> Reply {
        let mut request = Request::get("/system/uptime");
        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        Reply {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
