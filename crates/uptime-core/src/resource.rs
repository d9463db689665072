//! System uptime resource.
//!
//! GET-only. Offers the node uptime in days, hours, minutes and seconds as
//! plain text (default) or as a JSON-like line. The JSON variant keeps the
//! single-quoted `{'uptime':'...'}` form existing clients parse.

use crate::accumulator::UptimeClock;
use crate::format::write_bounded;
use crate::rest::{Accept, ContentFormat, RestError, ResponseSink};
use tracing::debug;
use uptime_common::time::{TimeSourceMode, UptimeBreakdown};

/// Freshness hint attached to every response, in seconds.
pub const MAX_AGE: u32 = 60;

/// Formats the resource can render.
pub const SUPPORTED_FORMATS: &[ContentFormat] = &[ContentFormat::TextPlain, ContentFormat::Json];

/// Discovery metadata for a registered resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Path without leading slash.
    pub path: String,
    /// Human-readable title.
    pub title: &'static str,
    /// Resource type.
    pub resource_type: &'static str,
}

impl ResourceInfo {
    /// CoRE link-format entry for this resource.
    #[must_use]
    pub fn link_format(&self) -> String {
        format!(
            "</{}>;title=\"{}\";rt=\"{}\"",
            self.path, self.title, self.resource_type
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Representation {
    Text,
    Json,
}

fn negotiate(accept: Accept) -> Result<Representation, RestError> {
    match accept {
        Accept::Unspecified | Accept::Format(ContentFormat::TextPlain) => {
            Ok(Representation::Text)
        }
        Accept::Format(ContentFormat::Json) => Ok(Representation::Json),
        Accept::Format(_) | Accept::Unrecognized => Err(RestError::UnsupportedRepresentation),
    }
}

/// Request handler for the uptime resource.
///
/// Holds only a read-only [`UptimeClock`]; it never samples the timer.
#[derive(Debug, Clone)]
pub struct UptimeResource {
    clock: UptimeClock,
    info: ResourceInfo,
}

impl UptimeResource {
    /// Create the resource for registration under `path`.
    pub fn new(clock: UptimeClock, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            clock,
            info: ResourceInfo {
                path: path.trim_start_matches('/').to_owned(),
                title: "System uptime",
                resource_type: "Uptime",
            },
        }
    }

    /// Discovery metadata.
    #[must_use]
    pub fn info(&self) -> &ResourceInfo {
        &self.info
    }

    /// Clock the resource reads from.
    #[must_use]
    pub fn clock(&self) -> &UptimeClock {
        &self.clock
    }

    /// Handle a GET request.
    ///
    /// Text and JSON bodies are formatted into `buffer` and never exceed its
    /// length. Every response carries [`MAX_AGE`].
    pub fn handle_get<R>(&self, accept: Accept, buffer: &mut [u8], response: &mut R)
    where
        R: ResponseSink + ?Sized,
    {
        let uptime = self.clock.uptime_seconds();
        let breakdown = UptimeBreakdown::from_seconds(uptime);

        match negotiate(accept) {
            Ok(Representation::Text) => {
                response.set_content_type(ContentFormat::TextPlain);
                let len = write_bounded(
                    buffer,
                    format_args!(
                        "{breakdown} ({uptime}/{} s)\n",
                        self.clock.wall_clock_seconds()
                    ),
                );
                response.set_payload(&buffer[..len]);
            }
            Ok(Representation::Json) => {
                response.set_content_type(ContentFormat::Json);
                let len = write_bounded(buffer, format_args!("{{'uptime':'{breakdown}'}}"));
                response.set_payload(&buffer[..len]);
            }
            Err(err) => {
                response.set_status(err.status());
                response.set_payload(err.to_string().as_bytes());
            }
        }

        response.set_max_age(MAX_AGE);

        debug!(
            path = %self.info.path,
            ?accept,
            uptime_seconds = uptime,
            tick_based = self.clock.mode() == TimeSourceMode::TickBased,
            "Served uptime"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::UptimeCounter;
    use crate::rest::{Response, Status};
    use crate::timer::ManualClock;
    use std::sync::Arc;

    fn fallback_resource(seconds: u64) -> UptimeResource {
        let wall = ManualClock::new();
        wall.set(seconds);
        let clock = UptimeClock::new(
            TimeSourceMode::WallClockFallback,
            UptimeCounter::default(),
            Arc::new(wall),
        );
        UptimeResource::new(clock, "/system/uptime")
    }

    fn get(resource: &UptimeResource, accept: Accept, capacity: usize) -> Response {
        let mut buffer = vec![0u8; capacity];
        let mut response = Response::new();
        resource.handle_get(accept, &mut buffer, &mut response);
        response
    }

    #[test]
    fn test_unspecified_accept_renders_text() {
        let resource = fallback_resource(90_061);
        let response = get(&resource, Accept::Unspecified, 64);

        assert_eq!(response.status, Status::Content);
        assert_eq!(response.content_type, Some(ContentFormat::TextPlain));
        assert_eq!(response.payload_text(), "1 d 1 h 1 m 1 s (90061/90061 s)\n");
        assert_eq!(response.max_age, Some(MAX_AGE));
    }

    #[test]
    fn test_text_plain_accept() {
        let resource = fallback_resource(59);
        let response = get(&resource, Accept::Format(ContentFormat::TextPlain), 64);
        assert_eq!(response.payload_text(), "0 d 0 h 0 m 59 s (59/59 s)\n");
    }

    #[test]
    fn test_json_accept_keeps_legacy_quoting() {
        let resource = fallback_resource(90_061);
        let response = get(&resource, Accept::Format(ContentFormat::Json), 64);

        assert_eq!(response.status, Status::Content);
        assert_eq!(response.content_type, Some(ContentFormat::Json));
        assert_eq!(response.payload_text(), "{'uptime':'1 d 1 h 1 m 1 s'}");
        assert_eq!(response.max_age, Some(MAX_AGE));
    }

    #[test]
    fn test_unsupported_accept_is_not_acceptable() {
        let resource = fallback_resource(10);
        for accept in [Accept::Format(ContentFormat::Xml), Accept::Unrecognized] {
            let response = get(&resource, accept, 64);
            assert_eq!(response.status, Status::NotAcceptable);
            assert_eq!(response.content_type, None);
            assert_eq!(
                response.payload_text(),
                "Supporting content-types text/plain and application/json"
            );
            assert_eq!(response.max_age, Some(MAX_AGE));
        }
    }

    #[test]
    fn test_tick_counter_used_in_tick_mode() {
        let wall = ManualClock::new();
        wall.set(500);
        let counter = UptimeCounter::default();
        let clock = UptimeClock::new(TimeSourceMode::TickBased, counter, Arc::new(wall));
        let resource = UptimeResource::new(clock, "system/uptime");

        // Counter has not been advanced; the wall clock only appears as cross-check
        let response = get(&resource, Accept::Unspecified, 64);
        assert_eq!(response.payload_text(), "0 d 0 h 0 m 0 s (0/500 s)\n");
    }

    #[test]
    fn test_payload_never_exceeds_buffer() {
        let resource = fallback_resource(u64::MAX);
        for capacity in [0usize, 1, 7, 16, 31] {
            for accept in [Accept::Unspecified, Accept::Format(ContentFormat::Json)] {
                let mut buffer = vec![0u8; capacity + 4];
                buffer[capacity..].fill(0xEE);
                let mut response = Response::new();
                resource.handle_get(accept, &mut buffer[..capacity], &mut response);

                assert!(response.payload.len() <= capacity);
                assert!(buffer[capacity..].iter().all(|&b| b == 0xEE));
                assert_eq!(response.max_age, Some(MAX_AGE));
            }
        }
    }

    #[test]
    fn test_truncated_text_is_prefix() {
        let resource = fallback_resource(90_061);
        let response = get(&resource, Accept::Unspecified, 10);
        assert_eq!(response.payload_text(), "1 d 1 h 1 ");
    }

    #[test]
    fn test_link_format() {
        let resource = fallback_resource(0);
        assert_eq!(resource.info().path, "system/uptime");
        assert_eq!(
            resource.info().link_format(),
            "</system/uptime>;title=\"System uptime\";rt=\"Uptime\""
        );
    }
}
