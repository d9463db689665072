//! REST primitives shared between resources and the HTTP binding.

use std::fmt;
use thiserror::Error;

/// Representation formats known to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    /// `text/plain; charset=utf-8`
    TextPlain,
    /// `application/link-format`
    LinkFormat,
    /// `application/xml`
    Xml,
    /// `application/json`
    Json,
}

impl ContentFormat {
    const ALL: [Self; 4] = [Self::TextPlain, Self::LinkFormat, Self::Xml, Self::Json];

    /// Media type written into `Content-Type`.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain; charset=utf-8",
            Self::LinkFormat => "application/link-format",
            Self::Xml => "application/xml",
            Self::Json => "application/json",
        }
    }

    /// Top-level media type, e.g. `text` for `text/plain`.
    #[must_use]
    pub fn top_level(self) -> &'static str {
        self.mime().split('/').next().unwrap_or_default()
    }

    /// Match a media type, ignoring parameters and case.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL.into_iter().find(|format| {
            let known = format.mime().split(';').next().unwrap_or_default();
            known.eq_ignore_ascii_case(essence)
        })
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Client representation preference after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// No preference given.
    Unspecified,
    /// A registered content format.
    Format(ContentFormat),
    /// A preference the dispatcher cannot map to any known format.
    Unrecognized,
}

/// One entry of an HTTP `Accept` header.
#[derive(Debug, Clone, Copy)]
enum MediaRange<'a> {
    /// `*/*`
    Any,
    /// `type/*`
    AnyOf(&'a str),
    /// `type/subtype`
    Exact(&'a str),
}

impl<'a> MediaRange<'a> {
    /// Parse a range, returning it with whether `q=0` refuses it.
    fn parse(range: &'a str) -> Option<(Self, bool)> {
        let mut parts = range.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let refused = parts.any(|param| {
            param.split_once('=').is_some_and(|(name, value)| {
                name.trim().eq_ignore_ascii_case("q")
                    && value.trim().parse::<f32>().is_ok_and(|q| q <= 0.0)
            })
        });

        let (top, sub) = essence.split_once('/')?;
        let range = match (top, sub) {
            ("*", "*") => Self::Any,
            (top, "*") => Self::AnyOf(top),
            _ => Self::Exact(essence),
        };
        Some((range, refused))
    }

    fn matches(self, format: ContentFormat) -> bool {
        match self {
            Self::Any => true,
            Self::AnyOf(top) => format.top_level().eq_ignore_ascii_case(top),
            Self::Exact(essence) => ContentFormat::from_mime(essence) == Some(format),
        }
    }
}

impl Accept {
    /// Classify an HTTP `Accept` header.
    ///
    /// Ranges carrying `q=0` are refusals: the formats they name exactly, or
    /// by `type/*`, are never chosen. Among the remaining ranges, taken in
    /// the order listed, the first one that matches an unrefused format in
    /// `supported` wins; `type/*` picks the first such format of that type.
    /// An absent or empty header counts as no preference, and so does `*/*`
    /// unless the first entry of `supported` was refused, in which case the
    /// next unrefused one is chosen. Otherwise the first known, unrefused
    /// format listed is returned, or [`Accept::Unrecognized`] if there is
    /// none.
    #[must_use]
    pub fn from_header(header: Option<&str>, supported: &[ContentFormat]) -> Self {
        let Some(header) = header.map(str::trim).filter(|h| !h.is_empty()) else {
            return Self::Unspecified;
        };

        let ranges: Vec<_> = header.split(',').filter_map(MediaRange::parse).collect();
        let is_refused = |format: ContentFormat| {
            ranges.iter().any(|&(range, refused)| {
                refused && !matches!(range, MediaRange::Any) && range.matches(format)
            })
        };
        let offered: Vec<_> = supported
            .iter()
            .copied()
            .filter(|&format| !is_refused(format))
            .collect();

        let mut first_known = None;
        let mut wildcard = false;
        for &(range, _) in ranges.iter().filter(|(_, refused)| !refused) {
            match range {
                MediaRange::Any => wildcard = true,
                MediaRange::AnyOf(_) => {
                    if let Some(&format) = offered.iter().find(|&&f| range.matches(f)) {
                        return Self::Format(format);
                    }
                }
                MediaRange::Exact(essence) => {
                    let Some(format) = ContentFormat::from_mime(essence) else {
                        continue;
                    };
                    if offered.contains(&format) {
                        return Self::Format(format);
                    }
                    if !is_refused(format) {
                        first_known.get_or_insert(format);
                    }
                }
            }
        }

        if wildcard {
            match offered.first() {
                Some(&format) if supported.first() == Some(&format) => Self::Unspecified,
                Some(&format) => Self::Format(format),
                None => Self::Unrecognized,
            }
        } else {
            first_known.map_or(Self::Unrecognized, Self::Format)
        }
    }
}

/// Response status codes used by resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// 200 Content.
    #[default]
    Content,
    /// 406 Not Acceptable.
    NotAcceptable,
}

impl Status {
    /// HTTP status code.
    #[must_use]
    pub fn http_code(self) -> u16 {
        match self {
            Self::Content => 200,
            Self::NotAcceptable => 406,
        }
    }
}

/// Callbacks the dispatcher exposes for building a response.
pub trait ResponseSink {
    /// Set the response status. Defaults to [`Status::Content`] if never called.
    fn set_status(&mut self, status: Status);

    /// Set the representation format of the payload.
    fn set_content_type(&mut self, format: ContentFormat);

    /// Set the payload bytes.
    fn set_payload(&mut self, payload: &[u8]);

    /// Set the freshness hint in seconds.
    fn set_max_age(&mut self, seconds: u32);
}

/// Owned response assembled through [`ResponseSink`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Response status.
    pub status: Status,
    /// Payload format, if one was set.
    pub content_type: Option<ContentFormat>,
    /// Payload bytes.
    pub payload: Vec<u8>,
    /// Freshness hint in seconds, if one was set.
    pub max_age: Option<u32>,
}

impl Response {
    /// Empty 200 response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload as text, replacing invalid UTF-8.
    #[must_use]
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

impl ResponseSink for Response {
    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn set_content_type(&mut self, format: ContentFormat) {
        self.content_type = Some(format);
    }

    fn set_payload(&mut self, payload: &[u8]) {
        self.payload.clear();
        self.payload.extend_from_slice(payload);
    }

    fn set_max_age(&mut self, seconds: u32) {
        self.max_age = Some(seconds);
    }
}

/// Errors a resource reports back to the client.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RestError {
    /// The requested representation is not offered by the resource.
    #[error("Supporting content-types text/plain and application/json")]
    UnsupportedRepresentation,
}

impl RestError {
    /// Status the error is reported with.
    #[must_use]
    pub fn status(self) -> Status {
        match self {
            Self::UnsupportedRepresentation => Status::NotAcceptable,
        }
    }
}
