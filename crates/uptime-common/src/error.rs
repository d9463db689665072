use thiserror::Error;

/// Errors raised while validating the tick timer domain.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UptimeError {
    /// Timer resolution of zero ticks per second.
    #[error("invalid timer resolution: ticks_per_second must be non-zero")]
    ZeroResolution,

    /// Timer register without any representable range.
    #[error("invalid timer width: tick_max must be non-zero")]
    ZeroTickMax,

    /// Sampling too slowly to see every wrap of the timer register.
    #[error("sample period {sample_ns}ns is not shorter than the timer wrap period {wrap_ns}ns")]
    SamplePeriodTooLong {
        /// Configured sample period in nanoseconds.
        sample_ns: u64,
        /// Time the timer register needs to wrap once, in nanoseconds.
        wrap_ns: u64,
    },
}

/// Convenience type alias for uptime operations.
pub type UptimeResult<T> = Result<T, UptimeError>;
