//! Timer domain and uptime decomposition helpers.
//!
//! A hardware free-running timer counts ticks in `[0, tick_max]` and wraps
//! back to zero. [`TimerSettings`] captures that domain; [`UptimeBreakdown`]
//! splits a whole-second count into days, hours, minutes and seconds.

use crate::error::{UptimeError, UptimeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Seconds in one minute.
pub const SECONDS_PER_MINUTE: u64 = 60;
/// Seconds in one hour.
pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Where the uptime value comes from.
///
/// Chosen once at start-up and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSourceMode {
    /// Seconds are accumulated from the free-running tick timer.
    TickBased,
    /// Seconds are read from the coarse seconds-since-boot clock.
    WallClockFallback,
}

impl fmt::Display for TimeSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickBased => write!(f, "tick_based"),
            Self::WallClockFallback => write!(f, "wall_clock_fallback"),
        }
    }
}

impl TimeSourceMode {
    /// Select the mode from the start-up flag.
    #[must_use]
    pub fn from_tick_flag(use_tick_source: bool) -> Self {
        if use_tick_source {
            Self::TickBased
        } else {
            Self::WallClockFallback
        }
    }
}

/// Resolution and width of a wrapping tick timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    ticks_per_second: u32,
    tick_max: u32,
}

impl TimerSettings {
    /// Create timer settings.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is zero.
    pub fn new(ticks_per_second: u32, tick_max: u32) -> UptimeResult<Self> {
        if ticks_per_second == 0 {
            return Err(UptimeError::ZeroResolution);
        }
        if tick_max == 0 {
            return Err(UptimeError::ZeroTickMax);
        }
        Ok(Self {
            ticks_per_second,
            tick_max,
        })
    }

    /// Ticks in one second.
    #[must_use]
    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// Largest raw value the timer register holds before wrapping.
    #[must_use]
    pub fn tick_max(&self) -> u32 {
        self.tick_max
    }

    /// Time the register takes to run through its whole domain once.
    #[must_use]
    pub fn wrap_period(&self) -> Duration {
        let ticks = u128::from(self.tick_max) + 1;
        let nanos = ticks * 1_000_000_000 / u128::from(self.ticks_per_second);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Check that sampling every `sample_period` observes at most one wrap.
    ///
    /// # Errors
    ///
    /// Returns [`UptimeError::SamplePeriodTooLong`] when the period is not
    /// strictly shorter than [`Self::wrap_period`].
    pub fn check_sample_period(&self, sample_period: Duration) -> UptimeResult<()> {
        let wrap = self.wrap_period();
        if sample_period >= wrap {
            return Err(UptimeError::SamplePeriodTooLong {
                sample_ns: u64::try_from(sample_period.as_nanos()).unwrap_or(u64::MAX),
                wrap_ns: u64::try_from(wrap.as_nanos()).unwrap_or(u64::MAX),
            });
        }
        Ok(())
    }
}

/// Whole-second uptime split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UptimeBreakdown {
    /// Whole days.
    pub days: u64,
    /// Hours within the day (0-23).
    pub hours: u64,
    /// Minutes within the hour (0-59).
    pub minutes: u64,
    /// Seconds within the minute (0-59).
    pub seconds: u64,
}

impl UptimeBreakdown {
    /// Decompose `seconds` by successive truncating division.
    #[must_use]
    pub fn from_seconds(seconds: u64) -> Self {
        let mut rest = seconds;

        let days = rest / SECONDS_PER_DAY;
        rest -= days * SECONDS_PER_DAY;

        let hours = rest / SECONDS_PER_HOUR;
        rest -= hours * SECONDS_PER_HOUR;

        let minutes = rest / SECONDS_PER_MINUTE;
        rest -= minutes * SECONDS_PER_MINUTE;

        Self {
            days,
            hours,
            minutes,
            seconds: rest,
        }
    }
}

impl fmt::Display for UptimeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} d {} h {} m {} s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
