//! Time sources consumed by the accumulator and the uptime resource.
//!
//! Two primitives are needed:
//! - [`TickSource`]: a free-running register counting ticks in
//!   `[0, tick_max]` that wraps back to zero
//! - [`WallClock`]: a coarse seconds-since-boot counter
//!
//! [`HostTimer`] and [`BootClock`] derive both from the monotonic host clock.
//! [`ManualTimer`] and [`ManualClock`] are driven explicitly, for simulation
//! and tests.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uptime_common::time::TimerSettings;

/// Raw read access to a wrapping hardware timer.
pub trait TickSource {
    /// Current raw register value, in `[0, tick_max]`.
    fn now(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for Arc<T> {
    fn now(&self) -> u32 {
        (**self).now()
    }
}

/// Coarse seconds-since-boot clock.
pub trait WallClock {
    /// Whole seconds elapsed since boot.
    fn seconds(&self) -> u64;
}

impl<T: WallClock + ?Sized> WallClock for Arc<T> {
    fn seconds(&self) -> u64 {
        (**self).seconds()
    }
}

/// Tick timer emulated from the host monotonic clock.
///
/// Ticks advance at `ticks_per_second` and the reported value wraps at
/// `tick_max + 1`, like a narrow hardware counter register.
#[derive(Debug, Clone)]
pub struct HostTimer {
    start: Instant,
    settings: TimerSettings,
}

impl HostTimer {
    /// Start a timer at zero now.
    #[must_use]
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            start: Instant::now(),
            settings,
        }
    }

    fn ticks_at(&self, nanos: u128) -> u32 {
        let ticks = nanos * u128::from(self.settings.ticks_per_second()) / 1_000_000_000;
        let domain = u128::from(self.settings.tick_max()) + 1;
        // Remainder is <= tick_max, which fits in u32
        u32::try_from(ticks % domain).unwrap_or(self.settings.tick_max())
    }
}

impl TickSource for HostTimer {
    fn now(&self) -> u32 {
        self.ticks_at(self.start.elapsed().as_nanos())
    }
}

/// Seconds since this clock was created, from the host monotonic clock.
#[derive(Debug, Clone)]
pub struct BootClock {
    start: Instant,
}

impl BootClock {
    /// Start counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for BootClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for BootClock {
    fn seconds(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

/// Timer register whose value is set by hand.
///
/// Clones share the same register.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    raw: Arc<AtomicU32>,
}

impl ManualTimer {
    /// Register starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the register value.
    pub fn set(&self, raw: u32) {
        self.raw.store(raw, Ordering::Release);
    }
}

impl TickSource for ManualTimer {
    fn now(&self) -> u32 {
        self.raw.load(Ordering::Acquire)
    }
}

/// Seconds-since-boot clock whose value is set by hand.
///
/// Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the seconds value.
    pub fn set(&self, seconds: u64) {
        self.seconds.store(seconds, Ordering::Release);
    }
}

impl WallClock for ManualClock {
    fn seconds(&self) -> u64 {
        self.seconds.load(Ordering::Acquire)
    }
}
