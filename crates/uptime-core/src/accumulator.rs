//! Uptime accumulator.
//!
//! Turns periodic samples of a narrow, wrapping tick timer into a
//! monotonically increasing count of whole seconds. Each iteration:
//! 1. Sample the raw timer
//! 2. Add the forward distance since the previous sample to the tick remainder
//! 3. Move whole seconds from the remainder into the counter
//! 4. Yield to the scheduler
//!
//! The wrap correction adds `tick_max - last + now`, one tick short of the
//! true modular distance, and whole seconds are extracted by truncating
//! division. Both losses are kept as-is so counter values match existing
//! deployments; expect the counter to fall slightly behind real time.

use crate::timer::{TickSource, WallClock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};
use uptime_common::config::TimerConfig;
use uptime_common::error::UptimeResult;
use uptime_common::time::{TimeSourceMode, TimerSettings};

/// Forward tick distance from `last` to `now`.
///
/// A sample greater than `last` is a plain advance. A smaller sample means the
/// register wrapped exactly once, and the distance is `tick_max - last + now`.
/// An equal sample counts as no progress: with the sample period shorter than
/// the wrap period it cannot be a full revolution.
#[must_use]
pub fn forward_ticks(last: u32, now: u32, tick_max: u32) -> u64 {
    if now > last {
        u64::from(now.wrapping_sub(last))
    } else if now == last {
        0
    } else {
        u64::from(tick_max.saturating_sub(last)) + u64::from(now)
    }
}

/// Published whole-second count, readable from any handle.
#[derive(Debug, Clone, Default)]
pub struct UptimeCounter(Arc<AtomicU64>);

impl UptimeCounter {
    /// Last value published by a completed accumulator iteration.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    fn publish(&self, seconds: u64) {
        self.0.store(seconds, Ordering::Release);
    }
}

/// How the accumulator task gives control back between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Reschedule immediately behind other ready tasks.
    Yield,
    /// Sleep for a fixed period.
    Sleep(Duration),
}

impl From<Duration> for Pause {
    fn from(period: Duration) -> Self {
        if period.is_zero() {
            Self::Yield
        } else {
            Self::Sleep(period)
        }
    }
}

impl Pause {
    async fn wait(self) {
        match self {
            Self::Yield => tokio::task::yield_now().await,
            Self::Sleep(period) => tokio::time::sleep(period).await,
        }
    }
}

/// Seconds counter fed from a wrapping tick timer.
///
/// Owns the raw-sample bookkeeping; other components only see the
/// [`UptimeCounter`] it publishes to.
pub struct UptimeAccumulator<T> {
    timer: T,
    settings: TimerSettings,
    /// Previous raw sample.
    last: u32,
    /// Ticks not yet converted into whole seconds.
    delta: u64,
    /// Whole seconds counted so far.
    seconds: u64,
    counter: UptimeCounter,
}

impl<T> fmt::Debug for UptimeAccumulator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UptimeAccumulator")
            .field("settings", &self.settings)
            .field("last", &self.last)
            .field("delta", &self.delta)
            .field("seconds", &self.seconds)
            .finish_non_exhaustive()
    }
}

impl<T: TickSource> UptimeAccumulator<T> {
    /// Create an accumulator with all state at zero.
    pub fn new(timer: T, settings: TimerSettings) -> Self {
        Self {
            timer,
            settings,
            last: 0,
            delta: 0,
            seconds: 0,
            counter: UptimeCounter::default(),
        }
    }

    /// Handle to the published seconds counter.
    #[must_use]
    pub fn counter(&self) -> UptimeCounter {
        self.counter.clone()
    }

    /// Whole seconds counted so far.
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.seconds
    }

    /// Ticks carried over to the next whole-second conversion.
    #[must_use]
    pub fn tick_delta(&self) -> u64 {
        self.delta
    }

    /// Raw value of the most recent sample.
    #[must_use]
    pub fn last_sample(&self) -> u32 {
        self.last
    }

    /// Run one iteration: sample, accumulate, normalize, publish.
    ///
    /// Returns the number of whole seconds added.
    pub fn step(&mut self) -> u64 {
        let now = self.timer.now();
        self.delta += forward_ticks(self.last, now, self.settings.tick_max());

        let ticks_per_second = u64::from(self.settings.ticks_per_second());
        let elapsed = self.delta / ticks_per_second;

        if elapsed > 0 {
            self.seconds += elapsed;
            self.delta -= elapsed * ticks_per_second;
            self.counter.publish(self.seconds);
            debug!(uptime_seconds = self.seconds, "Uptime second counter advanced");
        }

        trace!(now, last = self.last, delta = self.delta, "Sampled tick timer");
        self.last = now;
        elapsed
    }

    /// Sample forever, pausing once per iteration.
    pub async fn run(mut self, pause: Pause) {
        info!(
            ticks_per_second = self.settings.ticks_per_second(),
            tick_max = self.settings.tick_max(),
            ?pause,
            "Uptime accumulator running"
        );

        loop {
            self.step();
            pause.wait().await;
        }
    }
}

/// Read-only view of the node uptime.
///
/// Cheap to clone; the resource handler holds one per registration.
#[derive(Clone)]
pub struct UptimeClock {
    mode: TimeSourceMode,
    counter: UptimeCounter,
    wall: Arc<dyn WallClock + Send + Sync>,
}

impl fmt::Debug for UptimeClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UptimeClock")
            .field("mode", &self.mode)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

impl UptimeClock {
    /// Build a view over an existing counter.
    #[must_use]
    pub fn new(
        mode: TimeSourceMode,
        counter: UptimeCounter,
        wall: Arc<dyn WallClock + Send + Sync>,
    ) -> Self {
        Self {
            mode,
            counter,
            wall,
        }
    }

    /// Time source chosen at start-up.
    #[must_use]
    pub fn mode(&self) -> TimeSourceMode {
        self.mode
    }

    /// Uptime in seconds from the configured source.
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        match self.mode {
            TimeSourceMode::TickBased => self.counter.get(),
            TimeSourceMode::WallClockFallback => self.wall.seconds(),
        }
    }

    /// Seconds from the coarse clock, regardless of mode.
    #[must_use]
    pub fn wall_clock_seconds(&self) -> u64 {
        self.wall.seconds()
    }
}

/// Start uptime tracking.
///
/// With `use_tick_source` the timer settings are validated, the timer is
/// built by `make_timer` and the accumulator task is spawned on the current
/// tokio runtime, where it runs for the lifetime of that runtime. Without it
/// no task is started, `timer` is not checked, and uptime is read from `wall`
/// alone.
///
/// # Errors
///
/// Returns an error in tick mode if the timer settings are unusable.
///
/// # Panics
///
/// Panics if called with `use_tick_source` outside a tokio runtime.
pub fn init<T, F>(
    use_tick_source: bool,
    timer: &TimerConfig,
    make_timer: F,
    wall: Arc<dyn WallClock + Send + Sync>,
) -> UptimeResult<UptimeClock>
where
    T: TickSource + Send + 'static,
    F: FnOnce(TimerSettings) -> T,
{
    let mode = TimeSourceMode::from_tick_flag(use_tick_source);
    info!(%mode, "Initializing uptime tracking");

    match mode {
        TimeSourceMode::TickBased => {
            let settings = timer.settings()?;
            let accumulator = UptimeAccumulator::new(make_timer(settings), settings);
            let counter = accumulator.counter();
            tokio::spawn(accumulator.run(Pause::from(timer.sample_period)));
            Ok(UptimeClock::new(mode, counter, wall))
        }
        TimeSourceMode::WallClockFallback => {
            Ok(UptimeClock::new(mode, UptimeCounter::default(), wall))
        }
    }
}
