/// Frame clock
///
/// Tracks two independent intervals: the simulation delta (time between two
/// `tick()` calls) and the frame-swap delta (time since the last buffer
/// rotation). Both are reported in seconds as `f32` and never go negative.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// Time sources
// ============================================================================

/// Source of monotonic timestamps, measured from an arbitrary origin
pub trait TimeSource: Send {
    /// Time elapsed since the source origin
    fn now(&self) -> Duration;
}

/// Wall-clock source backed by `std::time::Instant`
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually driven source for deterministic simulation
///
/// Clones share the same underlying time, so a test can keep a handle and
/// advance the clock owned by a renderer.
#[derive(Clone, Default)]
pub struct ManualTime {
    nanos: Arc<AtomicU64>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `seconds`; NaN and negative steps do nothing
    pub fn advance(&self, seconds: f64) {
        let step = seconds_to_nanos(seconds);
        let _ = self.nanos.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| Some(now.saturating_add(step)));
    }

    /// Move time forward by an exact number of nanoseconds
    pub fn advance_nanos(&self, nanos: u64) {
        let _ = self.nanos.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| Some(now.saturating_add(nanos)));
    }

    /// Jump to an absolute time (may move backwards)
    pub fn set(&self, seconds: f64) {
        self.nanos.store(seconds_to_nanos(seconds), Ordering::SeqCst);
    }
}

/// Whole nanoseconds in `seconds`, saturating at `u64::MAX`; NaN and negatives give 0
fn seconds_to_nanos(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    Duration::try_from_secs_f64(seconds)
        .map_or(u64::MAX, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

// ============================================================================
// Clock
// ============================================================================

pub struct Clock {
    source: Box<dyn TimeSource>,
    last_tick: Duration,
    last_frame_swap: Duration,
    delta_time: f32,
    frame_swap_delta_time: f32,
}

impl Clock {
    /// Clock driven by the monotonic system timer
    pub fn new() -> Self {
        Self::with_source(Box::new(MonotonicTime::new()))
    }

    pub fn with_source(source: Box<dyn TimeSource>) -> Self {
        let now = source.now();
        Self {
            source,
            last_tick: now,
            last_frame_swap: now,
            delta_time: 0.0,
            frame_swap_delta_time: 0.0,
        }
    }

    /// Restart the simulation interval (called once before the first frame)
    pub fn initialize(&mut self) {
        self.last_tick = self.source.now();
        self.delta_time = 0.0;
    }

    /// Compute the delta since the previous tick and start a new interval
    pub fn tick(&mut self) -> f32 {
        let now = self.source.now();
        self.delta_time = now.saturating_sub(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.delta_time
    }

    /// Compute the time since the last frame-swap reset without resetting it
    pub fn tick_frame_swap(&mut self) -> f32 {
        let now = self.source.now();
        self.frame_swap_delta_time = now.saturating_sub(self.last_frame_swap).as_secs_f32();
        self.frame_swap_delta_time
    }

    /// Start a new swap interval; called exactly when buffers rotate
    pub fn reset_frame_swap(&mut self) {
        self.last_frame_swap = self.source.now();
    }

    /// Seconds between the two most recent ticks
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds since the last frame-swap reset, as of the last `tick_frame_swap`
    pub fn frame_swap_delta_time(&self) -> f32 {
        self.frame_swap_delta_time
    }

    /// Seconds since the time source origin
    pub fn elapsed(&self) -> f32 {
        self.source.now().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
