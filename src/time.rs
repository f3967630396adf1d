use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic clock reading in fractional milliseconds, relative to the
/// clock's own origin. Not calendar time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Timestamp {
    pub millis: f64,
}

impl Timestamp {
    pub fn from_millis(millis: f64) -> Self {
        Timestamp { millis }
    }

    /// Signed elapsed milliseconds from `earlier` to `self`.
    pub fn since(&self, earlier: Timestamp) -> f64 {
        self.millis - earlier.millis
    }
}

/// Source of non-decreasing readings. Read once per recording call.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// `Instant`-backed clock, zeroed at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Hand-driven clock for tests and replays. Clones share the same reading,
/// so a test can keep a handle while the recorder owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(millis: f64) -> Self {
        let clock = Self::new();
        clock.set(millis);
        clock
    }

    /// Readings must not go backwards; earlier values are ignored.
    pub fn set(&self, millis: f64) {
        if millis >= self.millis.get() {
            self.millis.set(millis);
        }
    }

    pub fn advance(&self, millis: f64) {
        self.set(self.millis.get() + millis.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.get())
    }
}
