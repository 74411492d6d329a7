//! Deterministic clock advancing a fixed step per call.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::ports::clock::Clock;

/// Clock that starts at a fixed instant and advances one second per `now()`
/// call, so successive commits get distinct, ordered timestamps.
pub struct FixedClock {
    base: DateTime<Utc>,
    ticks: Mutex<i64>,
}

impl FixedClock {
    /// Creates a clock starting at the given instant.
    #[must_use]
    pub fn new(base: DateTime<Utc>) -> Self {
        Self { base, ticks: Mutex::new(0) }
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut ticks = self.ticks.lock().unwrap();
        let now = self.base + Duration::seconds(*ticks);
        *ticks += 1;
        now
    }
}
