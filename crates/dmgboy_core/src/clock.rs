use std::cell::Cell;
use std::time::{Duration, Instant};

/// Time source for instruction pacing.
pub trait Clock {
    /// Monotonic time since the clock was created.
    fn now(&self) -> Duration;

    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock for tests. Time moves by `tick` on every read and
/// by the length of every sleep.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<Duration>,
    /// Added to `now` on every read, to simulate work taking time.
    pub tick: Duration,
    /// Every requested sleep, in order.
    pub sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock that advances by `tick` each time it is read.
    pub fn ticking(tick: Duration) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.tick);
        now
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.now.set(self.now.get() + duration);
    }
}
