use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Controllable microsecond clock for suffix generation.
///
/// Time only moves when a scenario advances it, so every suffix a scenario
/// produces is predictable.
#[derive(Clone)]
pub struct MockClock {
    current: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a clock source suitable for `SuffixGenerator::with_clock`.
    pub fn as_provider(&self) -> impl Fn() -> u64 + Send + Sync + 'static {
        let current = self.current.clone();
        move || current.load(Ordering::SeqCst)
    }
}

impl MockClock {
    /// Create a clock at the given Unix time in microseconds
    pub fn at(micros: u64) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(micros)),
        }
    }

    /// Create a new mock clock starting at current time
    pub fn new() -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_micros() as u64;
        Self::at(now)
    }

    /// Get current timestamp in microseconds
    pub fn now(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Advance time by duration
    pub fn advance(&self, duration: Duration) {
        self.advance_micros(duration.as_micros() as u64);
    }

    /// Advance time by N microseconds
    pub fn advance_micros(&self, micros: u64) {
        self.current.fetch_add(micros, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}
