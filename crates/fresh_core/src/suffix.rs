//! Suffix generation for fresh usernames.
//!
//! A suffix is `"{seconds % 100}.{microseconds}"` taken from a microsecond
//! clock, e.g. `"42.017733"`. Issued ticks are strictly increasing per
//! generator, so two calls never share a suffix even when the clock has not
//! advanced between them.

use crate::types::Suffix;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const MICROS_PER_SEC: u64 = 1_000_000;

/// Clock source for suffix generation.
///
/// Lets tests drive the generator with a fixed or stepped clock.
pub trait SuffixClock: Send + Sync {
    /// Returns the current Unix time in microseconds.
    fn now_micros(&self) -> u64;
}

impl<F> SuffixClock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now_micros(&self) -> u64 {
        self()
    }
}

/// Wall clock (production default).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SuffixClock for SystemClock {
    fn now_micros(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or_default()
    }
}

/// Produces unique suffixes.
pub struct SuffixGenerator {
    clock: Arc<dyn SuffixClock>,
    last_issued: AtomicU64,
}

impl SuffixGenerator {
    /// Creates a generator backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a generator backed by a custom clock.
    pub fn with_clock(clock: impl SuffixClock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            last_issued: AtomicU64::new(0),
        }
    }

    /// Returns the process-wide generator.
    pub fn shared() -> Arc<SuffixGenerator> {
        static SHARED: OnceLock<Arc<SuffixGenerator>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(SuffixGenerator::new()))
            .clone()
    }

    /// Issues the next suffix.
    pub fn next_suffix(&self) -> Suffix {
        let now = self.clock.now_micros();
        let tick = match self
            .last_issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            }) {
            Ok(prev) | Err(prev) => now.max(prev + 1),
        };

        let suffix = format_tick(tick);
        debug!(suffix = %suffix, "generated fresh suffix");
        suffix
    }
}

impl Default for SuffixGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SuffixGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuffixGenerator")
            .field("last_issued", &self.last_issued.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Issues a suffix from the process-wide generator.
pub fn fresh_suffix() -> Suffix {
    SuffixGenerator::shared().next_suffix()
}

fn format_tick(micros: u64) -> Suffix {
    let secs = (micros / MICROS_PER_SEC) % 100;
    let sub = micros % MICROS_PER_SEC;
    Suffix::new(format!("{}.{:06}", secs, sub))
}
