//! Reconnect backoff generator
//!
//! Exponential growth with jitter, reused across reconnect attempts. The
//! reference algorithm signals "generator requires a reset" with a negative
//! computed delay; we keep that contract: a negative delay is clamped to zero
//! and resets the interval to its initial value.

use rand::Rng;
use std::time::Duration;

/// 重连初始间隔
const INITIAL_DELAY_SECS: u64 = 5;
/// 重连间隔上限
const MAX_DELAY_SECS: u64 = 120;
const MULTIPLIER: f64 = 2.0;
const JITTER: f64 = 0.25;

/// Stateful producer of increasing retry delays.
#[derive(Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    jitter: f64,
    /// Base for the next computed delay, in milliseconds.
    current_ms: f64,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, multiplier: f64, jitter: f64) -> Self {
        Self {
            initial,
            max,
            multiplier,
            jitter,
            current_ms: initial.as_millis() as f64,
        }
    }

    /// Policy used for broker reconnects.
    pub fn reconnect() -> Self {
        Self::new(
            Duration::from_secs(INITIAL_DELAY_SECS),
            Duration::from_secs(MAX_DELAY_SECS),
            MULTIPLIER,
            JITTER,
        )
    }

    /// Next delay to sleep before another attempt.
    ///
    /// Always >= 0: a negative computed delay resets the generator and comes
    /// back as zero.
    pub fn next_delay(&mut self) -> Duration {
        let sample = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        self.delay_from_sample(sample)
    }

    /// Restore the initial interval (called after a successful connect).
    pub fn reset(&mut self) {
        self.current_ms = self.initial.as_millis() as f64;
    }

    fn delay_from_sample(&mut self, sample: f64) -> Duration {
        let computed_ms = jittered_ms(self.current_ms, sample);

        // Advance the base for the next attempt, capped at the maximum.
        self.current_ms = (self.current_ms * self.multiplier).min(self.max.as_millis() as f64);

        match clamp_delay(computed_ms) {
            Some(delay) => delay,
            None => {
                // Negative delay is the generator's reset sentinel.
                self.reset();
                Duration::ZERO
            }
        }
    }
}

fn jittered_ms(base_ms: f64, sample: f64) -> i64 {
    (base_ms * (1.0 + sample)) as i64
}

/// `None` means the computed delay went negative.
fn clamp_delay(ms: i64) -> Option<Duration> {
    if ms < 0 {
        None
    } else {
        Some(Duration::from_millis(ms as u64))
    }
}
