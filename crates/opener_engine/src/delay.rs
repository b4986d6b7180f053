use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Bounds for the randomized pause between strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Swapped bounds are put back in order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// `min + random() * (max - min)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let spread = self.max - self.min;
        self.min + spread.mul_f64(rng.gen::<f64>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Sleep for `delay` unless `cancel` fires first. Cancellation wins ties.
pub async fn wait_or_cancel(delay: Duration, cancel: &CancellationToken) -> WaitOutcome {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => WaitOutcome::Cancelled,
        _ = tokio::time::sleep(delay) => WaitOutcome::Elapsed,
    }
}
