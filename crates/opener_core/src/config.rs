use std::time::Duration;

/// Where each identifier is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenTarget {
    #[default]
    Tab,
    Window,
}

/// Batching and pacing for a run.
///
/// Fields are private so that `min_delay <= max_delay` and `concurrency >= 1`
/// always hold; edits go through [`RunConfig::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    target: OpenTarget,
    batch_size: usize,
    concurrency: usize,
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target: OpenTarget::Tab,
            batch_size: 10,
            concurrency: 1,
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(3),
        }
    }
}

/// Partial edit of a [`RunConfig`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigPatch {
    pub target: Option<OpenTarget>,
    pub batch_size: Option<usize>,
    pub concurrency: Option<usize>,
    pub min_delay: Option<Duration>,
    pub max_delay: Option<Duration>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("delay must be a finite, non-negative number of seconds (got {0})")]
    InvalidDelay(f64),
}

/// Convert user-supplied seconds into a delay.
pub fn delay_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidDelay(secs))
}

impl RunConfig {
    pub fn target(&self) -> OpenTarget {
        self.target
    }

    /// 0 means "everything remaining".
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Apply a patch. The min delay is applied before the max delay; raising
    /// the min above the max drags the max up, lowering the max below the min
    /// drags the min down. A concurrency of 0 becomes 1.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(target) = patch.target {
            self.target = target;
        }
        if let Some(batch_size) = patch.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(concurrency) = patch.concurrency {
            self.concurrency = concurrency.max(1);
        }
        if let Some(min_delay) = patch.min_delay {
            self.min_delay = min_delay;
            if self.max_delay < min_delay {
                self.max_delay = min_delay;
            }
        }
        if let Some(max_delay) = patch.max_delay {
            self.max_delay = max_delay;
            if self.min_delay > max_delay {
                self.min_delay = max_delay;
            }
        }
    }

    pub fn with(mut self, patch: &ConfigPatch) -> Self {
        self.apply(patch);
        self
    }
}
