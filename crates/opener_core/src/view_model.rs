use crate::{RangeWindow, RunConfig, RunPhase};

/// Cursor over the effective list, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub position: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    /// `position / total * 100`, clamped to `[0, 100]`; 0 for an empty list.
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.position as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: RunPhase,
    pub total_identifiers: usize,
    /// Zero-based indices of identifiers whose value appears more than once.
    pub duplicates: Vec<usize>,
    pub range: RangeWindow,
    pub filter_pattern: String,
    pub append_params: String,
    pub pattern_error: Option<String>,
    pub effective_urls: Vec<String>,
    pub config: RunConfig,
    pub progress: ProgressSnapshot,
    /// 1-based positions that opened a context.
    pub opened_positions: Vec<usize>,
    pub popup_blocked: bool,
    /// The engine has not yet acknowledged the end of the last run.
    pub run_in_flight: bool,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn effective_len(&self) -> usize {
        self.effective_urls.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RunPhase::Completed
    }
}
