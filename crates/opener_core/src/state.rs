use std::collections::BTreeSet;

use crate::normalize::{normalize, NormalizedInput};
use crate::pipeline::{derive_effective, InvalidPatternError, RangeWindow};
use crate::view_model::{AppViewModel, ProgressSnapshot};
use crate::RunConfig;

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// Cursor and outcomes of the opening sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    position: usize,
    phase: RunPhase,
    opened_positions: BTreeSet<usize>,
    popup_blocked: bool,
}

impl RunState {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RunPhase::Paused
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RunPhase::Completed
    }

    /// 1-based positions that opened a context.
    pub fn opened_positions(&self) -> &BTreeSet<usize> {
        &self.opened_positions
    }

    pub fn popup_blocked(&self) -> bool {
        self.popup_blocked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    raw_input: String,
    input: NormalizedInput,
    config: RunConfig,
    range: RangeWindow,
    filter_pattern: String,
    append_params: String,
    effective: Vec<String>,
    pattern_error: Option<InvalidPatternError>,
    run: RunState,
    live_run: Option<RunId>,
    next_run_id: RunId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.run.phase,
            total_identifiers: self.input.len(),
            duplicates: self.input.duplicates.iter().copied().collect(),
            range: self.range,
            filter_pattern: self.filter_pattern.clone(),
            append_params: self.append_params.clone(),
            pattern_error: self.pattern_error.as_ref().map(ToString::to_string),
            effective_urls: self.effective.clone(),
            config: self.config.clone(),
            progress: ProgressSnapshot {
                position: self.run.position,
                total: self.effective.len(),
            },
            opened_positions: self.run.opened_positions.iter().copied().collect(),
            popup_blocked: self.run.popup_blocked,
            run_in_flight: self.live_run.is_some(),
            dirty: self.dirty,
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn identifiers(&self) -> &[String] {
        &self.input.identifiers
    }

    pub fn effective(&self) -> &[String] {
        &self.effective
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn range(&self) -> RangeWindow {
        self.range
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn pattern_error(&self) -> Option<&InvalidPatternError> {
        self.pattern_error.as_ref()
    }

    /// The run the engine is still executing, if any.
    pub fn live_run(&self) -> Option<RunId> {
        self.live_run
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_raw_input(&mut self, raw: String) {
        self.input = normalize(&raw);
        self.raw_input = raw;
        self.range = RangeWindow::full(self.input.len());
    }

    pub(crate) fn clear_input(&mut self) {
        self.set_raw_input(String::new());
    }

    pub(crate) fn config_mut(&mut self) -> &mut RunConfig {
        &mut self.config
    }

    pub(crate) fn set_range(&mut self, start: usize, end: usize) {
        self.range = RangeWindow::clamped(start, end, self.input.len());
    }

    pub(crate) fn set_filter_pattern(&mut self, pattern: String) {
        self.filter_pattern = pattern;
    }

    pub(crate) fn set_append_params(&mut self, params: String) {
        self.append_params = params;
    }

    /// Recompute the effective list from scratch. The run cursor indexes into
    /// that list, so progress is discarded. Returns the live run, which the
    /// caller must stop.
    pub(crate) fn rederive(&mut self) -> Option<RunId> {
        let derived = derive_effective(
            &self.input.identifiers,
            self.range,
            &self.filter_pattern,
            &self.append_params,
        );
        self.effective = derived.urls;
        self.pattern_error = derived.pattern_error;
        self.reset_run()
    }

    /// Back to `Idle` at position 0. Returns the live run, which the caller
    /// must stop.
    pub(crate) fn reset_run(&mut self) -> Option<RunId> {
        self.run = RunState::default();
        self.mark_dirty();
        self.live_run.take()
    }

    pub(crate) fn rewind(&mut self) {
        self.run.position = 0;
        self.run.opened_positions.clear();
    }

    /// Register a new run starting at the current position.
    pub(crate) fn begin_run(&mut self) -> RunId {
        self.next_run_id += 1;
        let run_id = self.next_run_id;
        self.live_run = Some(run_id);
        self.run.phase = RunPhase::Running;
        self.run.popup_blocked = false;
        self.mark_dirty();
        run_id
    }

    pub(crate) fn request_pause(&mut self) {
        self.run.phase = RunPhase::Paused;
        self.mark_dirty();
    }

    pub(crate) fn is_live(&self, run_id: RunId) -> bool {
        self.live_run == Some(run_id)
    }

    /// Record a finished stride. Returns true when this is the first blocked
    /// open of the run.
    pub(crate) fn apply_stride(
        &mut self,
        position: usize,
        opened: &[usize],
        blocked: usize,
    ) -> bool {
        self.run.position = position.min(self.effective.len());
        self.run.opened_positions.extend(opened.iter().copied());
        self.mark_dirty();
        if blocked > 0 && !self.run.popup_blocked {
            self.run.popup_blocked = true;
            return true;
        }
        false
    }

    pub(crate) fn finish_run(&mut self, position: usize, phase: RunPhase) {
        self.live_run = None;
        self.run.position = position.min(self.effective.len());
        self.run.phase = phase;
        self.mark_dirty();
    }

    pub(crate) fn dismiss_warning(&mut self) {
        if self.run.popup_blocked {
            self.run.popup_blocked = false;
            self.mark_dirty();
        }
    }
}
