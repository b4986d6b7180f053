use opener_logging::{opener_debug, opener_info};

use crate::batch::total_to_open;
use crate::effect::{Notice, RunRequest, EXPORT_FILENAME};
use crate::{AppState, Effect, Msg, RunId, RunPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(raw) => {
            state.set_raw_input(raw);
            invalidate(&mut state)
        }
        Msg::ConfigChanged(patch) => {
            if patch.is_empty() {
                return (state, Vec::new());
            }
            state.config_mut().apply(&patch);
            invalidate(&mut state)
        }
        Msg::RangeChanged { start, end } => {
            state.set_range(start, end);
            invalidate(&mut state)
        }
        Msg::RangeStartChanged(start) => {
            let end = state.range().end;
            state.set_range(start, end);
            invalidate(&mut state)
        }
        Msg::RangeEndChanged(end) => {
            let start = state.range().start;
            state.set_range(start, end);
            invalidate(&mut state)
        }
        Msg::FilterChanged(pattern) => {
            state.set_filter_pattern(pattern);
            let mut effects = invalidate(&mut state);
            if let Some(err) = state.pattern_error() {
                effects.push(Effect::Notify(Notice::InvalidPattern {
                    pattern: err.pattern.clone(),
                    message: err.message.clone(),
                }));
            }
            effects
        }
        Msg::AppendParamsChanged(params) => {
            state.set_append_params(params);
            invalidate(&mut state)
        }
        Msg::StartClicked => match state.run().phase() {
            RunPhase::Idle => launch(&mut state),
            phase => reject("start", phase),
        },
        Msg::PauseClicked => pause(&mut state),
        Msg::ResumeClicked => match state.run().phase() {
            RunPhase::Paused => launch(&mut state),
            phase => reject("resume", phase),
        },
        Msg::RedoClicked => match state.run().phase() {
            RunPhase::Running => reject("redo", RunPhase::Running),
            _ => redo(&mut state),
        },
        Msg::ContinueClicked => match state.run().phase() {
            RunPhase::Completed => launch(&mut state),
            phase => reject("continue", phase),
        },
        Msg::HotkeyPressed => match state.run().phase() {
            RunPhase::Idle => launch(&mut state),
            RunPhase::Running => pause(&mut state),
            RunPhase::Paused => launch(&mut state),
            RunPhase::Completed => redo(&mut state),
        },
        Msg::ExportClicked => vec![Effect::ExportInput {
            filename: EXPORT_FILENAME.to_string(),
            contents: state.raw_input().to_string(),
        }],
        Msg::ClearClicked => {
            state.clear_input();
            invalidate(&mut state)
        }
        Msg::WarningDismissed => {
            state.dismiss_warning();
            Vec::new()
        }
        Msg::StrideCompleted {
            run_id,
            position,
            opened,
            blocked,
        } => {
            if !state.is_live(run_id) {
                return stale(state, run_id);
            }
            if state.apply_stride(position, &opened, blocked) {
                vec![Effect::Notify(Notice::ContextsBlocked { run_id })]
            } else {
                Vec::new()
            }
        }
        Msg::RunPaused { run_id, position } => {
            if !state.is_live(run_id) {
                return stale(state, run_id);
            }
            state.finish_run(position, RunPhase::Paused);
            Vec::new()
        }
        Msg::RunCompleted { run_id, position } => {
            if !state.is_live(run_id) {
                return stale(state, run_id);
            }
            state.finish_run(position, RunPhase::Completed);
            Vec::new()
        }
    };

    (state, effects)
}

/// Recompute the effective list and stop whatever was running against the
/// old one.
fn invalidate(state: &mut AppState) -> Vec<Effect> {
    match state.rederive() {
        Some(run_id) => vec![Effect::PauseRun { run_id }],
        None => Vec::new(),
    }
}

/// Start a run from the current position.
fn launch(state: &mut AppState) -> Vec<Effect> {
    if let Some(run_id) = state.live_run() {
        // The previous run has not acknowledged its pause yet.
        opener_debug!("Rejected new run while run {} is still live", run_id);
        return vec![Effect::Notify(Notice::StillStopping { run_id })];
    }

    let start_position = state.run().position();
    let len = state.effective().len();
    let total = match total_to_open(len, start_position, state.config().batch_size()) {
        Ok(total) => total,
        Err(err) => {
            opener_info!("{}", err);
            return vec![Effect::Notify(Notice::NothingToOpen {
                start: err.start,
                len: err.len,
            })];
        }
    };

    let run_id = state.begin_run();
    let config = state.config();
    opener_info!(
        "Run {} starting at {} of {}, opening {}",
        run_id,
        start_position,
        len,
        total
    );
    vec![Effect::StartRun(RunRequest {
        run_id,
        urls: state.effective().to_vec(),
        start_position,
        total_to_open: total,
        stride: config.concurrency(),
        target: config.target(),
        min_delay: config.min_delay(),
        max_delay: config.max_delay(),
    })]
}

fn pause(state: &mut AppState) -> Vec<Effect> {
    if state.run().phase() != RunPhase::Running {
        return Vec::new();
    }
    state.request_pause();
    match state.live_run() {
        Some(run_id) => vec![Effect::PauseRun { run_id }],
        None => Vec::new(),
    }
}

fn redo(state: &mut AppState) -> Vec<Effect> {
    if let Some(run_id) = state.live_run() {
        opener_debug!("Rejected redo while run {} is still live", run_id);
        return vec![Effect::Notify(Notice::StillStopping { run_id })];
    }
    state.rewind();
    launch(state)
}

fn reject(command: &str, phase: RunPhase) -> Vec<Effect> {
    opener_debug!("Ignored {} while {:?}", command, phase);
    Vec::new()
}

fn stale(state: AppState, run_id: RunId) -> (AppState, Vec<Effect>) {
    opener_debug!("Dropped event from stale run {}", run_id);
    (state, Vec::new())
}
