use std::sync::Once;
use std::time::Duration;

use opener_core::{
    update, AppState, ConfigPatch, Effect, Msg, Notice, OpenTarget, RangeWindow, RunPhase,
    RunRequest, EXPORT_FILENAME,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(opener_logging::initialize_for_tests);
}

fn urls(count: usize) -> String {
    (1..=count)
        .map(|n| format!("https://site{n}.example.com"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn with_input(count: usize, batch_size: usize, concurrency: usize) -> AppState {
    let (state, _) = update(AppState::new(), Msg::InputChanged(urls(count)));
    let (state, _) = update(
        state,
        Msg::ConfigChanged(ConfigPatch {
            batch_size: Some(batch_size),
            concurrency: Some(concurrency),
            ..ConfigPatch::default()
        }),
    );
    state
}

fn start_request(effects: &[Effect]) -> RunRequest {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartRun(request) => Some(request.clone()),
            _ => None,
        })
        .expect("start effect")
}

#[test]
fn start_issues_a_run_for_one_batch() {
    init_logging();
    let state = with_input(25, 10, 3);

    let (mut state, effects) = update(state, Msg::StartClicked);
    let request = start_request(&effects);

    assert_eq!(state.run().phase(), RunPhase::Running);
    assert_eq!(request.run_id, 1);
    assert_eq!(request.urls.len(), 25);
    assert_eq!(request.start_position, 0);
    assert_eq!(request.total_to_open, 10);
    assert_eq!(request.stride, 3);
    assert_eq!(request.target, OpenTarget::Tab);
    assert!(state.consume_dirty());
}

#[test]
fn batch_larger_than_list_opens_everything() {
    init_logging();
    let state = with_input(25, 30, 1);
    let (_, effects) = update(state, Msg::StartClicked);
    assert_eq!(start_request(&effects).total_to_open, 25);

    let state = with_input(10, 0, 1);
    let (_, effects) = update(state, Msg::StartClicked);
    assert_eq!(start_request(&effects).total_to_open, 10);
}

#[test]
fn start_with_empty_list_notifies_and_stays_idle() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StartClicked);

    assert_eq!(state.run().phase(), RunPhase::Idle);
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::NothingToOpen { start: 0, len: 0 })]
    );
}

#[test]
fn strides_advance_position_and_record_openings() {
    init_logging();
    let state = with_input(6, 0, 2);
    let (state, _) = update(state, Msg::StartClicked);

    let (state, effects) = update(
        state,
        Msg::StrideCompleted {
            run_id: 1,
            position: 2,
            opened: vec![1, 2],
            blocked: 0,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.run().position(), 2);

    let (state, effects) = update(
        state,
        Msg::StrideCompleted {
            run_id: 1,
            position: 4,
            opened: vec![3],
            blocked: 1,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::ContextsBlocked { run_id: 1 })]
    );
    assert!(state.run().popup_blocked());

    // The warning is raised once per run.
    let (state, effects) = update(
        state,
        Msg::StrideCompleted {
            run_id: 1,
            position: 6,
            opened: vec![5],
            blocked: 1,
        },
    );
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::RunCompleted { run_id: 1, position: 6 });
    let view = state.view();
    assert_eq!(view.phase, RunPhase::Completed);
    assert_eq!(view.opened_positions, vec![1, 2, 3, 5]);
    assert_eq!(view.progress.progress_percent(), 100.0);
    assert!(!view.run_in_flight);

    let (state, _) = update(state, Msg::WarningDismissed);
    assert!(!state.run().popup_blocked());
}

#[test]
fn pause_then_resume_continues_from_checkpoint() {
    init_logging();
    let state = with_input(9, 0, 3);
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::StrideCompleted {
            run_id: 1,
            position: 3,
            opened: vec![1, 2, 3],
            blocked: 0,
        },
    );

    let (state, effects) = update(state, Msg::PauseClicked);
    assert_eq!(effects, vec![Effect::PauseRun { run_id: 1 }]);
    assert_eq!(state.run().phase(), RunPhase::Paused);

    // Pausing twice is a no-op.
    let (state, effects) = update(state, Msg::PauseClicked);
    assert!(effects.is_empty());

    // Resume is refused, with a notice, until the engine acknowledges the pause.
    let (state, effects) = update(state, Msg::ResumeClicked);
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::StillStopping { run_id: 1 })]
    );
    assert_eq!(state.run().phase(), RunPhase::Paused);

    let (state, _) = update(state, Msg::RunPaused { run_id: 1, position: 3 });
    let (state, effects) = update(state, Msg::ResumeClicked);
    let request = start_request(&effects);
    assert_eq!(request.run_id, 2);
    assert_eq!(request.start_position, 3);
    assert_eq!(request.total_to_open, 6);
    assert_eq!(state.run().opened_positions().len(), 3);
}

#[test]
fn continue_opens_next_batch_and_redo_starts_over() {
    init_logging();
    let state = with_input(5, 2, 2);
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::StrideCompleted {
            run_id: 1,
            position: 2,
            opened: vec![1, 2],
            blocked: 0,
        },
    );
    let (state, _) = update(state, Msg::RunCompleted { run_id: 1, position: 2 });
    assert!(state.run().is_complete());

    let (state, effects) = update(state, Msg::ContinueClicked);
    let request = start_request(&effects);
    assert_eq!(request.start_position, 2);
    assert_eq!(request.total_to_open, 2);
    let (state, _) = update(
        state,
        Msg::RunCompleted {
            run_id: request.run_id,
            position: 4,
        },
    );

    let (state, effects) = update(state, Msg::RedoClicked);
    let request = start_request(&effects);
    assert_eq!(request.start_position, 0);
    assert_eq!(request.total_to_open, 2);
    assert!(state.run().opened_positions().is_empty());
    assert_eq!(state.run().position(), 0);
}

#[test]
fn continue_past_the_end_reports_nothing_to_open() {
    init_logging();
    let state = with_input(2, 0, 1);
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(state, Msg::RunCompleted { run_id: 1, position: 2 });

    let (state, effects) = update(state, Msg::ContinueClicked);
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::NothingToOpen { start: 2, len: 2 })]
    );
    assert_eq!(state.run().phase(), RunPhase::Completed);
}

#[test]
fn hotkey_cycles_through_commands() {
    init_logging();
    let state = with_input(4, 2, 1);

    let (state, effects) = update(state, Msg::HotkeyPressed);
    assert_eq!(start_request(&effects).run_id, 1);

    let (state, effects) = update(state, Msg::HotkeyPressed);
    assert_eq!(effects, vec![Effect::PauseRun { run_id: 1 }]);
    let (state, _) = update(state, Msg::RunPaused { run_id: 1, position: 1 });

    let (state, effects) = update(state, Msg::HotkeyPressed);
    let request = start_request(&effects);
    assert_eq!(request.start_position, 1);
    let (state, _) = update(
        state,
        Msg::RunCompleted {
            run_id: request.run_id,
            position: 3,
        },
    );

    let (state, effects) = update(state, Msg::HotkeyPressed);
    assert_eq!(start_request(&effects).start_position, 0);
    assert_eq!(state.run().phase(), RunPhase::Running);
}

#[test]
fn hotkey_pressed_twice_reports_that_the_run_is_still_stopping() {
    init_logging();
    let state = with_input(6, 0, 1);
    let (state, _) = update(state, Msg::HotkeyPressed);
    let (state, effects) = update(state, Msg::HotkeyPressed);
    assert_eq!(effects, vec![Effect::PauseRun { run_id: 1 }]);

    let (state, effects) = update(state, Msg::HotkeyPressed);
    assert_eq!(
        effects,
        vec![Effect::Notify(Notice::StillStopping { run_id: 1 })]
    );
    assert_eq!(state.live_run(), Some(1));

    let (state, _) = update(state, Msg::RunPaused { run_id: 1, position: 1 });
    let (_, effects) = update(state, Msg::HotkeyPressed);
    assert_eq!(start_request(&effects).run_id, 2);
}

#[test]
fn editing_input_during_a_run_stops_it_and_resets_progress() {
    init_logging();
    let state = with_input(4, 0, 1);
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::StrideCompleted {
            run_id: 1,
            position: 1,
            opened: vec![1],
            blocked: 0,
        },
    );

    let (state, effects) = update(state, Msg::InputChanged(urls(3)));
    assert_eq!(effects, vec![Effect::PauseRun { run_id: 1 }]);
    assert_eq!(state.run().phase(), RunPhase::Idle);
    assert_eq!(state.run().position(), 0);
    assert!(state.run().opened_positions().is_empty());

    // Late events from the cancelled run are ignored.
    let before = state.clone();
    let (state, effects) = update(state, Msg::RunPaused { run_id: 1, position: 2 });
    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn config_edit_resets_position() {
    init_logging();
    let state = with_input(4, 2, 1);
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(state, Msg::RunCompleted { run_id: 1, position: 2 });

    let (state, effects) = update(
        state,
        Msg::ConfigChanged(ConfigPatch {
            target: Some(OpenTarget::Window),
            min_delay: Some(Duration::from_secs(4)),
            ..ConfigPatch::default()
        }),
    );
    assert!(effects.is_empty());
    assert_eq!(state.run().position(), 0);
    assert_eq!(state.run().phase(), RunPhase::Idle);
    assert_eq!(state.config().target(), OpenTarget::Window);
    assert_eq!(state.config().max_delay(), Duration::from_secs(4));
}

#[test]
fn range_filter_and_append_shape_the_effective_list() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::InputChanged(
            "https://a.com\nhttps://b.org\nhttps://c.com?x=1\nhttps://d.com".to_string(),
        ),
    );
    assert_eq!(state.range(), RangeWindow { start: 1, end: 4 });

    let (state, _) = update(state, Msg::RangeChanged { start: 2, end: 9 });
    assert_eq!(state.range(), RangeWindow { start: 2, end: 4 });

    let (state, _) = update(state, Msg::FilterChanged(r"\.COM".to_string()));
    let (state, _) = update(state, Msg::AppendParamsChanged("ref=bulk".to_string()));

    assert_eq!(
        state.effective(),
        &[
            "https://c.com?x=1&ref=bulk".to_string(),
            "https://d.com?ref=bulk".to_string()
        ]
    );
}

#[test]
fn range_start_past_end_is_clamped_down() {
    init_logging();
    let state = with_input(10, 0, 1);
    let (state, _) = update(state, Msg::RangeEndChanged(3));
    let (state, _) = update(state, Msg::RangeStartChanged(5));

    assert_eq!(state.range(), RangeWindow { start: 3, end: 3 });
    assert_eq!(state.effective().len(), 1);
}

#[test]
fn invalid_filter_notifies_and_keeps_list() {
    init_logging();
    let state = with_input(3, 0, 1);
    let (state, effects) = update(state, Msg::FilterChanged("[".to_string()));

    assert_eq!(state.effective().len(), 3);
    assert!(state.view().pattern_error.is_some());
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(Notice::InvalidPattern { pattern, .. })] if pattern == "["
    ));

    let (state, effects) = update(state, Msg::FilterChanged(String::new()));
    assert!(effects.is_empty());
    assert!(state.pattern_error().is_none());
}

#[test]
fn export_emits_raw_input_without_state_change() {
    init_logging();
    let raw = "https://a.com\n\nhttps://b.com\n".to_string();
    let (state, _) = update(AppState::new(), Msg::InputChanged(raw.clone()));
    let before = state.view();

    let (next, effects) = update(state, Msg::ExportClicked);

    assert_eq!(next.view(), before);
    assert_eq!(
        effects,
        vec![Effect::ExportInput {
            filename: EXPORT_FILENAME.to_string(),
            contents: raw,
        }]
    );
}

#[test]
fn clear_empties_input_and_run_state() {
    init_logging();
    let state = with_input(3, 0, 1);
    let (state, _) = update(state, Msg::StartClicked);

    let (state, effects) = update(state, Msg::ClearClicked);
    assert_eq!(effects, vec![Effect::PauseRun { run_id: 1 }]);
    assert!(state.identifiers().is_empty());
    assert_eq!(state.run().phase(), RunPhase::Idle);
    assert_eq!(state.view().progress.progress_percent(), 0.0);
}
