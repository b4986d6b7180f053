use crate::{ConfigPatch, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User replaced the URL text.
    InputChanged(String),
    /// User edited batching or pacing settings.
    ConfigChanged(ConfigPatch),
    /// User set both ends of the range window (1-based, inclusive).
    RangeChanged { start: usize, end: usize },
    RangeStartChanged(usize),
    RangeEndChanged(usize),
    /// User edited the filter regex.
    FilterChanged(String),
    /// User edited the query parameters appended to each URL.
    AppendParamsChanged(String),
    StartClicked,
    PauseClicked,
    ResumeClicked,
    RedoClicked,
    /// Open the next batch after a completed one.
    ContinueClicked,
    /// Ctrl+Enter: start, pause, resume or redo depending on the phase.
    HotkeyPressed,
    ExportClicked,
    ClearClicked,
    /// User dismissed the "contexts blocked" warning.
    WarningDismissed,
    /// Engine finished issuing one stride.
    StrideCompleted {
        run_id: RunId,
        position: usize,
        opened: Vec<usize>,
        blocked: usize,
    },
    /// Engine observed a pause during an inter-stride wait.
    RunPaused { run_id: RunId, position: usize },
    /// Engine issued every stride of the run.
    RunCompleted { run_id: RunId, position: usize },
}
