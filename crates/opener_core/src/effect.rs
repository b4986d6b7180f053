use std::time::Duration;

use crate::{OpenTarget, RunId};

pub const EXPORT_FILENAME: &str = "urls.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun(RunRequest),
    PauseRun { run_id: RunId },
    ExportInput { filename: String, contents: String },
    Notify(Notice),
}

/// Everything the engine needs to execute one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub run_id: RunId,
    /// The full effective list; positions index into it.
    pub urls: Vec<String>,
    pub start_position: usize,
    pub total_to_open: usize,
    pub stride: usize,
    pub target: OpenTarget,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

/// Passive, user-facing messages. None of these stop the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidPattern { pattern: String, message: String },
    NothingToOpen { start: usize, len: usize },
    ContextsBlocked { run_id: RunId },
    /// A run was requested while the previous one has not stopped yet.
    StillStopping { run_id: RunId },
}
