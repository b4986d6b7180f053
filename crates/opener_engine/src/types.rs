use std::fmt;

use crate::delay::DelayRange;

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Tab,
    Window,
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenMode::Tab => write!(f, "tab"),
            OpenMode::Window => write!(f, "window"),
        }
    }
}

/// One run: open `total` URLs of `urls` starting at `start`, `stride` at a
/// time, waiting a random delay from `delay` between strides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub run_id: RunId,
    pub urls: Vec<String>,
    pub start: usize,
    pub total: usize,
    pub stride: usize,
    pub mode: OpenMode,
    pub delay: DelayRange,
}

impl BatchPlan {
    /// Exclusive end position, never past the list.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.total).min(self.urls.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrideReport {
    pub run_id: RunId,
    /// Cursor after the stride.
    pub position: usize,
    /// 1-based positions that opened a context.
    pub opened: Vec<usize>,
    /// 1-based positions whose open was refused.
    pub blocked: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StrideCompleted(StrideReport),
    RunPaused { run_id: RunId, position: usize },
    RunCompleted { run_id: RunId, position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    Completed { position: usize },
    Paused { position: usize },
}

impl RunEnd {
    pub fn position(&self) -> usize {
        match self {
            RunEnd::Completed { position } | RunEnd::Paused { position } => *position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpenError {
    #[error("invalid url {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("could not launch browser for {url:?}: {message}")]
    Launch { url: String, message: String },
    #[error("opening {url:?} was refused")]
    Refused { url: String },
}
