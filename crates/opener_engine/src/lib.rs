//! Bulk opener engine: batch runner, browser openers and export IO.
mod delay;
mod engine;
mod export;
mod opener;
mod runner;
mod sink;
mod types;

pub use delay::{wait_or_cancel, DelayRange, WaitOutcome};
pub use engine::{EngineError, EngineHandle};
pub use export::{ensure_output_dir, ExportError, ExportWriter};
pub use opener::{ContextOpener, DryRunOpener, SystemBrowserOpener};
pub use runner::BatchRunner;
pub use sink::{ChannelProgressSink, ProgressSink};
pub use types::{BatchPlan, EngineEvent, OpenError, OpenMode, RunEnd, RunId, StrideReport};

pub use tokio_util::sync::CancellationToken;
