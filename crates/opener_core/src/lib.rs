//! Bulk opener core: input normalization, effective-list derivation and the
//! pure run state machine driven by [`update`].
mod batch;
mod config;
mod effect;
mod msg;
mod normalize;
mod pipeline;
mod state;
mod update;
mod view_model;

pub use batch::{total_to_open, NothingToOpenError};
pub use config::{delay_from_secs, ConfigError, ConfigPatch, OpenTarget, RunConfig};
pub use effect::{Effect, Notice, RunRequest, EXPORT_FILENAME};
pub use msg::Msg;
pub use normalize::{normalize, NormalizedInput};
pub use pipeline::{
    append_query, compile_filter, derive_effective, Derived, InvalidPatternError, RangeWindow,
};
pub use state::{AppState, RunId, RunPhase, RunState};
pub use update::update;
pub use view_model::{AppViewModel, ProgressSnapshot};
