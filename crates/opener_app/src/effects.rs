use std::path::PathBuf;
use std::sync::Arc;

use opener_core::{Effect, Msg, Notice, OpenTarget, RunRequest};
use opener_engine::{
    BatchPlan, ContextOpener, DelayRange, EngineEvent, EngineHandle, ExportWriter, OpenMode,
};
use opener_logging::{opener_error, opener_info, opener_warn};

use crate::render;

/// Carries core effects out against the engine and turns engine events back
/// into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    exporter: ExportWriter,
}

impl EffectRunner {
    pub fn new(opener: Arc<dyn ContextOpener>, export_dir: PathBuf) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(opener)?;
        Ok(Self {
            engine,
            exporter: ExportWriter::new(export_dir),
        })
    }

    pub fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun(request) => {
                    opener_info!(
                        "StartRun run_id={} start={} total={} stride={}",
                        request.run_id,
                        request.start_position,
                        request.total_to_open,
                        request.stride
                    );
                    self.engine.start(to_plan(request));
                }
                Effect::PauseRun { run_id } => {
                    if !self.engine.pause(run_id) {
                        opener_info!("PauseRun run_id={} already finished", run_id);
                    }
                }
                Effect::ExportInput { filename, contents } => {
                    match self.exporter.write(&filename, &contents) {
                        Ok(path) => println!("Exported to {}", path.display()),
                        Err(err) => {
                            opener_error!("Export to {:?} failed: {}", self.exporter.dir(), err);
                            eprintln!("Export failed: {err}");
                        }
                    }
                }
                Effect::Notify(notice) => {
                    if matches!(notice, Notice::ContextsBlocked { .. }) {
                        opener_warn!("{:?}", notice);
                    }
                    eprintln!("{}", render::notice_text(&notice));
                }
            }
        }
    }

    /// Drain pending engine events as messages.
    pub fn poll_events(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }
}

fn to_plan(request: RunRequest) -> BatchPlan {
    BatchPlan {
        run_id: request.run_id,
        urls: request.urls,
        start: request.start_position,
        total: request.total_to_open,
        stride: request.stride,
        mode: map_target(request.target),
        delay: DelayRange::new(request.min_delay, request.max_delay),
    }
}

fn map_target(target: OpenTarget) -> OpenMode {
    match target {
        OpenTarget::Tab => OpenMode::Tab,
        OpenTarget::Window => OpenMode::Window,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StrideCompleted(report) => Msg::StrideCompleted {
            run_id: report.run_id,
            position: report.position,
            opened: report.opened,
            blocked: report.blocked.len(),
        },
        EngineEvent::RunPaused { run_id, position } => Msg::RunPaused { run_id, position },
        EngineEvent::RunCompleted { run_id, position } => Msg::RunCompleted { run_id, position },
    }
}
