use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use opener_logging::{opener_debug, opener_warn};
use tokio_util::sync::CancellationToken;

use crate::opener::ContextOpener;
use crate::runner::BatchRunner;
use crate::sink::ChannelProgressSink;
use crate::{BatchPlan, EngineEvent, RunId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Start {
        plan: BatchPlan,
        cancel: CancellationToken,
    },
}

type LiveRuns = Arc<Mutex<HashMap<RunId, CancellationToken>>>;

/// Runs plans on a background tokio runtime and reports [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    live: LiveRuns,
}

impl EngineHandle {
    pub fn new(opener: Arc<dyn ContextOpener>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let live: LiveRuns = Arc::new(Mutex::new(HashMap::new()));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("opener-engine")
            .build()?;

        let task_live = live.clone();
        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start { plan, cancel } => {
                        let opener = opener.clone();
                        let sink = ChannelProgressSink::new(event_tx.clone());
                        let live = task_live.clone();
                        runtime.spawn(async move {
                            let mut runner = BatchRunner::new(opener);
                            let end = runner.run(&plan, &sink, &cancel).await;
                            opener_debug!(
                                "Run {} ended at {}: {:?}",
                                plan.run_id,
                                end.position(),
                                end
                            );
                            if let Ok(mut runs) = live.lock() {
                                runs.remove(&plan.run_id);
                            }
                        });
                    }
                }
            }
            // Dropping the runtime here abandons any run still waiting.
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            live,
        })
    }

    pub fn start(&self, plan: BatchPlan) {
        let cancel = CancellationToken::new();
        match self.live.lock() {
            Ok(mut runs) => {
                runs.insert(plan.run_id, cancel.clone());
            }
            Err(_) => opener_warn!(
                "Live run table poisoned; run {} cannot be paused",
                plan.run_id
            ),
        }
        if self
            .cmd_tx
            .send(EngineCommand::Start { plan, cancel })
            .is_err()
        {
            opener_warn!("Engine thread has stopped; run not started");
        }
    }

    /// Signal the run to stop at its next wait. Returns false if the run is
    /// unknown or already finished.
    pub fn pause(&self, run_id: RunId) -> bool {
        let token = self
            .live
            .lock()
            .ok()
            .and_then(|mut runs| runs.remove(&run_id));
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
