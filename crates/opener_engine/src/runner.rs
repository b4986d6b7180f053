use std::sync::Arc;

use opener_logging::{opener_debug, opener_info, opener_warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;

use crate::delay::{wait_or_cancel, WaitOutcome};
use crate::opener::ContextOpener;
use crate::sink::ProgressSink;
use crate::{BatchPlan, EngineEvent, RunEnd, StrideReport};

/// Walks a [`BatchPlan`] stride by stride.
pub struct BatchRunner {
    opener: Arc<dyn ContextOpener>,
    rng: StdRng,
}

impl BatchRunner {
    pub fn new(opener: Arc<dyn ContextOpener>) -> Self {
        Self::with_rng(opener, StdRng::from_entropy())
    }

    /// Seeded variant for reproducible delays.
    pub fn with_rng(opener: Arc<dyn ContextOpener>, rng: StdRng) -> Self {
        Self { opener, rng }
    }

    /// Execute the plan.
    ///
    /// Every stride is issued in full before the runner suspends. The wait
    /// between strides is the only place `cancel` is observed; a cancelled
    /// wait ends the run as paused with the cursor after the last issued
    /// stride. No wait follows the final stride.
    pub async fn run(
        &mut self,
        plan: &BatchPlan,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> RunEnd {
        let stride = plan.stride.max(1);
        let end = plan.end();
        let mut position = plan.start.min(end);
        opener_info!(
            "Run {}: opening positions {}..{} in strides of {}",
            plan.run_id,
            position + 1,
            end,
            stride
        );

        while position < end {
            let stride_end = (position + stride).min(end);
            let mut opened = Vec::with_capacity(stride_end - position);
            let mut blocked = Vec::new();

            for (index, url) in plan.urls[position..stride_end].iter().enumerate() {
                let slot = position + index + 1;
                match self.opener.open(url, plan.mode) {
                    Ok(()) => opened.push(slot),
                    Err(err) => {
                        opener_warn!(
                            "Run {}: position {} not opened: {}",
                            plan.run_id,
                            slot,
                            err
                        );
                        blocked.push(slot);
                    }
                }
            }

            position = stride_end;
            opener_debug!(
                "Run {}: stride done at {} ({} opened, {} blocked)",
                plan.run_id,
                position,
                opened.len(),
                blocked.len()
            );
            sink.emit(EngineEvent::StrideCompleted(StrideReport {
                run_id: plan.run_id,
                position,
                opened,
                blocked,
            }));

            if position >= end {
                break;
            }

            let delay = plan.delay.sample(&mut self.rng);
            if wait_or_cancel(delay, cancel).await == WaitOutcome::Cancelled {
                opener_info!("Run {}: paused at {}", plan.run_id, position);
                sink.emit(EngineEvent::RunPaused {
                    run_id: plan.run_id,
                    position,
                });
                return RunEnd::Paused { position };
            }
        }

        opener_info!("Run {}: completed at {}", plan.run_id, position);
        sink.emit(EngineEvent::RunCompleted {
            run_id: plan.run_id,
            position,
        });
        RunEnd::Completed { position }
    }
}
