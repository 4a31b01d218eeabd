use crate::config::DiscoveryOptions;
use crate::engine::genome::{Genome, ScoreVector, SolutionItem};
use crate::engine::host::SolutionHost;
use crate::engine::progress::{CompletionReason, DiscoveryCallback};
use crate::engine::scheduler::RoundRobinScheduler;
use crate::engine::worker::{CancelToken, SolutionWorker, StepOutcome, WorkerId};
use crate::error::{EvoSearchError, Result};

/// Outcome of a completed synchronous run. The same data reaches the
/// `on_final` callback; the report exists so blocking callers need no
/// callback plumbing.
#[derive(Debug, Clone)]
pub struct DiscoveryReport<T> {
    pub winner: Option<SolutionItem<T>>,
    pub reason: CompletionReason,
    pub history: Vec<ScoreVector>,
}

/// Run one discovery to completion on the calling thread.
pub fn discover<T, H, C>(
    host: H,
    callback: C,
    options: DiscoveryOptions,
    predefined: Vec<Genome<T>>,
    cancel: CancelToken,
) -> Result<DiscoveryReport<T>>
where
    T: Clone,
    H: SolutionHost<T>,
    C: DiscoveryCallback<T>,
{
    let mut worker = SolutionWorker::new(options, host, callback, cancel, predefined)?;
    while worker.step()? == StepOutcome::Continue {}

    let reason = worker.completion().ok_or_else(|| {
        EvoSearchError::Internal("Worker stopped without a completion reason".to_string())
    })?;

    Ok(DiscoveryReport {
        winner: worker.last_winner().cloned(),
        reason,
        history: worker.history().to_vec(),
    })
}

/// Hand a discovery to an external cooperative scheduler and return its
/// identity token immediately. The scheduler drives all further stepping;
/// results arrive through the worker's callbacks.
pub fn discover_with_scheduler<T, H, C>(
    host: H,
    callback: C,
    options: DiscoveryOptions,
    predefined: Vec<Genome<T>>,
    cancel: CancelToken,
    scheduler: &mut RoundRobinScheduler,
) -> Result<WorkerId>
where
    T: Clone + 'static,
    H: SolutionHost<T> + 'static,
    C: DiscoveryCallback<T> + 'static,
{
    let worker = SolutionWorker::new(options, host, callback, cancel, predefined)?;
    Ok(scheduler.register(Box::new(worker)))
}
