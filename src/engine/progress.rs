use crate::engine::genome::{ScoreVector, SolutionItem};

/// Why a worker reported progress or finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// A winner strictly dominating the previous best was found mid-run.
    IntermediateNewBest,
    /// Cancellation was requested before the iteration budget ran out.
    PrematureCancelled,
    /// The configured iteration budget was exhausted.
    PrematureMaxIterations,
}

/// Optional notification hooks, invoked synchronously from `step()`.
pub trait DiscoveryCallback<T> {
    /// A new strictly dominating best was recorded.
    fn on_new_best(
        &mut self,
        _winner: &SolutionItem<T>,
        _reason: CompletionReason,
        _history: &[ScoreVector],
    ) {
    }

    /// The run finished. `winner` is `None` when cancellation arrived before
    /// any generation produced a winner.
    fn on_final(
        &mut self,
        _winner: Option<&SolutionItem<T>>,
        _reason: CompletionReason,
        _history: &[ScoreVector],
    ) {
    }
}

/// Callback that ignores every notification.
pub struct NullCallback;

impl<T> DiscoveryCallback<T> for NullCallback {}

/// Callback that reports progress through the `log` facade.
pub struct LogProgressCallback;

impl<T> DiscoveryCallback<T> for LogProgressCallback {
    fn on_new_best(
        &mut self,
        winner: &SolutionItem<T>,
        _reason: CompletionReason,
        history: &[ScoreVector],
    ) {
        log::info!(
            "New best after {} steps: scores {:?}",
            history.len(),
            winner.score
        );
    }

    fn on_final(
        &mut self,
        winner: Option<&SolutionItem<T>>,
        reason: CompletionReason,
        history: &[ScoreVector],
    ) {
        match winner {
            Some(item) => log::info!(
                "Run finished ({:?}) after {} steps, final scores {:?}",
                reason,
                history.len(),
                item.score
            ),
            None => log::info!("Run finished ({:?}) with no winner", reason),
        }
    }
}
