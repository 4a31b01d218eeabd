use crate::engine::genome::{Genome, ScoreVector};

/// Caller-supplied side of the discovery contract.
///
/// The engine never interprets genomes; sampling, scoring and mutation are
/// all delegated here. Implementations run synchronously on whichever thread
/// drives the worker, so they must be fast and non-blocking.
///
/// Scoring must be deterministic for the life of an item: the engine scores
/// each genome exactly once and reuses the result without rescoring.
pub trait SolutionHost<T> {
    /// Produce one fresh random genome. Every genome returned during a run
    /// must have the same length.
    fn new_sample(&mut self) -> Genome<T>;

    /// Score a genome, one value per declared objective dimension.
    fn score(&mut self, genome: &[T]) -> ScoreVector;

    /// Return a slightly perturbed copy. The input is never modified.
    fn mutate(&mut self, genome: &[T]) -> Genome<T>;

    /// Whether this host supplies a species-position function. Speciation is
    /// accepted in the contract but unimplemented; a host answering `true`
    /// fails the run on the first selection pass.
    fn supports_species(&self) -> bool {
        false
    }

    /// Reserved clustering hook: a position vector used to group similar
    /// candidates before deeper selection. Never called while speciation is
    /// unimplemented.
    fn species_position(&mut self, _genome: &[T]) -> Option<Vec<f64>> {
        None
    }
}
