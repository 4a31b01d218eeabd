use crate::config::DiscoveryOptions;
use crate::engine::crossover::crossover;
use crate::engine::genome::{Genome, ScoreVector, SolutionItem};
use crate::engine::host::SolutionHost;
use crate::engine::progress::{CompletionReason, DiscoveryCallback};
use crate::engine::scheduler::Steppable;
use crate::engine::selection::{self, Parents};
use crate::error::{EvoSearchError, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Pollable cancellation flag. Checked once at the top of each step; no
/// mid-step cancellation occurs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity token for a worker, used by the cooperative scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(u64);

impl WorkerId {
    pub(crate) fn next() -> Self {
        WorkerId(NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Stop,
}

/// A single discovery run as a step-driven state machine.
///
/// The first step seeds generation 0; every later step advances one
/// generation: select parents, breed the next generation, record the winner.
/// The worker creates no threads of its own. Suspension between steps is
/// simply returning from `step()`; all state lives in the worker's fields,
/// so an external scheduler can interleave many workers on one thread.
pub struct SolutionWorker<T, H, C> {
    id: WorkerId,
    options: DiscoveryOptions,
    host: H,
    callback: C,
    cancel: CancelToken,
    predefined: Vec<Genome<T>>,
    predefined_scored: Vec<SolutionItem<T>>,
    generation: Vec<SolutionItem<T>>,
    history: Vec<ScoreVector>,
    best_score: Option<ScoreVector>,
    last_winner: Option<SolutionItem<T>>,
    iteration: usize,
    seeded: bool,
    finished: Option<CompletionReason>,
    failed: bool,
    genome_len: Option<usize>,
    rng: StdRng,
}

impl<T, H, C> SolutionWorker<T, H, C>
where
    T: Clone,
    H: SolutionHost<T>,
    C: DiscoveryCallback<T>,
{
    pub fn new(
        options: DiscoveryOptions,
        host: H,
        callback: C,
        cancel: CancelToken,
        predefined: Vec<Genome<T>>,
    ) -> Result<Self> {
        options.validate()?;

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            id: WorkerId::next(),
            options,
            host,
            callback,
            cancel,
            predefined,
            predefined_scored: Vec::new(),
            generation: Vec::new(),
            history: Vec::new(),
            best_score: None,
            last_winner: None,
            iteration: 0,
            seeded: false,
            finished: None,
            failed: false,
            genome_len: None,
            rng,
        })
    }

    /// Advance the run by one step. The first call seeds generation 0 and
    /// returns `Continue`; later calls run one full generation. Returns
    /// `Stop` once the run has finished, and keeps returning it afterwards.
    /// An internal error leaves the worker permanently stopped.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.step_inner() {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    fn step_inner(&mut self) -> Result<StepOutcome> {
        if self.finished.is_some() || self.failed {
            return Ok(StepOutcome::Stop);
        }

        if self.cancel.is_cancelled() {
            self.finish(CompletionReason::PrematureCancelled);
            return Ok(StepOutcome::Stop);
        }

        if self.iteration >= self.options.max_iterations {
            self.finish(CompletionReason::PrematureMaxIterations);
            return Ok(StepOutcome::Stop);
        }
        self.iteration += 1;

        if !self.seeded {
            self.seed()?;
            self.seeded = true;
            return Ok(StepOutcome::Continue);
        }

        self.advance()?;
        Ok(StepOutcome::Continue)
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn history(&self) -> &[ScoreVector] {
        &self.history
    }

    pub fn best_score(&self) -> Option<&ScoreVector> {
        self.best_score.as_ref()
    }

    pub fn last_winner(&self) -> Option<&SolutionItem<T>> {
        self.last_winner.as_ref()
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn completion(&self) -> Option<CompletionReason> {
        self.finished
    }

    /// Whether the worker stopped because of an internal error rather than a
    /// normal completion.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Score a genome and wrap it as an item, enforcing the run-wide genome
    /// and score-vector length contracts at the point of first detection.
    fn make_item(&mut self, genome: Genome<T>) -> Result<SolutionItem<T>> {
        if genome.is_empty() {
            return Err(EvoSearchError::Contract(
                "Host produced an empty genome".to_string(),
            ));
        }
        match self.genome_len {
            None => self.genome_len = Some(genome.len()),
            Some(expected) if genome.len() != expected => {
                return Err(EvoSearchError::Contract(format!(
                    "Genome length {} does not match run length {}",
                    genome.len(),
                    expected
                )));
            }
            _ => {}
        }

        let score = self.host.score(&genome);
        let dims = self.options.score_ascend_descend.len();
        if score.len() != dims {
            return Err(EvoSearchError::Contract(format!(
                "Score vector length {} does not match {} declared dimensions",
                score.len(),
                dims
            )));
        }

        Ok(SolutionItem::new(genome, score))
    }

    /// Build generation 0. When a predefined pool was supplied, each slot is
    /// a coin flip between a pool member and a fresh sample; pool members
    /// are scored once here and reused without rescoring.
    fn seed(&mut self) -> Result<()> {
        let predefined = std::mem::take(&mut self.predefined);
        for genome in predefined {
            let item = self.make_item(genome)?;
            self.predefined_scored.push(item);
        }

        let mut generation = Vec::with_capacity(self.options.generation_size);
        for _ in 0..self.options.generation_size {
            if !self.predefined_scored.is_empty() && self.rng.gen_bool(0.5) {
                let idx = self.rng.gen_range(0..self.predefined_scored.len());
                generation.push(self.predefined_scored[idx].clone());
            } else {
                let genome = self.host.new_sample();
                generation.push(self.make_item(genome)?);
            }
        }

        log::debug!("{}: seeded generation of {}", self.id, generation.len());
        self.generation = generation;
        Ok(())
    }

    fn advance(&mut self) -> Result<()> {
        let parents = selection::build_parents(
            &self.generation,
            &self.options.score_ascend_descend,
            self.options.min_best_count,
            self.options.std_dev_multiplier,
            self.host.supports_species(),
        )?;

        let next = self.breed(&parents)?;

        let winner_idx = selection::winner(&parents).ok_or_else(|| {
            EvoSearchError::Internal("Selection produced an empty tree".to_string())
        })?;
        let winner = self.generation[winner_idx].clone();

        log::debug!(
            "{}: iteration {} winner scores {:?}",
            self.id,
            self.iteration,
            winner.score
        );

        self.generation = next;
        self.history.push(winner.score.clone());

        let improved = match &self.best_score {
            Some(best) => selection::strictly_better(
                &winner.score,
                best,
                &self.options.score_ascend_descend,
            ),
            None => true,
        };
        if improved {
            self.best_score = Some(winner.score.clone());
            self.callback.on_new_best(
                &winner,
                CompletionReason::IntermediateNewBest,
                &self.history,
            );
        }

        self.last_winner = Some(winner);
        Ok(())
    }

    /// Produce the next generation: a small fresh-sample injection, children
    /// bred from the selection tree until the target size is reached, then
    /// every item referenced by the tree appended additively as elites.
    fn breed(&mut self, parents: &Parents) -> Result<Vec<SolutionItem<T>>> {
        let size = self.options.generation_size;
        let mut next = Vec::with_capacity(size);

        let fresh = (size / 100).max(1).min(size);
        for _ in 0..fresh {
            let genome = self.host.new_sample();
            next.push(self.make_item(genome)?);
        }

        // Breeding samples from every node of the tree, intermediate levels
        // included: items kept at several levels are intentionally drawn
        // proportionally more often. See DESIGN.md before restricting this
        // to leaf groups.
        let nodes = selection::collect_nodes(parents);
        let pools: Vec<Vec<usize>> = nodes.iter().map(|n| n.members.clone()).collect();

        while next.len() < size {
            let children = self.breed_batch(&pools)?;
            if children.is_empty() {
                return Err(EvoSearchError::Internal(
                    "Breeding produced no children from a non-empty pool".to_string(),
                ));
            }
            for child in children {
                if next.len() >= size {
                    break;
                }
                next.push(child);
            }
        }

        // Elite carry-over is additive: the generation is rebuilt to exactly
        // its target size first, then the parents ride along unscored.
        for idx in selection::referenced_members(parents) {
            next.push(self.generation[idx].clone());
        }

        Ok(next)
    }

    fn breed_batch(&mut self, pools: &[Vec<usize>]) -> Result<Vec<SolutionItem<T>>> {
        let pool = &pools[self.rng.gen_range(0..pools.len())];
        if pool.is_empty() {
            return Err(EvoSearchError::Internal(
                "Selection tree contains an empty group".to_string(),
            ));
        }

        let parent_count = self.pick_parent_count(pool.len());
        if parent_count <= 1 {
            // Asexual: mutate a single pool member.
            let idx = pool[self.rng.gen_range(0..pool.len())];
            let genome = self.host.mutate(&self.generation[idx].genome);
            return Ok(vec![self.make_item(genome)?]);
        }

        let picks = index::sample(&mut self.rng, pool.len(), parent_count);
        let parent_genomes: Vec<Genome<T>> = picks
            .iter()
            .map(|i| self.generation[pool[i]].genome.clone())
            .collect();

        let num_slices = self.pick_slice_count(parent_genomes[0].len());
        let mut children = crossover(&parent_genomes, num_slices, &mut self.rng)?;

        // Batch mutation is all-or-nothing, not per child.
        if self.rng.gen_bool(0.5) {
            let mutated: Vec<Genome<T>> = children.iter().map(|c| self.host.mutate(c)).collect();
            children = mutated;
        }

        children
            .into_iter()
            .map(|genome| self.make_item(genome))
            .collect()
    }

    /// Tiered parent-count policy: 25% asexual, 25% two parents, otherwise
    /// a power-shaped draw in `[3, min(7, pool)]` favoring smaller counts.
    fn pick_parent_count(&mut self, pool_size: usize) -> usize {
        let roll: f64 = self.rng.gen();
        let count = if roll < 0.25 {
            1
        } else if roll < 0.5 {
            2
        } else {
            let max = pool_size.min(7);
            if max < 3 {
                max
            } else {
                let shaped: f64 = self.rng.gen::<f64>().powf(1.5);
                3 + (shaped * (max - 2) as f64) as usize
            }
        };
        count.min(pool_size)
    }

    /// Slice count for the crossover engine: a power-shaped draw (exponent
    /// 2) scaled into `[1, L - 1]`, favoring fewer slices.
    fn pick_slice_count(&mut self, genome_len: usize) -> usize {
        if genome_len < 2 {
            return 0;
        }
        let shaped: f64 = self.rng.gen::<f64>().powf(2.0);
        1 + (shaped * (genome_len - 1) as f64) as usize
    }

    fn finish(&mut self, reason: CompletionReason) {
        self.finished = Some(reason);
        self.callback
            .on_final(self.last_winner.as_ref(), reason, &self.history);
    }
}

impl<T, H, C> Steppable for SolutionWorker<T, H, C>
where
    T: Clone,
    H: SolutionHost<T>,
    C: DiscoveryCallback<T>,
{
    fn id(&self) -> WorkerId {
        self.id
    }

    fn step_once(&mut self) -> bool {
        match self.step() {
            Ok(StepOutcome::Continue) => true,
            Ok(StepOutcome::Stop) => false,
            Err(e) => {
                log::error!("{} aborted: {}", self.id, e);
                false
            }
        }
    }
}
