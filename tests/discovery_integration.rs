use evosearch::{
    discover, discover_with_scheduler, CancelToken, CompletionReason, DiscoveryCallback,
    DiscoveryOptions, Genome, NullCallback, RoundRobinScheduler, ScoreVector, SolutionHost,
    SolutionItem, SolutionWorker, StepOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::sync::{Arc, Mutex};

/// Single-objective demo host: the genome is one real value drawn uniformly
/// from [0, 100], the score is the value itself, and mutation adds Gaussian
/// noise with small variance.
struct ValueHost {
    rng: StdRng,
    noise: Normal<f64>,
}

impl ValueHost {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            noise: Normal::new(0.0, 1.0).unwrap(),
        }
    }
}

impl SolutionHost<f64> for ValueHost {
    fn new_sample(&mut self) -> Genome<f64> {
        vec![self.rng.gen_range(0.0..100.0)]
    }

    fn score(&mut self, genome: &[f64]) -> ScoreVector {
        vec![genome[0]]
    }

    fn mutate(&mut self, genome: &[f64]) -> Genome<f64> {
        vec![genome[0] + self.noise.sample(&mut self.rng)]
    }
}

/// Two-objective host over a four-element genome: minimize the first
/// element, maximize the last.
struct PairHost {
    rng: StdRng,
}

impl SolutionHost<f64> for PairHost {
    fn new_sample(&mut self) -> Genome<f64> {
        (0..4).map(|_| self.rng.gen_range(-10.0..10.0)).collect()
    }

    fn score(&mut self, genome: &[f64]) -> ScoreVector {
        vec![genome[0], genome[3]]
    }

    fn mutate(&mut self, genome: &[f64]) -> Genome<f64> {
        let mut out = genome.to_vec();
        let idx = self.rng.gen_range(0..out.len());
        out[idx] += self.rng.gen_range(-0.25..0.25);
        out
    }
}

#[derive(Clone, Default)]
struct Recorder {
    bests: Arc<Mutex<Vec<ScoreVector>>>,
    finals: Arc<Mutex<Vec<(Option<ScoreVector>, CompletionReason, usize)>>>,
}

impl DiscoveryCallback<f64> for Recorder {
    fn on_new_best(
        &mut self,
        winner: &SolutionItem<f64>,
        _reason: CompletionReason,
        _history: &[ScoreVector],
    ) {
        self.bests.lock().unwrap().push(winner.score.clone());
    }

    fn on_final(
        &mut self,
        winner: Option<&SolutionItem<f64>>,
        reason: CompletionReason,
        history: &[ScoreVector],
    ) {
        self.finals.lock().unwrap().push((
            winner.map(|w| w.score.clone()),
            reason,
            history.len(),
        ));
    }
}

fn minimize_options(max_iterations: usize, seed: u64) -> DiscoveryOptions {
    DiscoveryOptions {
        generation_size: 20,
        max_iterations,
        score_ascend_descend: vec![false],
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn minimization_scenario_converges() {
    // 500 generation steps: one seed step plus 500 advances.
    let report = discover(
        ValueHost::new(7),
        NullCallback,
        minimize_options(501, 7),
        Vec::new(),
        CancelToken::new(),
    )
    .unwrap();

    assert_eq!(report.reason, CompletionReason::PrematureMaxIterations);
    assert_eq!(report.history.len(), 500);

    // history[0] is generation 0's winner, i.e. the minimum of the first
    // generation's scores under a minimizing objective.
    let first_generation_min = report.history[0][0];
    let winner = report.winner.expect("run must produce a winner");
    assert!(winner.score[0] < first_generation_min);
}

#[test]
fn history_never_moves_backwards_single_objective() {
    let report = discover(
        ValueHost::new(11),
        NullCallback,
        minimize_options(101, 11),
        Vec::new(),
        CancelToken::new(),
    )
    .unwrap();

    // Elites ride along between generations, so a later winner can never be
    // strictly worse than an earlier one under a single objective.
    for pair in report.history.windows(2) {
        assert!(pair[1][0] <= pair[0][0]);
    }
}

#[test]
fn new_best_sequence_is_strictly_improving() {
    let recorder = Recorder::default();
    discover(
        ValueHost::new(13),
        recorder.clone(),
        minimize_options(201, 13),
        Vec::new(),
        CancelToken::new(),
    )
    .unwrap();

    let bests = recorder.bests.lock().unwrap();
    assert!(!bests.is_empty());
    for pair in bests.windows(2) {
        assert!(pair[1][0] < pair[0][0]);
    }
}

#[test]
fn identical_seeds_give_identical_runs() {
    let run = |seed: u64| {
        discover(
            ValueHost::new(seed),
            NullCallback,
            minimize_options(51, 17),
            Vec::new(),
            CancelToken::new(),
        )
        .unwrap()
    };

    let a = run(21);
    let b = run(21);

    assert_eq!(a.history, b.history);
    let wa = a.winner.unwrap();
    let wb = b.winner.unwrap();
    assert_eq!(wa.genome, wb.genome);
    assert_eq!(wa.score, wb.score);
}

#[test]
fn cancellation_before_first_step_reports_empty_history() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let recorder = Recorder::default();
    let report = discover(
        ValueHost::new(3),
        recorder.clone(),
        minimize_options(100, 3),
        Vec::new(),
        cancel,
    )
    .unwrap();

    assert_eq!(report.reason, CompletionReason::PrematureCancelled);
    assert!(report.history.is_empty());
    assert!(report.winner.is_none());

    let finals = recorder.finals.lock().unwrap();
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0], (None, CompletionReason::PrematureCancelled, 0));
}

#[test]
fn cancellation_mid_run_stops_at_next_step() {
    let cancel = CancelToken::new();
    let mut worker = SolutionWorker::new(
        minimize_options(1000, 5),
        ValueHost::new(5),
        NullCallback,
        cancel.clone(),
        Vec::new(),
    )
    .unwrap();

    for _ in 0..10 {
        assert_eq!(worker.step().unwrap(), StepOutcome::Continue);
    }
    cancel.cancel();
    assert_eq!(worker.step().unwrap(), StepOutcome::Stop);
    assert_eq!(worker.completion(), Some(CompletionReason::PrematureCancelled));
    // Nine advancing steps completed after the seed step.
    assert_eq!(worker.history().len(), 9);
}

#[test]
fn iteration_budget_yields_exact_step_counts() {
    let budget = 25;
    let mut worker = SolutionWorker::new(
        minimize_options(budget, 29),
        ValueHost::new(29),
        NullCallback,
        CancelToken::new(),
        Vec::new(),
    )
    .unwrap();

    for _ in 0..budget {
        assert_eq!(worker.step().unwrap(), StepOutcome::Continue);
    }
    assert_eq!(worker.step().unwrap(), StepOutcome::Stop);
    assert_eq!(
        worker.completion(),
        Some(CompletionReason::PrematureMaxIterations)
    );
    assert_eq!(worker.history().len(), budget - 1);
}

#[test]
fn multi_objective_run_completes_with_full_vectors() {
    let options = DiscoveryOptions {
        generation_size: 16,
        max_iterations: 41,
        score_ascend_descend: vec![false, true],
        seed: Some(31),
        ..Default::default()
    };

    let report = discover(
        PairHost {
            rng: StdRng::seed_from_u64(31),
        },
        NullCallback,
        options,
        Vec::new(),
        CancelToken::new(),
    )
    .unwrap();

    assert_eq!(report.reason, CompletionReason::PrematureMaxIterations);
    assert_eq!(report.history.len(), 40);
    for entry in &report.history {
        assert_eq!(entry.len(), 2);
    }
    assert_eq!(report.winner.unwrap().score.len(), 2);
}

#[test]
fn predefined_pool_is_scored_once_and_reused() {
    // A dominant predefined genome should survive as the winner: it is
    // scored at seeding and carried forward through elites unchanged.
    let predefined = vec![vec![-1000.0]];
    let report = discover(
        ValueHost::new(37),
        NullCallback,
        minimize_options(31, 37),
        predefined,
        CancelToken::new(),
    )
    .unwrap();

    let winner = report.winner.unwrap();
    assert!(winner.score[0] <= -1000.0);
}

#[test]
fn scheduler_interleaves_independent_workers() {
    let mut scheduler = RoundRobinScheduler::new();
    let recorder_a = Recorder::default();
    let recorder_b = Recorder::default();

    discover_with_scheduler(
        ValueHost::new(41),
        recorder_a.clone(),
        minimize_options(11, 41),
        Vec::new(),
        CancelToken::new(),
        &mut scheduler,
    )
    .unwrap();
    discover_with_scheduler(
        ValueHost::new(43),
        recorder_b.clone(),
        minimize_options(31, 43),
        Vec::new(),
        CancelToken::new(),
        &mut scheduler,
    )
    .unwrap();

    assert_eq!(scheduler.len(), 2);
    scheduler.run_to_completion();
    assert!(scheduler.is_empty());

    let finals_a = recorder_a.finals.lock().unwrap();
    let finals_b = recorder_b.finals.lock().unwrap();
    assert_eq!(finals_a.len(), 1);
    assert_eq!(finals_b.len(), 1);
    assert_eq!(finals_a[0].1, CompletionReason::PrematureMaxIterations);
    assert_eq!(finals_b[0].1, CompletionReason::PrematureMaxIterations);
    assert_eq!(finals_a[0].2, 10);
    assert_eq!(finals_b[0].2, 30);
}

#[test]
fn cooperative_run_matches_synchronous_run() {
    let sync_report = discover(
        ValueHost::new(47),
        NullCallback,
        minimize_options(21, 47),
        Vec::new(),
        CancelToken::new(),
    )
    .unwrap();

    let recorder = Recorder::default();
    let mut scheduler = RoundRobinScheduler::new();
    discover_with_scheduler(
        ValueHost::new(47),
        recorder.clone(),
        minimize_options(21, 47),
        Vec::new(),
        CancelToken::new(),
        &mut scheduler,
    )
    .unwrap();
    scheduler.run_to_completion();

    let sync_winner_score = sync_report.winner.map(|w| w.score);
    let finals = recorder.finals.lock().unwrap();
    assert_eq!(finals[0].2, sync_report.history.len());
    assert_eq!(finals[0].0, sync_winner_score);
}

#[test]
fn breeding_pool_spans_every_tree_level() {
    // The breeding step samples from all tree levels, so intermediate
    // (superset) groups are drawn alongside leaf groups. This pins that
    // asymmetry deliberately rather than restricting sampling to leaves.
    use evosearch::engine::selection::{build_parents, collect_nodes};

    let generation: Vec<SolutionItem<f64>> = (0..8)
        .map(|i| SolutionItem::new(vec![i as f64], vec![i as f64, -(i as f64)]))
        .collect();
    let parents = build_parents(&generation, &[true, false], 3, 0.0, false).unwrap();
    let nodes = collect_nodes(&parents);

    assert_eq!(nodes.len(), 2);
    // The intermediate level's member set contains the leaf level's.
    let top = &nodes[0].members;
    let leaf = &nodes[1].members;
    assert!(leaf.iter().all(|m| top.contains(m)));
    assert!(top.len() >= leaf.len());
}
