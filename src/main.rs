use evosearch::{
    discover, CancelToken, DiscoveryOptions, Genome, LogProgressCallback, ScoreVector,
    SolutionHost,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;

/// Demo host: minimize a single real value drawn uniformly from [0, 100].
struct MinimizeValueHost {
    rng: StdRng,
}

impl SolutionHost<f64> for MinimizeValueHost {
    fn new_sample(&mut self) -> Genome<f64> {
        vec![self.rng.gen_range(0.0..100.0)]
    }

    fn score(&mut self, genome: &[f64]) -> ScoreVector {
        vec![genome[0]]
    }

    fn mutate(&mut self, genome: &[f64]) -> Genome<f64> {
        vec![genome[0] + self.rng.gen_range(-0.5..0.5)]
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = match args.get(1) {
        Some(path) => DiscoveryOptions::load_from_file(path)?,
        None => DiscoveryOptions {
            generation_size: 20,
            max_iterations: 500,
            score_ascend_descend: vec![false],
            seed: Some(42),
            ..Default::default()
        },
    };

    println!("=== EvoSearch Discovery Demo ===");
    println!("Generation size: {}", options.generation_size);
    println!("Max iterations:  {}", options.max_iterations);
    println!("Objectives:      {:?}", options.score_ascend_descend);
    println!();

    let host = MinimizeValueHost {
        rng: StdRng::seed_from_u64(options.seed.unwrap_or(0)),
    };

    let report = discover(
        host,
        LogProgressCallback,
        options,
        Vec::new(),
        CancelToken::new(),
    )?;

    match &report.winner {
        Some(item) => println!(
            "Finished ({:?}): genome {:?}, scores {:?}",
            report.reason, item.genome, item.score
        ),
        None => println!("Finished ({:?}) with no winner", report.reason),
    }
    println!("History: {} entries", report.history.len());
    println!("{}", serde_json::to_string(&report.history)?);

    Ok(())
}
