pub mod crossover;
pub mod discover;
pub mod genome;
pub mod host;
pub mod progress;
pub mod scheduler;
pub mod selection;
pub mod worker;

pub use crossover::crossover;
pub use discover::{discover, discover_with_scheduler, DiscoveryReport};
pub use genome::{Genome, ScoreVector, SolutionItem};
pub use host::SolutionHost;
pub use progress::{CompletionReason, DiscoveryCallback, LogProgressCallback, NullCallback};
pub use scheduler::{RoundRobinScheduler, Steppable};
pub use selection::{build_parents, ParentGroup, Parents};
pub use worker::{CancelToken, SolutionWorker, StepOutcome, WorkerId};
