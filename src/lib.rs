//! Generic multi-objective evolutionary solution discovery.
//!
//! The caller supplies sampling, scoring and mutation for a fixed-length
//! genome of any element type; the engine discovers candidates optimizing
//! one or more ordered objectives. Runs execute either synchronously on the
//! calling thread or as cooperative step-driven workers sharing one thread
//! through a round-robin scheduler.

pub mod config;
pub mod engine;
pub mod error;

pub use config::DiscoveryOptions;
pub use engine::{
    discover, discover_with_scheduler, CancelToken, CompletionReason, DiscoveryCallback,
    DiscoveryReport, Genome, LogProgressCallback, NullCallback, RoundRobinScheduler, ScoreVector,
    SolutionHost, SolutionItem, SolutionWorker, StepOutcome, Steppable, WorkerId,
};
pub use error::{EvoSearchError, Result};
