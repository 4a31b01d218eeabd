//! Cooperative round-robin stepping.
//!
//! The engine never spawns threads. Workers that should share a thread
//! expose `Steppable` and are handed to a `RoundRobinScheduler`, which steps
//! each registered worker in turn until it reports completion. A worker is
//! suspended simply by returning from `step_once`; all of its state lives in
//! its own fields, so no worker ever runs concurrently with itself and no
//! state is shared between workers.

use crate::engine::worker::WorkerId;

/// A unit of work the scheduler can advance: one non-blocking step per call,
/// `false` once the work is done.
pub trait Steppable {
    fn id(&self) -> WorkerId;
    fn step_once(&mut self) -> bool;
}

#[derive(Default)]
pub struct RoundRobinScheduler {
    workers: Vec<Box<dyn Steppable>>,
}

impl RoundRobinScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, worker: Box<dyn Steppable>) -> WorkerId {
        let id = worker.id();
        log::debug!("Scheduler registered {}", id);
        self.workers.push(worker);
        id
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Step every registered worker once, deregistering those that finish.
    /// Returns the number of workers still active.
    pub fn tick(&mut self) -> usize {
        let mut active = Vec::with_capacity(self.workers.len());
        for mut worker in self.workers.drain(..) {
            if worker.step_once() {
                active.push(worker);
            } else {
                log::debug!("Scheduler deregistered {}", worker.id());
            }
        }
        self.workers = active;
        self.workers.len()
    }

    /// Tick until every registered worker has finished.
    pub fn run_to_completion(&mut self) {
        while self.tick() > 0 {}
    }
}
