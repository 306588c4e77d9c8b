//! Progress hooks.

use crate::genome::{Fitness, Genome};
use tracing::info;

/// Receives progress notifications from the engine.
///
/// Both methods default to no-ops. Return values are ignored and the
/// engine behaves identically with or without an observer.
pub trait Observer<G: Genome> {
    /// Called when an individual beats the current epoch's best.
    fn on_improvement(&mut self, _genome: &G, _fitness: G::Fitness, _iteration: u64) {}

    /// Called after a stagnation restart has refilled the population.
    fn on_restart(&mut self, _iteration: u64, _restarts: u64) {}
}

/// Observer that reports progress through `tracing` at `info` level.
///
/// While it is attached the engine logs its own progress events at `debug`
/// level only, so each improvement is reported once.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<G: Genome + std::fmt::Debug> Observer<G> for TracingObserver {
    fn on_improvement(&mut self, genome: &G, fitness: G::Fitness, iteration: u64) {
        info!(
            iteration,
            fitness = fitness.to_f64(),
            genome = ?genome,
            "best solution so far"
        );
    }

    fn on_restart(&mut self, iteration: u64, restarts: u64) {
        info!(iteration, restarts, "population restarted");
    }
}
