//! Steady-state evolutionary engine.
//!
//! One individual is replaced per iteration: a small tournament is drawn
//! (optionally from a local neighborhood), its two best members spawn a
//! child, and the child takes the slot of the worst member. When an epoch
//! stops improving for long enough the population is regenerated from
//! scratch, which is the engine's only defense against premature
//! convergence.
//!
//! # Key Types
//!
//! - [`EngineConfig`]: Population size, tournament shape, logging, seed
//! - [`EvolveOptions`]: Per-call time and iteration budgets, target, restarts
//! - [`Engine`]: Owns the population and runs the loop
//! - [`EvolveOutcome`]: Best individual and why the call stopped
//! - [`CancelToken`]: Cooperative cancellation checked between iterations
//! - [`Observer`]: Progress hook for new bests and restarts
//!
//! # Restart rule
//!
//! With `age = iteration - last_eden`, the population restarts before an
//! iteration when `age > max(2 * best_found, 10 * population_size)`. An
//! epoch that keeps finding late improvements is allowed to run longer.
//!
//! # References
//!
//! - Syswerda (1991), "A Study of Reproduction in Generational and
//!   Steady-State Genetic Algorithms"
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

mod cancel;
mod config;
mod observer;
mod runner;
mod selection;

pub use cancel::CancelToken;
pub use config::{EngineConfig, EvolveOptions};
pub use observer::{Observer, TracingObserver};
pub use runner::{Engine, EvolveOutcome, FitnessFunction, Replacement, Termination};
pub use selection::{circular_distance, TournamentSelection};
