//! Steady-state evolutionary optimization.
//!
//! Improves a population of candidate solutions against an external,
//! minimizing fitness function:
//!
//! - **Genomes** ([`genome`]): the representation contract (fresh
//!   individuals, copies, weighted table-driven reproduction) and a
//!   reference permutation genome whose operators never break the
//!   permutation.
//! - **Engine** ([`engine`]): local tournament selection, one replacement
//!   per iteration, stagnation-triggered restarts, and time, iteration,
//!   target, and cancellation stopping rules.
//! - **Objectives** ([`fitness`]): example fitness functions (inversion
//!   count, sudoku constraint violations).
//!
//! # Architecture
//!
//! Execution is single-threaded and synchronous. The engine holds the only
//! mutable state; genomes know nothing about populations, and fitness
//! functions know nothing about the engine. Progress is reported through
//! `tracing` events and an optional [`engine::Observer`].

pub mod engine;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod random;

pub use engine::{Engine, EngineConfig, EvolveOptions, EvolveOutcome, Termination};
pub use error::{EvolveError, EvolveResult};
pub use genome::{Fitness, Genome, OperatorTable, PermutationGenome, PermutationOp};
