//! Genome abstraction.
//!
//! A genome is one candidate solution together with the reproduction
//! operators of its representation. The engine never looks inside a
//! genome: it only asks for fresh individuals, scores them, and asks two
//! parents to [`spawn`](Genome::spawn) a child.
//!
//! # Core Traits
//!
//! - [`Fitness`]: Comparable score, lower is better
//! - [`Genome`]: Representation contract: fresh, copy, weighted spawn
//!
//! # Key Types
//!
//! - [`OperatorTable`]: Weighted operator tags rolled by `spawn`
//! - [`PermutationGenome`]: Reference representation over ordered symbols
//!
//! # Submodules
//!
//! - [`operators`]: Generic crossover and mutation primitives on slices

pub mod operators;
mod permutation;
mod table;
mod types;

pub use permutation::{PermutationGenome, PermutationOp};
pub use table::OperatorTable;
pub use types::{Fitness, Genome};
