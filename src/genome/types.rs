//! Core trait definitions for genomes.
//!
//! [`Fitness`] and [`Genome`] define the contract between the generic
//! engine and a concrete solution representation.

use super::table::OperatorTable;
use crate::error::EvolveResult;
use rand::Rng;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable.
/// Lower fitness is considered better (minimization); `0` denotes a
/// perfect solution by convention only.
///
/// Built-in implementations exist for `f64`, `f32`, `i64`, `u32`, `u64`
/// and `usize`.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Returns a value representing the worst possible fitness.
    ///
    /// Used as the epoch-best sentinel before anything has been scored.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn worst() -> Self {
        f32::INFINITY
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! impl_integer_fitness {
    ($($t:ty),*) => {
        $(
            impl Fitness for $t {
                fn worst() -> Self {
                    <$t>::MAX
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_integer_fitness!(i64, u32, u64, usize);

/// A candidate solution that knows how to reproduce.
///
/// A genome carries its own cached fitness. The engine computes fitness
/// through the external fitness function and stores it with
/// [`set_fitness`](Genome::set_fitness); until then
/// [`fitness`](Genome::fitness) returns `None`.
///
/// Reproduction is table-driven: [`spawn`](Genome::spawn) rolls the
/// genome's [`OperatorTable`] and hands the chosen tag to
/// [`apply`](Genome::apply) together with the partner. The partner is an
/// explicit argument, so neither parent is touched.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone, Copy, Debug)]
/// enum BitOp { Flip, Fresh }
///
/// #[derive(Clone)]
/// struct Bits {
///     bits: Vec<bool>,
///     fitness: Option<u32>,
///     table: Arc<OperatorTable<BitOp>>,
/// }
///
/// impl Genome for Bits {
///     type Fitness = u32;
///     type Operator = BitOp;
///     // fitness, set_fitness, fresh, copy, operators, apply ...
/// }
/// ```
pub trait Genome: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Tag identifying one reproduction operator of this representation.
    type Operator: Copy + std::fmt::Debug;

    /// Returns the cached fitness, or `None` if the genome is unscored.
    fn fitness(&self) -> Option<Self::Fitness>;

    /// Stores the fitness computed by the engine.
    fn set_fitness(&mut self, fitness: Self::Fitness);

    /// Produces a new random individual with the same shape as `self`.
    ///
    /// Used both as a reproduction operator and to seed a population.
    fn fresh<R: Rng + ?Sized>(&self, rng: &mut R) -> Self;

    /// Produces an unscored duplicate with identical genetic content and no
    /// shared mutable state.
    fn copy(&self) -> Self;

    /// The weighted reproduction operators of this genome.
    fn operators(&self) -> &OperatorTable<Self::Operator>;

    /// Runs a single reproduction operator.
    ///
    /// Must not mutate `self` or `partner`; the returned child is unscored.
    fn apply<R: Rng + ?Sized>(&self, op: Self::Operator, partner: &Self, rng: &mut R) -> Self;

    /// Produces one child from `self` and `partner` using the weighted
    /// operator table.
    ///
    /// # Errors
    /// [`EvolveError::InvalidConfiguration`](crate::EvolveError::InvalidConfiguration)
    /// if the operator table is empty or has zero total weight.
    fn spawn<R: Rng + ?Sized>(&self, partner: &Self, rng: &mut R) -> EvolveResult<Self> {
        let op = self.operators().choose(rng)?;
        Ok(self.apply(op, partner, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_is_worse_than_everything() {
        assert!(1e300_f64 < f64::worst());
        assert!(1e30_f32 < f32::worst());
        assert!(i64::MAX - 1 < i64::worst());
        assert!(0usize < usize::worst());
        assert_eq!(u32::worst(), u32::MAX);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(3u32.to_f64(), 3.0);
        assert_eq!((-2i64).to_f64(), -2.0);
        assert_eq!(1.5f32.to_f64(), 1.5);
    }
}
