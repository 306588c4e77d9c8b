//! Reference permutation genome.

use super::operators::{agreement_crossover, swap_mutation};
use super::table::OperatorTable;
use super::types::{Fitness, Genome};
use crate::error::EvolveResult;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Reproduction operators of [`PermutationGenome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PermutationOp {
    /// Unchanged duplicate of the first parent.
    Copy,
    /// Uniformly shuffled arrangement, unrelated to either parent's order.
    Fresh,
    /// Agreement crossover with the partner.
    Crossover,
    /// Exchange of two random positions.
    Swap,
}

impl PermutationOp {
    /// The default operator mix: copy 1, fresh 1, crossover 2, swap 6.
    pub fn default_table() -> OperatorTable<PermutationOp> {
        OperatorTable::new(vec![
            (PermutationOp::Copy, 1),
            (PermutationOp::Fresh, 1),
            (PermutationOp::Crossover, 2),
            (PermutationOp::Swap, 6),
        ])
    }
}

/// A genome whose genes are an ordered arrangement of symbols.
///
/// Every operator rearranges genes and never replaces them, so all
/// descendants of a template share its gene multiset. With distinct symbols
/// this is a permutation; repeated symbols are allowed.
///
/// The operator table is shared between all descendants of a template.
///
/// # Examples
///
/// ```
/// use u_evolve::genome::{Genome, PermutationGenome};
/// use u_evolve::random::create_rng;
///
/// let template: PermutationGenome<u8> = PermutationGenome::new(vec![1, 2, 3, 4]);
/// let mut rng = create_rng(42);
///
/// let a = template.fresh(&mut rng);
/// let b = template.fresh(&mut rng);
/// let child = a.spawn(&b, &mut rng).unwrap();
///
/// let mut genes = child.genes().to_vec();
/// genes.sort();
/// assert_eq!(genes, vec![1, 2, 3, 4]);
/// assert!(child.fitness().is_none());
/// ```
#[derive(Clone)]
pub struct PermutationGenome<T, F = f64> {
    genes: Vec<T>,
    fitness: Option<F>,
    operators: Arc<OperatorTable<PermutationOp>>,
}

impl<T, F> PermutationGenome<T, F>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync,
    F: Fitness,
{
    /// Creates an unscored genome with the default operator table.
    pub fn new(genes: Vec<T>) -> Self {
        Self {
            genes,
            fitness: None,
            operators: Arc::new(PermutationOp::default_table()),
        }
    }

    /// Creates an unscored genome with a custom operator table.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the table is empty or has a zero weight.
    pub fn with_operators(
        genes: Vec<T>,
        operators: OperatorTable<PermutationOp>,
    ) -> EvolveResult<Self> {
        operators.validate()?;
        Ok(Self {
            genes,
            fitness: None,
            operators: Arc::new(operators),
        })
    }

    /// The gene sequence.
    pub fn genes(&self) -> &[T] {
        &self.genes
    }

    /// Mutable access to the genes.
    ///
    /// Clears the cached fitness, since it no longer describes the genes.
    pub fn genes_mut(&mut self) -> &mut Vec<T> {
        self.fitness = None;
        &mut self.genes
    }

    /// Consumes the genome, returning its genes.
    pub fn into_genes(self) -> Vec<T> {
        self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// A child with the given genes and this genome's operator table.
    fn child(&self, genes: Vec<T>) -> Self {
        Self {
            genes,
            fitness: None,
            operators: Arc::clone(&self.operators),
        }
    }
}

impl<T, F> Genome for PermutationGenome<T, F>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync,
    F: Fitness,
{
    type Fitness = F;
    type Operator = PermutationOp;

    fn fitness(&self) -> Option<F> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: F) {
        self.fitness = Some(fitness);
    }

    fn fresh<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut child = self.copy();
        child.genes.shuffle(rng);
        child
    }

    fn copy(&self) -> Self {
        self.child(self.genes.clone())
    }

    fn operators(&self) -> &OperatorTable<PermutationOp> {
        &self.operators
    }

    fn apply<R: Rng + ?Sized>(&self, op: PermutationOp, partner: &Self, rng: &mut R) -> Self {
        match op {
            PermutationOp::Copy => self.copy(),
            PermutationOp::Fresh => self.fresh(rng),
            PermutationOp::Crossover => {
                self.child(agreement_crossover(&self.genes, &partner.genes, rng))
            }
            PermutationOp::Swap => {
                let mut child = self.copy();
                swap_mutation(&mut child.genes, rng);
                child
            }
        }
    }
}

impl<T: fmt::Debug, F: fmt::Debug> fmt::Debug for PermutationGenome<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermutationGenome")
            .field("genes", &self.genes)
            .field("fitness", &self.fitness)
            .finish()
    }
}

impl<T: PartialEq, F> PartialEq for PermutationGenome<T, F> {
    /// Genomes are equal when their genes are; fitness is bookkeeping.
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}
