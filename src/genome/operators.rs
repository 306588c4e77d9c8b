//! Sequence-preserving genetic operators.
//!
//! Crossover and mutation operators for permutation-encoded chromosomes.
//! They are generic over the gene type and never add or drop a gene: the
//! child is always a rearrangement of the parents' common multiset, so a
//! fitness function may rely on "each symbol appears exactly once".
//!
//! # Crossover Operators
//!
//! - [`agreement_crossover`]: keeps genes where both parents agree, fills
//!   the rest by coin flips between the parents' remaining order
//!
//! # Mutation Operators
//!
//! - [`swap_mutation`]: Exchange two random positions (possibly equal), O(1)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Agreement crossover for permutations.
///
/// Preserves every position where both parents agree and the **relative
/// order** of the genes they disagree on.
///
/// # Algorithm
///
/// 1. Walk both parents left to right on two shrinking working copies.
///    Where the working copies agree at the current index, commit the gene
///    to the child and remove it from both; otherwise mark the child slot
///    as a conflict and advance.
/// 2. Fill each conflict slot in order with a fair coin: take the front of
///    the first working copy or the front of the second, and remove that
///    gene (first occurrence by value) from the other copy too.
///
/// Crossing a parent with itself returns the parent unchanged.
///
/// # Complexity
/// O(n²) time worst case (ordered removal), O(n) space
///
/// # Panics
/// Panics if the parents have different lengths or are not arrangements of
/// the same multiset.
pub fn agreement_crossover<T, R>(parent1: &[T], parent2: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone + PartialEq,
    R: Rng + ?Sized,
{
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );

    let mut left = parent1.to_vec();
    let mut right = parent2.to_vec();
    let mut child: Vec<Option<T>> = Vec::with_capacity(parent1.len());
    let mut conflicts = Vec::new();

    // Step 1: commit agreements
    let mut i = 0;
    while i < left.len() {
        if left[i] == right[i] {
            right.remove(i);
            child.push(Some(left.remove(i)));
        } else {
            conflicts.push(child.len());
            child.push(None);
            i += 1;
        }
    }

    // Step 2: resolve conflicts by coin flip
    for slot in conflicts {
        let gene = if rng.random_bool(0.5) {
            let gene = left.remove(0);
            remove_first(&mut right, &gene);
            gene
        } else {
            let gene = right.remove(0);
            remove_first(&mut left, &gene);
            gene
        };
        child[slot] = Some(gene);
    }

    child.into_iter().flatten().collect()
}

/// Remove the first occurrence of `gene`, keeping the order of the rest.
fn remove_first<T: PartialEq>(genes: &mut Vec<T>, gene: &T) {
    let pos = genes
        .iter()
        .position(|g| g == gene)
        .expect("parents must be arrangements of the same genes");
    genes.remove(pos);
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two independently drawn positions.
///
/// Both positions are drawn uniformly; drawing the same position twice is
/// a no-op.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<T, R: Rng + ?Sized>(perm: &mut [T], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    perm.swap(i, j);
}

// ============================================================================
// Tests
// ============================================================================
