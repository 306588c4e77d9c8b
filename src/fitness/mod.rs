//! Example objective functions.
//!
//! The engine treats fitness as an external concern; these objectives show
//! the expected shape (lower is better, `0` is perfect) and double as
//! benchmarks.
//!
//! - [`inversions`]: distance of a sequence from sorted order
//! - [`sudoku`]: constraint violations of a filled 9x9 grid

pub mod sudoku;

/// Number of out-of-order pairs `(i, j)` with `i < j` and `xs[i] > xs[j]`.
///
/// Zero exactly when `xs` is sorted ascending.
///
/// # Complexity
/// O(n²)
///
/// ```
/// use u_evolve::fitness::inversions;
///
/// assert_eq!(inversions(&[0, 1, 2, 3]), 0);
/// assert_eq!(inversions(&[3, 2, 1, 0]), 6);
/// assert_eq!(inversions(&[1, 0, 2]), 1);
/// ```
pub fn inversions<T: PartialOrd>(xs: &[T]) -> usize {
    xs.iter()
        .enumerate()
        .map(|(i, a)| xs[i + 1..].iter().filter(|b| a > *b).count())
        .sum()
}
