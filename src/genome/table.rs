//! Weighted reproduction operator table.
//!
//! Maps operator tags to positive integer weights. Selection is a
//! roulette roll over integer weights with an inclusive boundary.

use crate::error::{EvolveError, EvolveResult};
use rand::Rng;

/// An ordered list of `(operator, weight)` pairs.
///
/// # Selection rule
///
/// [`choose`](Self::choose) draws `r` uniformly from `[0, total_weight)`
/// and walks the entries in order: the first entry with `r <= weight` wins,
/// otherwise `weight` is subtracted from `r` and the walk continues.
///
/// Because the comparison is inclusive, the first entry wins `weight + 1`
/// rolls and the last entry wins `weight - 1` rolls. This skew is part of
/// the observable operator mix and is kept as is.
///
/// # Examples
///
/// ```
/// use u_evolve::genome::OperatorTable;
///
/// let table = OperatorTable::new(vec![("copy", 1), ("swap", 3)]);
/// assert_eq!(table.total_weight(), 4);
/// assert!(table.validate().is_ok());
/// assert!((table.probability(&"copy") - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorTable<Op> {
    entries: Vec<(Op, u32)>,
    total: u64,
}

impl<Op> Default for OperatorTable<Op> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
        }
    }
}

impl<Op: Copy> OperatorTable<Op> {
    /// Creates a table from `(operator, weight)` pairs.
    ///
    /// The table is not validated here; call [`validate`](Self::validate)
    /// to fail fast, or let [`choose`](Self::choose) report the problem on
    /// first use.
    pub fn new(entries: Vec<(Op, u32)>) -> Self {
        let total = entries.iter().map(|&(_, w)| u64::from(w)).sum();
        Self { entries, total }
    }

    /// Appends an operator with the given weight.
    pub fn with(mut self, op: Op, weight: u32) -> Self {
        self.entries.push((op, weight));
        self.total += u64::from(weight);
        self
    }

    /// The `(operator, weight)` pairs in roll order.
    pub fn entries(&self) -> &[(Op, u32)] {
        &self.entries
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no operators.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates the table.
    ///
    /// Returns `Err` if the table is empty or any weight is zero.
    pub fn validate(&self) -> EvolveResult<()> {
        if self.entries.is_empty() {
            return Err(EvolveError::config("operator table is empty"));
        }
        if let Some(pos) = self.entries.iter().position(|&(_, w)| w == 0) {
            return Err(EvolveError::config(format!(
                "operator weight at position {pos} must be positive"
            )));
        }
        Ok(())
    }

    /// Rolls the table and returns the chosen operator.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the table is empty or its total weight is
    /// zero.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> EvolveResult<Op> {
        if self.entries.is_empty() || self.total == 0 {
            return Err(EvolveError::config(
                "operator table must have positive total weight",
            ));
        }
        let roll = rng.random_range(0..self.total);
        Ok(self.pick(roll))
    }

    /// Maps a roll in `[0, total)` to an operator.
    fn pick(&self, mut roll: u64) -> Op {
        for &(op, weight) in &self.entries {
            let weight = u64::from(weight);
            if roll <= weight {
                return op;
            }
            roll -= weight;
        }
        // unreachable for roll < total; keeps the walk total
        self.entries[self.entries.len() - 1].0
    }
}

impl<Op: Copy + PartialEq> OperatorTable<Op> {
    /// Exact probability that [`choose`](Self::choose) returns `op`.
    ///
    /// Accounts for the inclusive roll boundary. Returns `0.0` for an
    /// unusable table or an operator not in the table.
    pub fn probability(&self, op: &Op) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mut start = 0u64;
        let mut hits = 0u64;
        for (i, &(candidate, weight)) in self.entries.iter().enumerate() {
            let end = start + u64::from(weight);
            // rolls won by entry i: [0, end] for the first, (start, end] after
            let lo = if i == 0 { 0 } else { start + 1 };
            let hi = end.min(self.total - 1);
            if candidate == *op && hi + 1 > lo {
                hits += hi + 1 - lo;
            }
            start = end;
        }
        hits as f64 / self.total as f64
    }
}
