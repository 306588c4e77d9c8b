//! Tournament selection for the steady-state engine.
//!
//! A tournament is a small set of population indices. The engine ranks the
//! competitors by fitness: the two best reproduce and the worst is
//! replaced by their child.
//!
//! Local tournaments draw competitors from a circular neighborhood of a
//! random midpoint, which keeps selection cheap and lets separate regions
//! of the population drift apart.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Collins & Jefferson (1991), "Selection in Massively Parallel Genetic
//!   Algorithms"

use super::config::EngineConfig;
use rand::Rng;

/// Tournament shape: number of competitors and neighborhood half-width.
///
/// # Examples
///
/// ```
/// use u_evolve::engine::TournamentSelection;
/// use u_evolve::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let local = TournamentSelection::new(3, 2);
/// let chosen = local.select(100, &mut rng);
/// assert_eq!(chosen.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelection {
    /// Number of competitors.
    pub size: usize,
    /// Neighborhood half-width; `0` means global.
    pub local_size: usize,
}

impl TournamentSelection {
    /// Creates a tournament of `size` competitors within `local_size`.
    pub fn new(size: usize, local_size: usize) -> Self {
        Self { size, local_size }
    }

    /// Whether competitors are drawn from the whole population.
    pub fn is_global(&self) -> bool {
        self.local_size == 0
    }

    /// Chooses competitor indices in `[0, population_len)`.
    ///
    /// - Global: `size` independent uniform draws (repeats allowed).
    /// - Local: a uniform midpoint, then `size - 1` draws of
    ///   `(midpoint + offset) mod population_len` with `offset` uniform in
    ///   `[-local_size, local_size)`.
    ///
    /// # Panics
    /// Panics if `population_len` is zero.
    pub fn select<R: Rng + ?Sized>(&self, population_len: usize, rng: &mut R) -> Vec<usize> {
        assert!(population_len > 0, "cannot select from empty population");

        if self.is_global() {
            return (0..self.size)
                .map(|_| rng.random_range(0..population_len))
                .collect();
        }

        let n = population_len as i64;
        let radius = self.local_size as i64;
        let midpoint = rng.random_range(0..population_len);

        let mut chosen = Vec::with_capacity(self.size);
        chosen.push(midpoint);
        for _ in 1..self.size {
            let offset = rng.random_range(-radius..radius);
            chosen.push((midpoint as i64 + offset).rem_euclid(n) as usize);
        }
        chosen
    }
}

impl From<&EngineConfig> for TournamentSelection {
    fn from(config: &EngineConfig) -> Self {
        Self::new(config.tourney_size, config.local_size)
    }
}

/// Circular distance between two indices on a ring of `n` slots.
pub fn circular_distance(a: usize, b: usize, n: usize) -> usize {
    let d = a.abs_diff(b) % n;
    d.min(n - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_global_size_and_bounds() {
        let mut rng = create_rng(42);
        let sel = TournamentSelection::new(5, 0);
        assert!(sel.is_global());
        for _ in 0..1000 {
            let chosen = sel.select(17, &mut rng);
            assert_eq!(chosen.len(), 5);
            assert!(chosen.iter().all(|&i| i < 17));
        }
    }

    #[test]
    fn test_global_covers_population() {
        let mut rng = create_rng(42);
        let sel = TournamentSelection::new(3, 0);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            for i in sel.select(4, &mut rng) {
                counts[i] += 1;
            }
        }
        for &c in &counts {
            assert!(c > 6000, "expected uniform draws, got {counts:?}");
        }
    }

    #[test]
    fn test_local_first_is_midpoint_and_rest_nearby() {
        let mut rng = create_rng(42);
        let sel = TournamentSelection::new(4, 3);
        for _ in 0..5000 {
            let chosen = sel.select(50, &mut rng);
            let midpoint = chosen[0];
            for &i in &chosen[1..] {
                assert!(
                    circular_distance(midpoint, i, 50) <= 3,
                    "index {i} too far from midpoint {midpoint}"
                );
            }
        }
    }

    #[test]
    fn test_local_wraps_around_both_ends() {
        let mut rng = create_rng(42);
        let sel = TournamentSelection::new(3, 2);
        let mut saw_low_wrap = false;
        let mut saw_high_wrap = false;
        for _ in 0..20_000 {
            let chosen = sel.select(10, &mut rng);
            let midpoint = chosen[0];
            for &i in &chosen[1..] {
                assert!(i < 10);
                if midpoint <= 1 && i >= 8 {
                    saw_low_wrap = true;
                }
                if midpoint == 9 && i == 0 {
                    saw_high_wrap = true;
                }
            }
        }
        assert!(saw_low_wrap, "offsets below 0 should wrap to the end");
        assert!(saw_high_wrap, "offsets past the end should wrap to 0");
    }

    #[test]
    fn test_local_offsets_are_half_open() {
        // offsets in [-L, L): +L is never drawn
        let mut rng = create_rng(42);
        let sel = TournamentSelection::new(2, 2);
        for _ in 0..10_000 {
            let chosen = sel.select(100, &mut rng);
            let offset = (chosen[1] as i64 - chosen[0] as i64 + 100).rem_euclid(100);
            assert!(
                matches!(offset, 0 | 1 | 98 | 99),
                "unexpected offset {offset}"
            );
        }
    }

    #[test]
    fn test_local_larger_than_population() {
        let mut rng = create_rng(42);
        let sel = TournamentSelection::new(3, 25);
        for _ in 0..1000 {
            assert!(sel.select(3, &mut rng).iter().all(|&i| i < 3));
        }
    }

    #[test]
    fn test_single_individual() {
        let mut rng = create_rng(42);
        assert_eq!(TournamentSelection::new(3, 0).select(1, &mut rng), vec![0, 0, 0]);
        assert_eq!(TournamentSelection::new(3, 4).select(1, &mut rng), vec![0, 0, 0]);
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig::default()
            .with_tourney_size(5)
            .with_local_size(7);
        assert_eq!(TournamentSelection::from(&config), TournamentSelection::new(5, 7));
    }

    #[test]
    fn test_circular_distance() {
        assert_eq!(circular_distance(0, 9, 10), 1);
        assert_eq!(circular_distance(9, 0, 10), 1);
        assert_eq!(circular_distance(2, 7, 10), 5);
        assert_eq!(circular_distance(4, 4, 10), 0);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let mut rng = create_rng(42);
        TournamentSelection::new(3, 0).select(0, &mut rng);
    }
}
