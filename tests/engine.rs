//! End-to-end tests for the steady-state engine

use rand::Rng;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use u_evolve::engine::{
    CancelToken, Engine, EngineConfig, EvolveOptions, FitnessFunction, Termination,
    TracingObserver,
};
use u_evolve::fitness::inversions;
use u_evolve::fitness::sudoku::SudokuPuzzle;
use u_evolve::genome::{Genome, OperatorTable, PermutationGenome};
use u_evolve::{EvolveError, EvolveResult};

type Perm = PermutationGenome<u16, f64>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sorted_template(n: u16) -> Perm {
    PermutationGenome::new((0..n).collect())
}

fn inversion_fitness(g: &Perm) -> f64 {
    inversions(g.genes()) as f64
}

fn config(population: usize, seed: u64) -> EngineConfig {
    EngineConfig::default()
        .with_population_size(population)
        .with_seed(seed)
}

// ---- A non-permutation representation ----

#[derive(Debug, Clone, Copy)]
enum BitOp {
    Flip,
    Uniform,
}

#[derive(Debug, Clone)]
struct Bits {
    bits: Vec<bool>,
    fitness: Option<u32>,
    table: OperatorTable<BitOp>,
}

impl Genome for Bits {
    type Fitness = u32;
    type Operator = BitOp;

    fn fitness(&self) -> Option<u32> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: u32) {
        self.fitness = Some(fitness);
    }

    fn fresh<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Bits {
            bits: (0..self.bits.len()).map(|_| rng.random_bool(0.5)).collect(),
            fitness: None,
            table: self.table.clone(),
        }
    }

    fn copy(&self) -> Self {
        Bits {
            bits: self.bits.clone(),
            fitness: None,
            table: self.table.clone(),
        }
    }

    fn operators(&self) -> &OperatorTable<BitOp> {
        &self.table
    }

    fn apply<R: Rng + ?Sized>(&self, op: BitOp, partner: &Self, rng: &mut R) -> Self {
        let mut child = self.copy();
        match op {
            BitOp::Flip => {
                let i = rng.random_range(0..child.bits.len());
                child.bits[i] = !child.bits[i];
            }
            BitOp::Uniform => {
                for (bit, other) in child.bits.iter_mut().zip(&partner.bits) {
                    if rng.random_bool(0.5) {
                        *bit = *other;
                    }
                }
            }
        }
        child
    }
}

fn zeros(bits: &Bits) -> u32 {
    bits.bits.iter().filter(|&&b| !b).count() as u32
}

fn bits_template(n: usize, table: OperatorTable<BitOp>) -> Bits {
    Bits {
        bits: vec![false; n],
        fitness: None,
        table,
    }
}

#[test]
fn onemax_with_custom_genome() {
    init_tracing();
    let table = OperatorTable::new(vec![(BitOp::Flip, 3), (BitOp::Uniform, 1)]);
    let mut engine = Engine::new(bits_template(24, table), zeros, config(100, 7)).unwrap();

    let options = EvolveOptions::default()
        .with_seconds(5.0)
        .with_target_fitness(0);
    let outcome = engine.evolve(&options).unwrap();

    assert_eq!(outcome.termination, Termination::TargetReached);
    assert_eq!(outcome.best_fitness, 0);
    assert!(outcome.best.bits.iter().all(|&b| b));
}

#[test]
fn empty_operator_table_fails_fast() {
    let result = Engine::new(bits_template(8, OperatorTable::new(Vec::new())), zeros, config(10, 1));
    assert!(matches!(result, Err(EvolveError::InvalidConfiguration(_))));
}

// ---- Permutation problems ----

#[test]
fn inversions_reach_zero_within_budget() {
    init_tracing();
    let mut engine = Engine::new(sorted_template(8), inversion_fitness, config(300, 42))
        .unwrap()
        .with_observer(TracingObserver);

    let start = Instant::now();
    let options = EvolveOptions::default()
        .with_seconds(5.0)
        .with_target_fitness(0.0);
    let outcome = engine.evolve(&options).unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(outcome.termination, Termination::TargetReached);
    assert_eq!(outcome.best_fitness, 0.0);
    assert_eq!(outcome.best.genes(), (0..8).collect::<Vec<u16>>().as_slice());
}

#[test]
fn unbounded_time_stops_at_target() {
    let mut engine = Engine::new(sorted_template(5), inversion_fitness, config(50, 3)).unwrap();

    let options = EvolveOptions::default().with_target_fitness(0.0);
    assert!(options.time_limit.is_none());
    let outcome = engine.evolve(&options).unwrap();

    assert_eq!(outcome.termination, Termination::TargetReached);
    assert_eq!(outcome.best_fitness, 0.0);

    // already at target: a second call returns immediately
    let again = engine.evolve(&options).unwrap();
    assert_eq!(again.iterations, 0);
    assert_eq!(again.termination, Termination::TargetReached);
}

#[test]
fn reachable_loose_target() {
    let mut engine = Engine::new(sorted_template(12), inversion_fitness, config(100, 5)).unwrap();
    let options = EvolveOptions::default().with_target_fitness(10.0);
    let outcome = engine.evolve(&options).unwrap();
    assert!(outcome.best_fitness <= 10.0);
}

#[test]
fn stagnation_restart_with_unsolvable_target() {
    let population = 50;
    let mut engine = Engine::new(
        sorted_template(4),
        inversion_fitness,
        config(population, 9).with_verbose(false),
    )
    .unwrap();

    let options = EvolveOptions::default()
        .with_target_fitness(-1.0)
        .with_max_iterations(20 * population as u64 + 1);
    let outcome = engine.evolve(&options).unwrap();

    assert_eq!(outcome.termination, Termination::IterationLimit);
    assert!(engine.last_eden() > 0, "no restart within 20 * population iterations");
    assert!(outcome.restarts >= 1);
    assert!(outcome.best_fitness <= outcome.epoch_best_fitness);
}

#[test]
fn cancellation_returns_best_so_far() {
    let mut engine = Engine::new(sorted_template(60), inversion_fitness, config(100, 11)).unwrap();
    let initial_best = engine.best_fitness();

    let token = CancelToken::new();
    let remote = token.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        remote.cancel();
    });

    let options = EvolveOptions::default()
        .with_seconds(10.0)
        .with_target_fitness(-1.0);
    let outcome = engine.evolve_with_cancel(&options, token).unwrap();
    canceller.join().unwrap();

    assert_eq!(outcome.termination, Termination::Cancelled);
    assert!(outcome.elapsed < Duration::from_secs(10));
    assert!(outcome.best_fitness <= initial_best);
    assert!(engine.cancel_token().is_none());
}

// ---- Failing fitness functions ----

struct Flaky {
    calls: usize,
    fail_at: usize,
}

impl FitnessFunction<Perm> for Flaky {
    fn evaluate(&mut self, genome: &Perm) -> EvolveResult<f64> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Err(EvolveError::fitness(std::io::Error::other("scorer crashed")));
        }
        Ok(inversion_fitness(genome))
    }
}

#[test]
fn fitness_error_propagates_from_evolve() {
    let mut engine = Engine::new(
        sorted_template(10),
        Flaky {
            calls: 0,
            fail_at: 60,
        },
        config(20, 4),
    )
    .unwrap();

    let err = engine.evolve(&EvolveOptions::default()).unwrap_err();
    assert!(matches!(err, EvolveError::Fitness(_)));
    assert_eq!(err.to_string(), "fitness function failed: scorer crashed");
    // 20 initial scores, 39 successful replacements
    assert_eq!(engine.iteration(), 39);

    // the engine can resume afterwards
    let outcome = engine
        .evolve(&EvolveOptions::default().with_max_iterations(10))
        .unwrap();
    assert_eq!(outcome.total_iterations, 49);
}

// ---- Sudoku ----

#[test]
fn sudoku_fitness_improves() {
    init_tracing();
    let puzzle = SudokuPuzzle::example();
    let mut engine = Engine::new(
        SudokuPuzzle::seed_genome(),
        puzzle.fitness(),
        config(200, 13).with_verbose(false),
    )
    .unwrap();
    let initial = engine.best_fitness();

    let outcome = engine
        .evolve(
            &EvolveOptions::default()
                .with_max_iterations(5_000)
                .with_target_fitness(0),
        )
        .unwrap();

    assert!(outcome.best_fitness <= initial);
    let mut genes = outcome.best.genes().to_vec();
    genes.sort_unstable();
    assert_eq!(genes, SudokuPuzzle::seed_genes());
}
