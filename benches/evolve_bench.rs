//! Criterion benchmarks for u-evolve.
//!
//! Uses the inversion count on permutations to measure engine overhead,
//! plus micro-benchmarks of the permutation operators.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_evolve::engine::{Engine, EngineConfig, EvolveOptions};
use u_evolve::fitness::inversions;
use u_evolve::genome::operators::{agreement_crossover, swap_mutation};
use u_evolve::genome::PermutationGenome;
use u_evolve::random::create_rng;

type Perm = PermutationGenome<u32, f64>;

fn inversion_fitness(g: &Perm) -> f64 {
    inversions(g.genes()) as f64
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_engine_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_inversions");
    group.sample_size(10);

    for (len, pop) in [(10u32, 100usize), (30, 500), (60, 1000)] {
        let config = EngineConfig::default()
            .with_population_size(pop)
            .with_verbose(false)
            .with_seed(42);
        let options: EvolveOptions<f64> = EvolveOptions::default().with_max_iterations(2_000);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}", len, pop), len),
            &(config, options),
            |b, (config, options)| {
                b.iter(|| {
                    let template: Perm = PermutationGenome::new((0..len).collect());
                    let mut engine =
                        Engine::new(template, inversion_fitness, config.clone()).unwrap();
                    black_box(engine.evolve(black_box(options)).unwrap())
                })
            },
        );
    }
    group.finish();
}

fn bench_agreement_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("agreement_crossover");

    for &n in &[10usize, 100, 1000] {
        let mut rng = create_rng(7);
        let p1: Vec<usize> = (0..n).collect();
        let mut p2 = p1.clone();
        for _ in 0..n / 4 {
            swap_mutation(&mut p2, &mut rng);
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &(p1, p2), |b, (p1, p2)| {
            b.iter(|| black_box(agreement_crossover(black_box(p1), black_box(p2), &mut rng)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_engine_steps, bench_agreement_crossover);
criterion_main!(benches);
