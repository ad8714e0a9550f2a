use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stochopt::{
    energy::UniformPerturbation,
    qubo::{solve_qubo_pt, QuboMatrix},
    rng::RandomNumberGenerator,
    tempering::{parallel_tempering, PtConfig, Spacing},
};

fn rastrigin(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|v| v * v - 10.0 * (2.0 * std::f64::consts::PI * v).cos())
            .sum::<f64>()
}

fn bench_local_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("tempering_local_phase");
    let perturb = UniformPerturbation::new(0.5).unwrap();
    let initial = vec![3.0; 16];

    // Compare sequential and rayon local phases for growing ladders
    for replicas in [4usize, 8, 16].iter() {
        let sequential = PtConfig::builder()
            .n_replicas(*replicas)
            .t_min(0.1)
            .t_max(100.0)
            .sweeps_per_swap(100)
            .total_swaps(50)
            .seed(42)
            .build();
        let mut parallel = sequential.clone();
        parallel.set_parallel(true);

        group.bench_with_input(
            BenchmarkId::new("sequential", replicas),
            &sequential,
            |b, config| {
                b.iter(|| {
                    parallel_tempering(black_box(&initial), rastrigin, perturb, black_box(config))
                        .unwrap()
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", replicas),
            &parallel,
            |b, config| {
                b.iter(|| {
                    parallel_tempering(black_box(&initial), rastrigin, perturb, black_box(config))
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_qubo(c: &mut Criterion) {
    let mut group = c.benchmark_group("qubo_pt");
    let config = PtConfig::new(8, 0.05, 20.0, Spacing::Adaptive, 20, 100, 3);

    for n in [16usize, 64, 128].iter() {
        let mut rng = RandomNumberGenerator::from_seed(*n as u64);
        let mut q = QuboMatrix::new(*n);
        for i in 0..*n {
            for j in i..*n {
                q.set(i, j, rng.uniform(-1.0, 1.0));
            }
        }

        group.bench_with_input(BenchmarkId::new("variables", n), &q, |b, q| {
            b.iter(|| solve_qubo_pt(black_box(q), black_box(&config)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_local_phase, bench_qubo);
criterion_main!(benches);
