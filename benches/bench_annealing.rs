use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stochopt::{
    annealing::{simulated_annealing, CoolingSchedule, SaConfig},
    energy::UniformPerturbation,
    qubo::{build_scheduling_qubo, solve_qubo_sa, Event, Room},
};

fn rastrigin(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|v| v * v - 10.0 * (2.0 * std::f64::consts::PI * v).cos())
            .sum::<f64>()
}

fn bench_schedules(c: &mut Criterion) {
    let mut group = c.benchmark_group("annealing_schedules");
    let perturb = UniformPerturbation::new(0.5).unwrap();
    let initial = vec![3.0; 8];

    for cooling in [
        CoolingSchedule::Geometric,
        CoolingSchedule::LamDelosme,
        CoolingSchedule::Huang,
    ] {
        let config = SaConfig::builder()
            .initial_temp(100.0)
            .cooling(cooling)
            .alpha(0.999)
            .max_iterations(10_000)
            .seed(42)
            .build();
        group.bench_function(format!("{:?}", cooling), |b| {
            b.iter(|| {
                simulated_annealing(black_box(&initial), black_box(&config), rastrigin, perturb)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_scheduling_qubo(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduling_qubo_sa");
    let config = SaConfig::builder()
        .initial_temp(50.0)
        .alpha(0.995)
        .max_iterations(20_000)
        .seed(7)
        .build();

    for events in [4usize, 8, 12].iter() {
        let event_list: Vec<Event> = (0..*events)
            .map(|i| Event::new(10 + 5 * i as u32).with_preference(i % 3, i % 4, 1.0))
            .collect();
        let rooms = vec![Room::new(20), Room::new(40), Room::new(80)];
        let q = build_scheduling_qubo(&event_list, &rooms, 4, 10.0).unwrap();

        group.bench_with_input(BenchmarkId::new("events", events), &q, |b, q| {
            b.iter(|| solve_qubo_sa(black_box(q), black_box(&config)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_schedules, bench_scheduling_qubo);
criterion_main!(benches);
