use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use intersection_sim::{Intersection, SimulationConfig};
use std::time::Duration;

// Warm the intersection up so lanes carry realistic queues before timing.
fn warmed_intersection(arrival_rate: f64) -> Intersection {
    let config = SimulationConfig::default().with_arrival_rate(arrival_rate);
    let mut intersection = Intersection::seeded(config, 42).unwrap();
    intersection.run(3_000);
    intersection
}

fn bench_intersection_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersection_tick");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    // Vehicles per minute at each approach
    for &rate in [5.0, 10.0, 20.0].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(rate), &rate, |b, &rate| {
            let mut intersection = warmed_intersection(rate);
            b.iter(|| {
                intersection.tick();
                black_box(intersection.queued());
            });
        });
    }
    group.finish();
}

fn bench_one_hour_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_hour_run");
    group.sample_size(10);
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &rate in [5.0, 10.0, 20.0].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(rate), &rate, |b, &rate| {
            b.iter(|| {
                let config = SimulationConfig::default().with_arrival_rate(rate);
                let mut intersection = Intersection::seeded(config, 7).unwrap();
                intersection.run(36_000);
                black_box(intersection.completed().len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intersection_tick, bench_one_hour_run);
criterion_main!(benches);
