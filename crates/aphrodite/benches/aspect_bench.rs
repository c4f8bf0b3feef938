use aphrodite::aspects::{AspectCalculator, AspectTable};
use aphrodite::ephemeris::{BodyPosition, CelestialBody, PositionSet};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn spread_positions(offset: f64) -> PositionSet {
    CelestialBody::ALL
        .iter()
        .enumerate()
        .map(|(i, &body)| {
            let lon = offset + (i as f64) * 27.5;
            (body, BodyPosition::moving(body, lon, 1.0 - i as f64 * 0.1))
        })
        .collect()
}

fn bench_calculate_aspect(c: &mut Criterion) {
    let table = AspectTable::classical();
    let calculator = AspectCalculator::new(&table);
    let sun = BodyPosition::moving(CelestialBody::Sun, 100.0, 1.0);
    let moon = BodyPosition::moving(CelestialBody::Moon, 102.0, 13.0);

    c.bench_function("calculate_aspect", |b| {
        b.iter(|| calculator.calculate_aspect(black_box(&sun), black_box(&moon)))
    });
}

fn bench_compute_intra(c: &mut Criterion) {
    let table = AspectTable::classical();
    let calculator = AspectCalculator::new(&table);
    let positions = spread_positions(0.0);

    c.bench_function("compute_intra", |b| {
        b.iter(|| calculator.compute_intra(black_box(&positions)))
    });
}

fn bench_compute_cross(c: &mut Criterion) {
    let table = AspectTable::classical();
    let calculator = AspectCalculator::new(&table);
    let first = spread_positions(0.0);
    let second = spread_positions(13.0);

    c.bench_function("compute_cross", |b| {
        b.iter(|| calculator.compute_cross(black_box(&first), black_box(&second)))
    });
}

criterion_group!(benches, bench_calculate_aspect, bench_compute_intra, bench_compute_cross);
criterion_main!(benches);
