use chrono::{DateTime, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use sunside_lib::{analyze_exposure, densify, sun_position, Coordinate, SegmenterConfig};

static START: Lazy<DateTime<Utc>> = Lazy::new(|| {
    Utc.with_ymd_and_hms(2024, 6, 21, 6, 0, 0)
        .single()
        .expect("valid timestamp")
});
static LONDON_EDINBURGH: Lazy<Vec<Coordinate>> = Lazy::new(|| {
    densify(
        &Coordinate::new(51.5074, -0.1278),
        &Coordinate::new(55.9533, -3.1883),
        0.5,
    )
    .expect("densify")
});

fn benchmark_segmenter(c: &mut Criterion) {
    let config = SegmenterConfig::default();

    c.bench_function("sun_position_single", |b| {
        let at = Coordinate::new(51.5, -0.09);
        b.iter(|| black_box(sun_position(&START, &at)));
    });

    c.bench_function("analyze_london_edinburgh", |b| {
        let points = &*LONDON_EDINBURGH;
        b.iter(|| {
            let report = analyze_exposure(points, *START, &config).expect("report");
            black_box(report.tally.percentages())
        });
    });
}

criterion_group!(benches, benchmark_segmenter);
criterion_main!(benches);
