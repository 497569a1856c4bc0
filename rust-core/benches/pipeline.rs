//! Criterion benchmark for the hot per-capture conversion path

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iqscope::{CalibrationConstants, Capture, SpectrumProcessor};

fn tone_capture(len: usize) -> Capture {
    use std::f64::consts::PI;
    let w = 2.0 * PI * 37.0 / len as f64;
    Capture::new(
        (0..len).map(|n| (w * n as f64).cos()).collect(),
        (0..len).map(|n| (w * n as f64).sin()).collect(),
    )
}

fn bench_process(c: &mut Criterion) {
    let capture = tone_capture(1024);
    let mut processor = SpectrumProcessor::new(CalibrationConstants::default());

    c.bench_function("process_1024", |b| {
        b.iter(|| {
            processor
                .process(black_box(&capture), -10.0, 2_450_000_000.0)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_process);
criterion_main!(benches);
