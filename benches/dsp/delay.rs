//! Benchmarks for delay arena operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::delay::{DelayLayout, LineSpec};
use saavy_fx::dsp::engine::FxEngine;

use crate::BLOCK_SIZES;

const LAYOUT: DelayLayout<3> = DelayLayout::new([
    LineSpec::new("10ms", 480),
    LineSpec::new("100ms", 4800),
    LineSpec::new("1s", 48_000),
]);

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    let mut memory = vec![0.0f32; LAYOUT.total()];
    let mut engine = FxEngine::new(&mut memory, LAYOUT).unwrap();

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for index in 0..LAYOUT.line_count() {
            let line = engine.line(index).unwrap();
            let name = LAYOUT.spec(index).unwrap().name;

            // Tail read then head write, the pattern every all-pass uses
            group.bench_with_input(
                BenchmarkId::new(format!("tail_{}", name), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &sample in &input {
                            let mut c = engine.start();
                            c.read(black_box(line), 1.0);
                            sum += c.accumulator();
                            c.load(black_box(sample));
                            c.write(line, 0.0);
                        }
                        sum
                    })
                },
            );
        }

        // Interpolated read (modulated tap, chorus-like)
        let line = engine.line(1).unwrap();
        group.bench_with_input(BenchmarkId::new("read_interpolated", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    let offset = 480.0 + (i as f32 * 0.1).sin() * 48.0;
                    let mut c = engine.start();
                    c.interpolate(line, black_box(offset), 1.0);
                    sum += c.accumulator();
                }
                sum
            })
        });
    }

    group.finish();
}
