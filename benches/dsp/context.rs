//! Benchmarks for individual context statements.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::delay::{DelayLayout, LineSpec};
use saavy_fx::dsp::engine::FxEngine;
use saavy_fx::dsp::lfo::LfoIndex;

use crate::BLOCK_SIZES;

const LAYOUT: DelayLayout<4> = DelayLayout::new([
    LineSpec::new("ap1", 113),
    LineSpec::new("ap2", 162),
    LineSpec::new("ap3", 241),
    LineSpec::new("ap4", 399),
]);

pub fn bench_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/context");

    let mut memory = vec![0.0f32; LAYOUT.total()];
    let mut engine = FxEngine::new(&mut memory, LAYOUT).unwrap();
    engine.set_lfo_frequency(LfoIndex::One, 0.5, 48_000.0);
    let lines: Vec<_> = (0..4).map(|i| engine.line(i).unwrap()).collect();

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();

        // Four series all-passes (input diffuser)
        group.bench_with_input(BenchmarkId::new("all_pass_x4", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    let mut c = engine.start();
                    c.load(black_box(sample));
                    for &line in &lines {
                        c.all_pass(line, 0.625);
                    }
                    sum += c.accumulator();
                }
                sum
            })
        });

        // LFO-modulated tap with damping
        let mut lp = 0.0f32;
        group.bench_with_input(
            BenchmarkId::new("interpolate_lfo_low_pass", size),
            &size,
            |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        let mut c = engine.start();
                        c.load(black_box(sample));
                        c.interpolate_lfo(lines[3], 300.0, LfoIndex::One, 60.0, 0.5);
                        c.low_pass(&mut lp, 0.7);
                        c.write(lines[3], 0.0);
                        sum += c.accumulator();
                    }
                    sum
                })
            },
        );
    }

    group.finish();
}
