//! Benchmarks for reverb processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::reverb::{Reverb, ReverbParams};
use saavy_fx::io::Frame;
use saavy_fx::FX_ARENA_SIZE;

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    let settings = [
        // Short, bright room
        (
            "small_room",
            ReverbParams {
                amount: 0.3,
                reverb_time: 0.3,
                lp: 0.9,
                ..ReverbParams::default()
            },
        ),
        // Long tail, heavy diffusion
        (
            "large_hall",
            ReverbParams {
                amount: 0.6,
                diffusion: 0.75,
                reverb_time: 0.95,
                lp: 0.6,
                ..ReverbParams::default()
            },
        ),
    ];

    let mut memory = vec![0.0f32; FX_ARENA_SIZE];

    for &size in BLOCK_SIZES {
        // Generate a test signal (impulse-like with some content)
        let input: Vec<Frame> = (0..size)
            .map(|i| {
                let s = if i < 10 {
                    1.0 - (i as f32 / 10.0) // Initial impulse
                } else {
                    (i as f32 * 0.05).sin() * 0.1 // Quiet tail
                };
                Frame::new(s, -s)
            })
            .collect();

        for (name, params) in &settings {
            let mut reverb = Reverb::new(&mut memory).unwrap();
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    reverb.process(black_box(&mut buffer), params);
                })
            });
        }

        // Planar path used for voice out/aux pairs
        let mut reverb = Reverb::new(&mut memory).unwrap();
        let left: Vec<f32> = input.iter().map(|f| f.left).collect();
        let mut out = left.clone();
        let mut aux = left.clone();
        let params = ReverbParams::default();
        group.bench_with_input(BenchmarkId::new("planar", size), &size, |b, _| {
            b.iter(|| {
                out.copy_from_slice(&left);
                aux.copy_from_slice(&left);
                reverb.process_planar(black_box(&mut out), black_box(&mut aux), &params);
            })
        });
    }

    group.finish();
}
