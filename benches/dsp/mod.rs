//! Benchmarks for the delay-network primitives.

mod context;
mod delay;
mod reverb;

pub use context::bench_context;
pub use delay::bench_delay;
pub use reverb::bench_reverb;
