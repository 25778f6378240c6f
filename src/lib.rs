pub mod dsp; // Delay arena, accumulator context, reverb topology
pub mod error;
pub mod io; // Bus frames and format conversions
pub mod synth; // Voice contract and realtime control

pub use error::{FxError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Sample rate the reverb's delay lengths and LFO rates were tuned at.
pub const SAMPLE_RATE: f32 = 48_000.0;
/// Length of the shared delay memory the reverb is laid out in.
pub const FX_ARENA_SIZE: usize = 16_384;
