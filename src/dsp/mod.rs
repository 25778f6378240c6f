//! Delay-network effects core.
//!
//! Everything here is allocation-free and realtime-safe. An effect borrows
//! one caller-owned sample buffer, lays its delay lines out inside it, and
//! describes its signal flow as a short sequence of accumulator statements
//! run once per sample.

/// Context statements: the per-sample accumulator language.
pub mod context;
/// Line layout and the borrowed sample arena.
pub mod delay;
/// Cursor, LFOs and arena of one running effect.
pub mod engine;
/// Sine LFOs for delay-tap modulation.
pub mod lfo;
/// Stereo plate reverb built on the engine.
pub mod reverb;

pub use engine::FxEngine;
pub use reverb::{Reverb, ReverbConfig, ReverbParams};
