//! Per-sample signal-flow context.
//!
//! A [`Context`] is the accumulator machine a topology is written in. The
//! engine hands out one per sample; each statement reads from or writes to a
//! delay line and leaves its result in the single accumulator register:
//!
//! ```text
//! c.add(input, gain);         // acc += input * gain
//! c.all_pass(ap1, kap);       // diffuse through ap1
//! c.low_pass(&mut lp, klp);   // damp
//! c.write(del1, 2.0);         // del1 <- acc, acc *= 2
//! ```
//!
//! Statements run strictly in order. Lines are read at a delay of one or more
//! samples, so reading a line after it was written earlier in the same sample
//! still returns older material.

use crate::dsp::delay::{DelayArena, Line};
use crate::dsp::lfo::LfoIndex;

pub struct Context<'c, 'a> {
    arena: &'c mut DelayArena<'a>,
    cursor: u64,
    lfo: [f32; 2],
    accumulator: f32,
}

impl<'c, 'a> Context<'c, 'a> {
    pub(crate) fn new(arena: &'c mut DelayArena<'a>, cursor: u64, lfo: [f32; 2]) -> Self {
        Self {
            arena,
            cursor,
            lfo,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// LFO value for this sample.
    #[inline]
    pub fn lfo(&self, index: LfoIndex) -> f32 {
        self.lfo[index.slot()]
    }

    #[inline]
    pub fn load(&mut self, value: f32) {
        self.accumulator = value;
    }

    #[inline]
    pub fn add(&mut self, value: f32, gain: f32) {
        self.accumulator += value * gain;
    }

    /// Add the line's tail.
    #[inline]
    pub fn read(&mut self, line: Line, scale: f32) {
        self.accumulator += self.arena.read_tail(line, self.cursor) * scale;
    }

    #[inline]
    pub fn read_at(&mut self, line: Line, delay: usize, scale: f32) {
        self.accumulator += self.arena.read(line, self.cursor, delay) * scale;
    }

    /// Commit the accumulator to the line's head, then scale it.
    ///
    /// `scale = 0.0` clears the register for the next stage.
    #[inline]
    pub fn write(&mut self, line: Line, scale: f32) {
        self.write_at(line, 0, scale);
    }

    /// Commit the accumulator `offset` samples behind the head.
    #[inline]
    pub fn write_at(&mut self, line: Line, offset: usize, scale: f32) {
        self.arena.write(line, self.cursor, offset, self.accumulator);
        self.accumulator *= scale;
    }

    /// First-order all-pass against `line`, with the accumulator as input.
    ///
    /// ```text
    /// out  = -g * in + tail
    /// head =  in + g * out
    /// ```
    #[inline]
    pub fn all_pass(&mut self, line: Line, coefficient: f32) {
        let input = self.accumulator;
        let tail = self.arena.read_tail(line, self.cursor);
        let output = tail - coefficient * input;
        self.arena.write(line, self.cursor, 0, input + coefficient * output);
        self.accumulator = output;
    }

    /// One-pole low-pass; `cutoff = 1.0` passes the signal untouched.
    #[inline]
    pub fn low_pass(&mut self, state: &mut f32, cutoff: f32) {
        *state += cutoff * (self.accumulator - *state);
        self.accumulator = *state;
    }

    /// One-pole high-pass, the complement of [`Context::low_pass`].
    #[inline]
    pub fn high_pass(&mut self, state: &mut f32, cutoff: f32) {
        *state += cutoff * (self.accumulator - *state);
        self.accumulator -= *state;
    }

    /// Add a fractional-delay tap.
    #[inline]
    pub fn interpolate(&mut self, line: Line, offset: f32, scale: f32) {
        let value = self.arena.read_interpolated(line, self.cursor, offset);
        self.accumulator += value * scale;
    }

    /// Add a fractional-delay tap whose offset swings by `depth` samples
    /// with the given LFO.
    #[inline]
    pub fn interpolate_lfo(
        &mut self,
        line: Line,
        offset: f32,
        lfo: LfoIndex,
        depth: f32,
        scale: f32,
    ) {
        let offset = offset + depth * self.lfo[lfo.slot()];
        self.interpolate(line, offset, scale);
    }
}
