//! Low Frequency Oscillators for delay modulation.

/*
Low Frequency Oscillators
=========================

The effects engine carries two free-running sine LFOs. They never reach the
audio path directly: their only job is to nudge the read offset of an
interpolated delay tap by a few samples.

Vocabulary
----------

  phase           Position inside one cycle, kept in [0, 1).
                  Advanced once per sample by `increment`.

  increment       Frequency expressed as a fraction of the sample rate.
                  0.5 Hz at 48 kHz = 0.5 / 48000 ≈ 1.04e-5 per sample.

  depth           How far (in samples) a modulated tap swings around its
                  base offset. Chosen by the topology, not by the LFO.


Why modulate delay taps?
------------------------

A delay network with static lengths has fixed resonances. In a long reverb
tail they ring as a faint metallic pitch. Moving a tap by a handful of
samples over several seconds smears those resonances:

    slow (0.1 - 1 Hz), shallow (10 - 100 samples)   lush, chorus-like tail
    faster or deeper                                audible pitch wobble

The two LFOs run at different rates so their sweeps never line up.


Update order
------------

For every sample the engine takes each LFO's value at the current phase and
only then advances the phase:

    value = sin(2π · phase)
    phase = phase + increment
    phase = phase - floor(phase)

so a freshly reset LFO starts at sin(0) = 0.
*/

use std::f32::consts::TAU;

/// Selects one of the engine's two LFOs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoIndex {
    One,
    Two,
}

impl LfoIndex {
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            LfoIndex::One => 0,
            LfoIndex::Two => 1,
        }
    }
}

/// Free-running sine LFO with a phase in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lfo {
    phase: f32,
    increment: f32,
}

impl Lfo {
    pub fn new(frequency_hz: f32, sample_rate: f32) -> Self {
        Self::with_increment(frequency_hz / sample_rate)
    }

    /// Build from a per-sample phase increment (cycles per sample).
    pub fn with_increment(increment: f32) -> Self {
        Self {
            phase: 0.0,
            increment,
        }
    }

    pub fn set_frequency(&mut self, frequency_hz: f32, sample_rate: f32) {
        self.increment = frequency_hz / sample_rate;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }

    /// Bipolar output at the current phase.
    #[inline]
    pub fn value(&self) -> f32 {
        (TAU * self.phase).sin()
    }

    /// Return the current value, then advance by one sample.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let value = self.value();
        self.phase += self.increment;
        self.phase -= self.phase.floor();
        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
