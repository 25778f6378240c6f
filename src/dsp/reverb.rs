//! Reverb - Griesinger/Dattorro Delay Network
//!
//! A stereo plate-style reverb written in the accumulator language of
//! [`Context`](crate::dsp::context::Context). Ten delay lines share one
//! arena; the whole topology is a fixed sequence of context statements run
//! once per sample.
//!
//! # Topology
//!
//! ```text
//!            ┌─────────── smear (LFO 1) ───────────┐
//!            ▼                                      │
//! L+R ──→ [AP1] → [AP2] → [AP3] → [AP4] ──┬─────────┘
//!                                         │ apout
//!         ┌───────────────────────────────┴───────────────────┐
//!         ▼                                                   ▼
//!  (+) ← del2 (LFO 2) · rt                             (+) ← del1 · rt
//!   │                                                   │
//!  [LP] → [DAP1a] → [DAP1b] → del1 ──→ wet L           [LP] → [DAP2a] → [DAP2b] → del2 ──→ wet R
//! ```
//!
//! Four series all-passes decorrelate the input before it reaches the loops,
//! which keeps the tail free of flutter echoes. The two loops feed each
//! other through their long delays, so one round trip passes both damping
//! filters and the `reverb_time` gain twice.
//!
//! ## Modulation
//!
//! - LFO 1 moves a tap inside AP1 that is copied back further down the same
//!   line ("smear"), so the first diffuser's delay drifts by up to 60
//!   samples.
//! - LFO 2 moves loop A's read of `del2` by ±100 samples for a slow chorus on
//!   the tail.
//!
//! # Parameters
//!
//! - **amount**: crossfade from dry (0) to wet (1)
//! - **diffusion**: all-pass coefficient magnitude
//! - **input_gain**: level of the mono sum entering the diffusers
//! - **reverb_time**: gain around each loop (decay length)
//! - **lp**: damping filter coefficient; 1 leaves the loop undamped

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::delay::{DelayLayout, Line, LineSpec};
use crate::dsp::engine::FxEngine;
use crate::dsp::lfo::LfoIndex;
use crate::error::Result;
use crate::io::{BusSample, Frame};
use crate::SAMPLE_RATE;

const AP1: usize = 0;
const AP2: usize = 1;
const AP3: usize = 2;
const AP4: usize = 3;
const DAP1A: usize = 4;
const DAP1B: usize = 5;
const DEL1: usize = 6;
const DAP2A: usize = 7;
const DAP2B: usize = 8;
const DEL2: usize = 9;

/// Line lengths in samples at 48 kHz.
pub const REVERB_LAYOUT: DelayLayout<10> = DelayLayout::new([
    LineSpec::new("ap1", 113),
    LineSpec::new("ap2", 162),
    LineSpec::new("ap3", 241),
    LineSpec::new("ap4", 399),
    LineSpec::new("dap1a", 1653),
    LineSpec::new("dap1b", 2038),
    LineSpec::new("del1", 3411),
    LineSpec::new("dap2a", 1913),
    LineSpec::new("dap2b", 1663),
    LineSpec::new("del2", 4782),
]);

/// Gain applied to a loop's output after it is written to its long delay.
pub const LOOP_WRITE_GAIN: f32 = 2.0;

/// AP1 smear: modulated read position, swing, and where the tap is put back.
const SMEAR_READ_OFFSET: f32 = 10.0;
const SMEAR_DEPTH: f32 = 60.0;
const SMEAR_WRITE_OFFSET: usize = 100;

/// Loop A's modulated read of `del2`.
const SHIMMER_READ_OFFSET: f32 = 4680.0;
const SHIMMER_DEPTH: f32 = 100.0;

pub const MAX_DIFFUSION: f32 = 0.99;
pub const MAX_REVERB_TIME: f32 = 0.99;

/// Control inputs, read once per block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Dry/wet crossfade (0.0 = dry, 1.0 = wet)
    pub amount: f32,
    /// All-pass coefficient (0.0 = plain delays)
    pub diffusion: f32,
    /// Input level into the diffusers
    pub input_gain: f32,
    /// Loop gain (0.0 = no recirculation)
    pub reverb_time: f32,
    /// Damping coefficient (1.0 = no damping)
    pub lp: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            amount: 0.5,
            diffusion: 0.625,
            input_gain: 0.2,
            reverb_time: 0.5,
            lp: 0.7,
        }
    }
}

impl ReverbParams {
    /// Pull every field into its stable range. NaN becomes the lower bound.
    pub fn clamped(&self) -> Self {
        Self {
            amount: clamp(self.amount, 0.0, 1.0),
            diffusion: clamp(self.diffusion, 0.0, MAX_DIFFUSION),
            input_gain: clamp(self.input_gain, 0.0, 1.0),
            reverb_time: clamp(self.reverb_time, 0.0, MAX_REVERB_TIME),
            lp: clamp(self.lp, 0.0, 1.0),
        }
    }
}

#[inline]
fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Settings fixed for the lifetime of a reverb instance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbConfig {
    pub sample_rate: f32,
    /// Rate of the AP1 smear LFO in Hz
    pub smear_rate: f32,
    /// Rate of the loop-A shimmer LFO in Hz
    pub shimmer_rate: f32,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            smear_rate: 0.5,
            shimmer_rate: 0.3,
        }
    }
}

struct ReverbLines {
    ap1: Line,
    ap2: Line,
    ap3: Line,
    ap4: Line,
    dap1a: Line,
    dap1b: Line,
    del1: Line,
    dap2a: Line,
    dap2b: Line,
    del2: Line,
}

impl ReverbLines {
    fn resolve(engine: &FxEngine<'_, 10>) -> Result<Self> {
        Ok(Self {
            ap1: engine.line(AP1)?,
            ap2: engine.line(AP2)?,
            ap3: engine.line(AP3)?,
            ap4: engine.line(AP4)?,
            dap1a: engine.line(DAP1A)?,
            dap1b: engine.line(DAP1B)?,
            del1: engine.line(DEL1)?,
            dap2a: engine.line(DAP2A)?,
            dap2b: engine.line(DAP2B)?,
            del2: engine.line(DEL2)?,
        })
    }
}

/// Stereo reverb over a caller-owned arena of at least
/// [`REVERB_LAYOUT.total()`](DelayLayout::total) samples.
pub struct Reverb<'a> {
    engine: FxEngine<'a, 10>,
    lines: ReverbLines,
    lp_decay_1: f32,
    lp_decay_2: f32,
}

impl<'a> Reverb<'a> {
    pub fn new(memory: &'a mut [f32]) -> Result<Self> {
        Self::with_config(memory, ReverbConfig::default())
    }

    pub fn with_config(memory: &'a mut [f32], config: ReverbConfig) -> Result<Self> {
        let mut engine = FxEngine::new(memory, REVERB_LAYOUT)?;
        engine.set_lfo_frequency(LfoIndex::One, config.smear_rate, config.sample_rate);
        engine.set_lfo_frequency(LfoIndex::Two, config.shimmer_rate, config.sample_rate);
        let lines = ReverbLines::resolve(&engine)?;

        let mut reverb = Self {
            engine,
            lines,
            lp_decay_1: 0.0,
            lp_decay_2: 0.0,
        };
        reverb.reset();
        Ok(reverb)
    }

    /// Silence the tail and rewind the LFOs. The next block renders exactly
    /// like the first block of a new instance.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.lp_decay_1 = 0.0;
        self.lp_decay_2 = 0.0;
    }

    pub fn engine(&self) -> &FxEngine<'a, 10> {
        &self.engine
    }

    /// Damping filter states of loop A and loop B.
    pub fn filter_state(&self) -> (f32, f32) {
        (self.lp_decay_1, self.lp_decay_2)
    }

    /// Process interleaved stereo frames in place.
    pub fn process<S: BusSample>(&mut self, frames: &mut [Frame<S>], params: &ReverbParams) {
        let params = params.clamped();
        let mut lp_1 = self.lp_decay_1;
        let mut lp_2 = self.lp_decay_2;

        for frame in frames.iter_mut() {
            let (left, right) = self.tick(
                frame.left.to_f32(),
                frame.right.to_f32(),
                &params,
                &mut lp_1,
                &mut lp_2,
            );
            frame.left = S::from_f32(left);
            frame.right = S::from_f32(right);
        }

        self.lp_decay_1 = lp_1;
        self.lp_decay_2 = lp_2;
    }

    /// Process split channels in place, e.g. a voice's `out`/`aux` pair.
    /// Only the overlapping length of the two slices is touched.
    pub fn process_planar(&mut self, left: &mut [f32], right: &mut [f32], params: &ReverbParams) {
        let params = params.clamped();
        let mut lp_1 = self.lp_decay_1;
        let mut lp_2 = self.lp_decay_2;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (wet_l, wet_r) = self.tick(*l, *r, &params, &mut lp_1, &mut lp_2);
            *l = wet_l;
            *r = wet_r;
        }

        self.lp_decay_1 = lp_1;
        self.lp_decay_2 = lp_2;
    }

    #[inline]
    fn tick(
        &mut self,
        mut left: f32,
        mut right: f32,
        params: &ReverbParams,
        lp_1: &mut f32,
        lp_2: &mut f32,
    ) -> (f32, f32) {
        let kap = params.diffusion;
        let krt = params.reverb_time;
        let klp = params.lp;
        let amount = params.amount;
        let lines = &self.lines;

        let mut c = self.engine.start();

        // Smear AP1 inside the loop.
        c.interpolate_lfo(lines.ap1, SMEAR_READ_OFFSET, LfoIndex::One, SMEAR_DEPTH, 1.0);
        c.write_at(lines.ap1, SMEAR_WRITE_OFFSET, 0.0);

        c.add(left + right, params.input_gain);

        // Diffuse through 4 allpasses.
        c.all_pass(lines.ap1, kap);
        c.all_pass(lines.ap2, kap);
        c.all_pass(lines.ap3, kap);
        c.all_pass(lines.ap4, kap);
        let apout = c.accumulator();

        // Loop A
        c.load(apout);
        c.interpolate_lfo(lines.del2, SHIMMER_READ_OFFSET, LfoIndex::Two, SHIMMER_DEPTH, krt);
        c.low_pass(lp_1, klp);
        c.all_pass(lines.dap1a, -kap);
        c.all_pass(lines.dap1b, kap);
        c.write(lines.del1, LOOP_WRITE_GAIN);
        let wet = c.accumulator();
        left += (wet - left) * amount;

        // Loop B
        c.load(apout);
        c.read(lines.del1, krt);
        c.low_pass(lp_2, klp);
        c.all_pass(lines.dap2a, kap);
        c.all_pass(lines.dap2b, -kap);
        c.write(lines.del2, LOOP_WRITE_GAIN);
        let wet = c.accumulator();
        right += (wet - right) * amount;

        (left, right)
    }

    /// Release the arena so a different effect can use it.
    pub fn into_memory(self) -> &'a mut [f32] {
        self.engine.into_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::FX_ARENA_SIZE;

    fn impulse_response(params: &ReverbParams, samples: usize) -> Vec<Frame> {
        let mut memory = vec![0.0; FX_ARENA_SIZE];
        let mut reverb = Reverb::new(&mut memory).unwrap();
        let mut frames: Vec<Frame> = vec![Frame::default(); samples];
        frames[0] = Frame::new(1.0, 0.0);
        reverb.process(&mut frames, params);
        frames
    }

    #[test]
    fn test_layout_fits_arena() {
        assert_eq!(REVERB_LAYOUT.total(), 16_375);
        assert!(REVERB_LAYOUT.validate(FX_ARENA_SIZE).is_ok());
    }

    #[test]
    fn test_reverb_rejects_short_arena() {
        let mut memory = vec![0.0; 8192];
        assert!(matches!(
            Reverb::new(&mut memory),
            Err(FxError::ArenaTooSmall {
                required: 16_375,
                available: 8192
            })
        ));
    }

    #[test]
    fn test_clamping_policy() {
        let wild = ReverbParams {
            amount: 1.5,
            diffusion: 1.0,
            input_gain: -0.2,
            reverb_time: f32::NAN,
            lp: 7.0,
        };
        let clamped = wild.clamped();
        assert_eq!(clamped.amount, 1.0);
        assert_eq!(clamped.diffusion, MAX_DIFFUSION);
        assert_eq!(clamped.input_gain, 0.0);
        assert_eq!(clamped.reverb_time, 0.0);
        assert_eq!(clamped.lp, 1.0);

        let sane = ReverbParams::default();
        assert_eq!(sane.clamped(), sane);
    }

    #[test]
    fn test_reverb_adds_tail() {
        let params = ReverbParams {
            amount: 1.0,
            ..ReverbParams::default()
        };
        let frames = impulse_response(&params, 24_000);

        let tail_energy: f32 = frames[10_000..]
            .iter()
            .map(|f| f.left * f.left + f.right * f.right)
            .sum();
        assert!(tail_energy > 1e-6, "Reverb should produce a tail");
    }

    #[test]
    fn test_dry_reverb_preserves_signal() {
        let mut memory = vec![0.0; FX_ARENA_SIZE];
        let mut reverb = Reverb::new(&mut memory).unwrap();
        let params = ReverbParams {
            amount: 0.0,
            reverb_time: 0.95,
            ..ReverbParams::default()
        };

        let mut frames: Vec<Frame> = (0..512)
            .map(|i| Frame::new((i as f32 * 0.1).sin(), (i as f32 * 0.07).cos() * 0.5))
            .collect();
        let original = frames.clone();

        reverb.process(&mut frames, &params);
        assert_eq!(frames, original);
    }

    #[test]
    fn test_filter_state_persists_between_blocks() {
        let params = ReverbParams {
            amount: 1.0,
            lp: 0.3,
            ..ReverbParams::default()
        };

        let whole = impulse_response(&params, 6000);

        let mut memory = vec![0.0; FX_ARENA_SIZE];
        let mut reverb = Reverb::new(&mut memory).unwrap();
        let mut split: Vec<Frame> = vec![Frame::default(); 6000];
        split[0] = Frame::new(1.0, 0.0);
        for block in split.chunks_mut(64) {
            reverb.process(block, &params);
        }

        assert_eq!(whole, split);
        assert_ne!(reverb.filter_state(), (0.0, 0.0));
    }

    #[test]
    fn test_reverb_stability() {
        let mut memory = vec![0.0; FX_ARENA_SIZE];
        let mut reverb = Reverb::new(&mut memory).unwrap();
        // Out-of-range values are clamped to the stable maximum.
        let params = ReverbParams {
            amount: 1.0,
            diffusion: 2.0,
            input_gain: 1.0,
            reverb_time: 5.0,
            lp: 1.0,
        };

        let mut frames: Vec<Frame> = vec![Frame::new(0.1, -0.1); 256];
        for _ in 0..400 {
            frames.fill(Frame::new(0.1, 0.1));
            reverb.process(&mut frames, &params);
            for frame in &frames {
                assert!(frame.left.is_finite() && frame.right.is_finite());
                assert!(frame.left.abs() < 100.0, "Reverb output unstable: {:?}", frame);
            }
        }
    }

    #[test]
    fn test_custom_lfo_rates_change_modulated_output() {
        let params = ReverbParams {
            amount: 1.0,
            ..ReverbParams::default()
        };
        let default_ir = impulse_response(&params, 2000);

        let mut memory = vec![0.0; FX_ARENA_SIZE];
        let config = ReverbConfig {
            smear_rate: 40.0,
            ..ReverbConfig::default()
        };
        let mut reverb = Reverb::with_config(&mut memory, config).unwrap();
        let mut frames: Vec<Frame> = vec![Frame::default(); 2000];
        frames[0] = Frame::new(1.0, 0.0);
        reverb.process(&mut frames, &params);

        // The direct diffuser output is identical; the smeared echoes are not.
        assert_eq!(frames[0], default_ir[0]);
        assert_ne!(frames, default_ir);
    }
}
