use crate::dsp::context::Context;
use crate::dsp::delay::{DelayArena, DelayLayout, Line};
use crate::dsp::lfo::{Lfo, LfoIndex};
use crate::error::{FxError, Result};

/// Shared state of one delay-network effect: the borrowed arena, its layout,
/// the global sample cursor and the two modulation LFOs.
///
/// The engine is owned by the effect that drives it. Several engines can run
/// side by side as long as each gets its own arena.
pub struct FxEngine<'a, const N: usize> {
    arena: DelayArena<'a>,
    layout: DelayLayout<N>,
    cursor: u64,
    lfos: [Lfo; 2],
}

impl<'a, const N: usize> FxEngine<'a, N> {
    /// Partition `memory` according to `layout`.
    ///
    /// Fails if the lines do not fit. The memory contents are left as they
    /// are; call [`FxEngine::reset`] before the first sample.
    pub fn new(memory: &'a mut [f32], layout: DelayLayout<N>) -> Result<Self> {
        let arena = DelayArena::new(memory, &layout)?;

        Ok(Self {
            arena,
            layout,
            cursor: 0,
            lfos: [Lfo::with_increment(0.0); 2],
        })
    }

    pub fn layout(&self) -> &DelayLayout<N> {
        &self.layout
    }

    pub fn line(&self, index: usize) -> Result<Line> {
        self.layout.line(index)
    }

    pub fn line_named(&self, name: &str) -> Result<Line> {
        let index = self
            .layout
            .index_of(name)
            .ok_or_else(|| FxError::UnknownLineName(name.to_owned()))?;
        self.layout.line(index)
    }

    pub fn set_lfo_frequency(&mut self, index: LfoIndex, frequency_hz: f32, sample_rate: f32) {
        self.lfos[index.slot()].set_frequency(frequency_hz, sample_rate);
    }

    pub fn lfo(&self, index: LfoIndex) -> &Lfo {
        &self.lfos[index.slot()]
    }

    /// Samples processed since the last reset.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Begin one sample: snapshot the cursor and LFO values, then advance
    /// both for the next sample.
    #[inline]
    pub fn start(&mut self) -> Context<'_, 'a> {
        let cursor = self.cursor;
        self.cursor = self.cursor.wrapping_add(1);
        let lfo = [self.lfos[0].tick(), self.lfos[1].tick()];
        Context::new(&mut self.arena, cursor, lfo)
    }

    /// Silence every line without touching cursor or LFOs.
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Back to the power-on state: silent lines, cursor and LFO phases at 0.
    pub fn reset(&mut self) {
        self.arena.clear();
        self.cursor = 0;
        for lfo in &mut self.lfos {
            lfo.reset();
        }
    }

    /// Release the arena so a different topology can use it.
    pub fn into_memory(self) -> &'a mut [f32] {
        self.arena.into_memory()
    }
}
