//! Delay-line arena.
//!
//! Every delay line of an effect lives inside one caller-supplied sample
//! buffer. A [`DelayLayout`] lists the lines as `(name, capacity)` pairs and
//! packs them back to back, so line `i` starts at the sum of the capacities
//! before it:
//!
//! ```text
//!  arena: [ ap1 | ap2 | ap3 | ... | del2 |  unused  ]
//!          ^0    ^113  ^275         ^11593 ^16375   ^16384
//! ```
//!
//! All lines advance on one shared cursor owned by the engine. A line's head,
//! the slot written for "now", is `base + cursor % capacity`. Reads are
//! addressed in samples ago: delay `0` is the head and delay `capacity - 1`
//! is the tail, the oldest sample the line still holds.
//!
//! Layout checks happen once, when an engine is built, and [`Line`] handles
//! are only handed out by a validated
//! [`FxEngine`](crate::dsp::engine::FxEngine). After that a handle is just a
//! base and a capacity.

use std::ops::Range;

use crate::error::{FxError, Result};

/// One entry of a layout: a named line and the number of samples it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    pub name: &'static str,
    pub capacity: usize,
}

impl LineSpec {
    pub const fn new(name: &'static str, capacity: usize) -> Self {
        Self { name, capacity }
    }
}

/// Packing of `N` delay lines into one arena, computed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayLayout<const N: usize> {
    specs: [LineSpec; N],
    bases: [usize; N],
    total: usize,
}

impl<const N: usize> DelayLayout<N> {
    pub const fn new(specs: [LineSpec; N]) -> Self {
        let mut bases = [0usize; N];
        let mut total = 0;
        let mut i = 0;
        while i < N {
            bases[i] = total;
            total += specs[i].capacity;
            i += 1;
        }

        Self {
            specs,
            bases,
            total,
        }
    }

    /// Samples needed to hold every line.
    pub const fn total(&self) -> usize {
        self.total
    }

    pub const fn line_count(&self) -> usize {
        N
    }

    pub fn spec(&self, index: usize) -> Option<&LineSpec> {
        self.specs.get(index)
    }

    /// Arena range occupied by line `index`.
    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        let spec = self.specs.get(index)?;
        let base = self.bases[index];
        Some(base..base + spec.capacity)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.name == name)
    }

    /// Check the layout against an arena of `arena_len` samples.
    pub fn validate(&self, arena_len: usize) -> Result<()> {
        if let Some(spec) = self.specs.iter().find(|spec| spec.capacity < 2) {
            return Err(FxError::LineTooShort {
                name: spec.name,
                capacity: spec.capacity,
            });
        }

        if self.total > arena_len {
            return Err(FxError::ArenaTooSmall {
                required: self.total,
                available: arena_len,
            });
        }

        Ok(())
    }

    /// Handle to line `index`. Only meaningful once the layout has been
    /// validated against an arena.
    pub(crate) fn line(&self, index: usize) -> Result<Line> {
        match self.specs.get(index) {
            Some(spec) => Ok(Line {
                base: self.bases[index],
                capacity: spec.capacity,
            }),
            None => Err(FxError::UnknownLine { index, lines: N }),
        }
    }
}

/// Handle to one line of a validated arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    base: usize,
    capacity: usize,
}

impl Line {
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Delay of the oldest retained sample: `capacity - 1`, not `capacity`,
    /// since the head slot (delay 0) is one of the `capacity` samples the
    /// line holds. A value written now comes back out of the tail
    /// `capacity - 1` samples later.
    #[inline]
    pub fn tail(&self) -> usize {
        self.capacity.saturating_sub(1)
    }

    /// Largest fractional offset an interpolated read may use; its second
    /// neighbour is then the tail.
    #[inline]
    pub fn max_interpolation_offset(&self) -> f32 {
        self.capacity.saturating_sub(2) as f32
    }

    #[inline]
    fn slot(&self, cursor: u64, delay: usize) -> usize {
        let head = (cursor % self.capacity as u64) as usize;
        let delay = delay.min(self.tail());
        self.base + (head + self.capacity - delay) % self.capacity
    }
}

/// The caller's sample buffer, borrowed for as long as an effect uses it.
///
/// Slots outside the buffer read as silence and swallow writes, so a handle
/// from another engine's layout cannot index past the end.
pub(crate) struct DelayArena<'a> {
    memory: &'a mut [f32],
}

impl<'a> DelayArena<'a> {
    pub(crate) fn new<const N: usize>(
        memory: &'a mut [f32],
        layout: &DelayLayout<N>,
    ) -> Result<Self> {
        layout.validate(memory.len())?;

        tracing::debug!(
            lines = N,
            used = layout.total(),
            available = memory.len(),
            "delay arena partitioned"
        );

        Ok(Self { memory })
    }

    /// Sample written `delay` samples before `cursor` (clamped to the tail).
    #[inline]
    pub(crate) fn read(&self, line: Line, cursor: u64, delay: usize) -> f32 {
        self.memory
            .get(line.slot(cursor, delay))
            .copied()
            .unwrap_or(0.0)
    }

    #[inline]
    pub(crate) fn read_tail(&self, line: Line, cursor: u64) -> f32 {
        self.read(line, cursor, line.tail())
    }

    /// Linear interpolation between the two integral delays around `offset`.
    #[inline]
    pub(crate) fn read_interpolated(&self, line: Line, cursor: u64, offset: f32) -> f32 {
        let offset = offset.clamp(0.0, line.max_interpolation_offset());
        let integral = offset as usize;
        let fractional = offset - integral as f32;

        let a = self.read(line, cursor, integral);
        let b = self.read(line, cursor, integral + 1);
        a + (b - a) * fractional
    }

    /// Store `value` so that it reads back at `delay` for this cursor.
    #[inline]
    pub(crate) fn write(&mut self, line: Line, cursor: u64, delay: usize, value: f32) {
        if let Some(sample) = self.memory.get_mut(line.slot(cursor, delay)) {
            *sample = value;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.memory.fill(0.0);
    }

    /// Give the buffer back so another topology can be laid out in it.
    pub(crate) fn into_memory(self) -> &'a mut [f32] {
        self.memory
    }
}
