use crate::io::Frame;

/// A sample type the outside world hands to the effects core.
///
/// Conversion happens once when a sample enters a topology and once when it
/// leaves; everything in between runs on `f32` in roughly `[-1, 1]`.
pub trait BusSample: Copy {
    fn to_f32(self) -> f32;
    fn from_f32(value: f32) -> Self;
}

impl BusSample for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }
}

/// Q15 fixed point: full scale is ±32768.
impl BusSample for i16 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 32_768.0
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        // Saturating; NaN maps to 0.
        (value * 32_768.0).clamp(-32_768.0, 32_767.0) as i16
    }
}

/// Split interleaved `L R L R ...` samples into frames. Extra channels are
/// ignored; mono input is copied to both sides.
pub fn deinterleave(interleaved: &[f32], channels: usize, frames: &mut [Frame<f32>]) -> usize {
    let channels = channels.max(1);
    let mut count = 0;
    for (chunk, frame) in interleaved.chunks_exact(channels).zip(frames.iter_mut()) {
        let left = chunk[0];
        let right = if channels > 1 { chunk[1] } else { left };
        *frame = Frame::new(left, right);
        count += 1;
    }
    count
}

/// Write frames back into an interleaved buffer. Mono output gets the
/// average of both sides; channels past the second are left silent.
pub fn interleave(frames: &[Frame<f32>], channels: usize, interleaved: &mut [f32]) -> usize {
    let channels = channels.max(1);
    let mut count = 0;
    for (frame, chunk) in frames.iter().zip(interleaved.chunks_exact_mut(channels)) {
        if channels == 1 {
            chunk[0] = 0.5 * (frame.left + frame.right);
        } else {
            chunk[0] = frame.left;
            chunk[1] = frame.right;
            chunk[2..].fill(0.0);
        }
        count += 1;
    }
    count
}
