// Purpose - external interfaces, format conversions

pub mod converter;

pub use converter::BusSample;

/// One stereo sample pair in the caller's bus format.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Frame<S = f32> {
    pub left: S,
    pub right: S,
}

impl<S> Frame<S> {
    pub const fn new(left: S, right: S) -> Self {
        Self { left, right }
    }
}

impl<S: BusSample> Frame<S> {
    pub fn to_f32(self) -> Frame<f32> {
        Frame::new(self.left.to_f32(), self.right.to_f32())
    }

    pub fn from_f32(frame: Frame<f32>) -> Self {
        Self::new(S::from_f32(frame.left), S::from_f32(frame.right))
    }
}
