/// Performance parameters handed to a voice for one block.
///
/// All continuous controls are normalized to `[0, 1]`; `note` is a MIDI note
/// number (fractional for pitch bend).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    pub note: f32,
    pub harmonics: f32,
    pub timbre: f32,
    pub morph: f32,
    /// A new note starts with this block
    pub trigger: bool,
    pub accent: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            note: 60.0,
            harmonics: 0.5,
            timbre: 0.5,
            morph: 0.5,
            trigger: false,
            accent: 0.8,
        }
    }
}

/// Render contract for the sound sources that feed the effects core.
///
/// A voice writes `out.len()` samples into `out` and `aux`, two buffers owned
/// by the caller. Effects may then read, add to or overwrite those buffers,
/// e.g. treating them as the left/right pair of a stereo reverb.
pub trait Voice: Send {
    /// One-time setup before the first block.
    fn init(&mut self);

    /// Drop any running state so the next block starts from silence.
    fn reset(&mut self) {}

    fn render(&mut self, params: &VoiceParams, out: &mut [f32], aux: &mut [f32]);
}

/// Allow boxed voices to be used as voices (for dynamic dispatch)
impl Voice for Box<dyn Voice> {
    fn init(&mut self) {
        (**self).init()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn render(&mut self, params: &VoiceParams, out: &mut [f32], aux: &mut [f32]) {
        (**self).render(params, out, aux)
    }
}
