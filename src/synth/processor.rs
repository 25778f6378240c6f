use crate::dsp::reverb::{Reverb, ReverbParams};
use crate::io::{BusSample, Frame};
use crate::synth::message::{FxMessage, MessageReceiver};
use crate::synth::voice::{Voice, VoiceParams};

/// Audio-thread owner of a reverb.
///
/// Pending control messages are applied at the top of each block, so a
/// parameter change never lands in the middle of one.
pub struct ReverbProcessor<'a, R: MessageReceiver> {
    reverb: Reverb<'a>,
    params: ReverbParams,
    rx: R,
}

impl<'a, R: MessageReceiver> ReverbProcessor<'a, R> {
    pub fn new(reverb: Reverb<'a>, params: ReverbParams, rx: R) -> Self {
        Self {
            reverb,
            params: params.clamped(),
            rx,
        }
    }

    /// Parameters the next block will use.
    pub fn params(&self) -> &ReverbParams {
        &self.params
    }

    pub fn reverb(&self) -> &Reverb<'a> {
        &self.reverb
    }

    fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                FxMessage::SetParams(params) => self.params = params.clamped(),
                FxMessage::Reset => self.reverb.reset(),
            }
        }
    }

    pub fn render<S: BusSample>(&mut self, frames: &mut [Frame<S>]) {
        self.drain_messages();
        self.reverb.process(frames, &self.params);
    }

    /// Render one block of `voice` and run its `out`/`aux` pair through the
    /// reverb as left and right.
    pub fn render_voice<V: Voice + ?Sized>(
        &mut self,
        voice: &mut V,
        voice_params: &VoiceParams,
        out: &mut [f32],
        aux: &mut [f32],
    ) {
        self.drain_messages();
        voice.render(voice_params, out, aux);
        self.reverb.process_planar(out, aux, &self.params);
    }

    pub fn into_reverb(self) -> Reverb<'a> {
        self.reverb
    }
}
