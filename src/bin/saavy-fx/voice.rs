//! Demo voice: a plucked sine with an optional octave partial.

use std::f32::consts::TAU;

use saavy_fx::synth::voice::{Voice, VoiceParams};

pub struct Ping {
    sample_rate: f32,
    phase: f32,
    env: f32,
}

impl Ping {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            env: 0.0,
        }
    }

    fn frequency(note: f32) -> f32 {
        440.0 * 2f32.powf((note - 69.0) / 12.0)
    }

    /// Per-sample envelope multiplier, from 20 ms (timbre 0) to 800 ms
    /// (timbre 1) time constants.
    fn decay(&self, timbre: f32) -> f32 {
        let seconds = 0.02 * 40f32.powf(timbre.clamp(0.0, 1.0));
        (-1.0 / (seconds * self.sample_rate)).exp()
    }
}

impl Voice for Ping {
    fn init(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.env = 0.0;
    }

    fn render(&mut self, params: &VoiceParams, out: &mut [f32], aux: &mut [f32]) {
        if params.trigger {
            self.phase = 0.0;
            self.env = params.accent;
        }

        let increment = Self::frequency(params.note) / self.sample_rate;
        let decay = self.decay(params.timbre);
        let octave = 0.5 * params.harmonics;
        // morph pans between out (0) and aux (1)
        let pan = params.morph.clamp(0.0, 1.0);

        for (o, a) in out.iter_mut().zip(aux.iter_mut()) {
            let sample =
                ((TAU * self.phase).sin() + octave * (2.0 * TAU * self.phase).sin()) * self.env;
            *o = sample * (1.0 - pan);
            *a = sample * pan;

            self.phase += increment;
            self.phase -= self.phase.floor();
            self.env *= decay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_until_triggered() {
        let mut ping = Ping::new(48_000.0);
        ping.init();
        let mut out = [1.0; 64];
        let mut aux = [1.0; 64];
        ping.render(&VoiceParams::default(), &mut out, &mut aux);
        assert!(out.iter().chain(aux.iter()).all(|&s| s == 0.0));
    }

    #[test]
    fn test_trigger_decays() {
        let mut ping = Ping::new(48_000.0);
        ping.init();
        let params = VoiceParams {
            trigger: true,
            timbre: 0.0,
            ..VoiceParams::default()
        };
        let mut out = [0.0; 4800];
        let mut aux = [0.0; 4800];
        ping.render(&params, &mut out, &mut aux);

        let early = out[..480].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let late = out[4320..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(early > 0.1);
        assert!(late < early * 0.05, "late {} early {}", late, early);
    }
}
