//! Live playback: the demo voice through the reverb on the default output.
//!
//! Parameters can be changed while playing by typing `name value` lines on
//! stdin (`amount 0.8`, `reverb_time 0.9`), `reset` to silence the tail, or
//! `quit`.

use std::io::BufRead;

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use saavy_fx::{
    dsp::reverb::{Reverb, ReverbConfig, ReverbParams},
    io::{converter::interleave, Frame},
    synth::{
        message::reverb_channel,
        processor::ReverbProcessor,
        voice::{Voice, VoiceParams},
    },
    FX_ARENA_SIZE, MAX_BLOCK_SIZE, SAMPLE_RATE,
};

use crate::voice::Ping;

/// Notes cycled by the demo, as MIDI numbers
const ARPEGGIO: [f32; 5] = [60.0, 63.0, 67.0, 70.0, 74.0];

/// Decides which blocks start a new note.
struct NoteClock {
    period: u64,
    elapsed: u64,
    step: usize,
}

impl NoteClock {
    fn new(interval_seconds: f32, sample_rate: f32) -> Self {
        let period = (interval_seconds.max(0.01) * sample_rate) as u64;
        Self {
            period: period.max(1),
            elapsed: period,
            // The first trigger advances onto ARPEGGIO[0].
            step: ARPEGGIO.len() - 1,
        }
    }

    fn next_block(&mut self, frames: usize) -> VoiceParams {
        let trigger = self.elapsed >= self.period;
        if trigger {
            self.elapsed = 0;
            self.step = (self.step + 1) % ARPEGGIO.len();
        }
        self.elapsed += frames as u64;

        VoiceParams {
            note: ARPEGGIO[self.step],
            trigger,
            timbre: 0.3,
            morph: if self.step % 2 == 0 { 0.3 } else { 0.7 },
            ..VoiceParams::default()
        }
    }
}

pub fn run(params: ReverbParams, interval: f32) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    if sample_rate != SAMPLE_RATE {
        tracing::warn!(
            sample_rate,
            tuned_for = SAMPLE_RATE,
            "delay lengths are tuned for a different rate, the room will sound scaled"
        );
    }
    tracing::info!(sample_rate, channels, ?params, "starting playback");

    // The stream callback outlives this function's stack frame.
    let memory: &'static mut [f32] = Box::leak(vec![0.0; FX_ARENA_SIZE].into_boxed_slice());
    let reverb = Reverb::with_config(
        memory,
        ReverbConfig {
            sample_rate,
            ..ReverbConfig::default()
        },
    )?;

    let (mut handle, rx) = reverb_channel(64);
    let mut processor = ReverbProcessor::new(reverb, params, rx);
    let mut voice = Ping::new(sample_rate);
    voice.init();
    let mut clock = NoteClock::new(interval, sample_rate);

    let mut out = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut aux = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut frames = vec![Frame::<f32>::default(); MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let voice_params = clock.next_block(frames_to_render);

                let out = &mut out[..frames_to_render];
                let aux = &mut aux[..frames_to_render];
                processor.render_voice(&mut voice, &voice_params, out, aux);

                let block = &mut frames[..frames_to_render];
                for ((frame, &l), &r) in block.iter_mut().zip(out.iter()).zip(aux.iter()) {
                    *frame = Frame::new(l, r);
                }
                interleave(block, channels, &mut data[frames_written * channels..]);

                frames_written += frames_to_render;
            }
        },
        |err| tracing::error!(%err, "audio stream error"),
        None,
    )?;

    stream.play()?;

    println!("Playing. Commands: <param> <value> | reset | quit");

    let mut current = params;
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("quit"), _) | (Some("q"), _) => break,
            (Some("reset"), _) => handle.reset(),
            (Some(name), Some(value)) => match apply(&mut current, name, value) {
                Ok(()) => {
                    handle.set_params(current);
                    current = current.clamped();
                    tracing::info!(params = ?current, "parameters updated");
                }
                Err(err) => tracing::warn!(%err, "ignored command"),
            },
            (Some(other), None) => tracing::warn!(command = other, "expected `<param> <value>`"),
        }
    }

    Ok(())
}

fn apply(params: &mut ReverbParams, name: &str, value: &str) -> Result<()> {
    let value: f32 = value
        .parse()
        .wrap_err_with(|| format!("`{}` is not a number", value))?;
    let slot = match name {
        "amount" => &mut params.amount,
        "diffusion" => &mut params.diffusion,
        "input_gain" => &mut params.input_gain,
        "reverb_time" => &mut params.reverb_time,
        "lp" => &mut params.lp,
        other => return Err(eyre!("unknown parameter `{}`", other)),
    };
    *slot = value;
    Ok(())
}
