//! Offline render and decay analysis
//!
//! The broadband decay time comes from Schroeder backward integration of the
//! output energy. Per-band decay is measured by comparing FFT band energies
//! of two windows taken a fixed time apart.

use color_eyre::eyre::{eyre, Result};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use saavy_fx::{
    dsp::reverb::{Reverb, ReverbParams},
    io::Frame,
    synth::{
        message::{MessageReceiver, NoMessages},
        processor::ReverbProcessor,
        voice::{Voice, VoiceParams},
    },
    FX_ARENA_SIZE, MAX_BLOCK_SIZE, SAMPLE_RATE,
};

use crate::voice::Ping;
use crate::Source;

/// FFT size for band analysis
const FFT_SIZE: usize = 4096;
/// Octave band centres in Hz
const BANDS: [f32; 7] = [125.0, 250.0, 500.0, 1_000.0, 2_000.0, 4_000.0, 8_000.0];

pub fn run(params: ReverbParams, seconds: f32, block: usize, source: Source) -> Result<()> {
    if block == 0 || block > MAX_BLOCK_SIZE {
        return Err(eyre!("block size must be between 1 and {}", MAX_BLOCK_SIZE));
    }
    let length = (seconds.max(0.0) * SAMPLE_RATE) as usize;
    if length == 0 {
        return Err(eyre!("nothing to render"));
    }

    let mut memory = vec![0.0; FX_ARENA_SIZE];
    let reverb = Reverb::new(&mut memory)?;
    let mut processor = ReverbProcessor::new(reverb, params, NoMessages);

    tracing::info!(length, block, ?params, "bouncing");
    let (left, right) = match source {
        Source::Impulse => render_impulse(&mut processor, length, block),
        Source::Ping => render_ping(&mut processor, length, block),
    };

    let report = Report::analyze(&left, &right, SAMPLE_RATE);
    report.print();
    Ok(())
}

fn render_impulse<R: MessageReceiver>(
    processor: &mut ReverbProcessor<'_, R>,
    length: usize,
    block: usize,
) -> (Vec<f32>, Vec<f32>) {
    let mut frames: Vec<Frame> = vec![Frame::default(); length];
    frames[0] = Frame::new(1.0, 0.0);
    for chunk in frames.chunks_mut(block) {
        processor.render(chunk);
    }
    frames.iter().map(|f| (f.left, f.right)).unzip()
}

fn render_ping<R: MessageReceiver>(
    processor: &mut ReverbProcessor<'_, R>,
    length: usize,
    block: usize,
) -> (Vec<f32>, Vec<f32>) {
    let mut voice = Ping::new(SAMPLE_RATE);
    voice.init();

    let mut left = vec![0.0; length];
    let mut right = vec![0.0; length];
    for (i, (out, aux)) in left
        .chunks_mut(block)
        .zip(right.chunks_mut(block))
        .enumerate()
    {
        let params = VoiceParams {
            trigger: i == 0,
            ..VoiceParams::default()
        };
        processor.render_voice(&mut voice, &params, out, aux);
    }
    (left, right)
}

#[derive(Debug)]
pub struct BandDecay {
    pub center: f32,
    pub rt60: Option<f32>,
}

#[derive(Debug)]
pub struct Report {
    pub peak: f32,
    pub peak_time: f32,
    pub rt60: Option<f32>,
    pub bands: Vec<BandDecay>,
    pub finite: bool,
}

impl Report {
    pub fn analyze(left: &[f32], right: &[f32], sample_rate: f32) -> Self {
        let finite = left.iter().chain(right.iter()).all(|s| s.is_finite());

        let (peak_index, peak) = left
            .iter()
            .zip(right.iter())
            .map(|(l, r)| l.abs().max(r.abs()))
            .enumerate()
            .fold((0, 0.0f32), |best, (i, v)| if v > best.1 { (i, v) } else { best });

        let energy: Vec<f32> = left
            .iter()
            .zip(right.iter())
            .map(|(l, r)| l * l + r * r)
            .collect();
        let curve = schroeder_db(&energy);
        let rt60 = decay_time(&curve, -5.0, -35.0, sample_rate)
            .or_else(|| decay_time(&curve, -5.0, -25.0, sample_rate));

        let mono: Vec<f32> = left
            .iter()
            .zip(right.iter())
            .map(|(l, r)| 0.5 * (l + r))
            .collect();
        let bands = band_decay(&mono, sample_rate);

        Self {
            peak,
            peak_time: peak_index as f32 / sample_rate,
            rt60,
            bands,
            finite,
        }
    }

    pub fn print(&self) {
        println!("=== Bounce ===");
        println!("Peak: {:.4} at {:.3} s", self.peak, self.peak_time);
        if !self.finite {
            println!("WARNING: output contains non-finite samples");
        }
        match self.rt60 {
            Some(t) => println!("RT60 (broadband): {:.3} s", t),
            None => println!("RT60 (broadband): decay too short to measure"),
        }
        println!();
        println!("Band decay:");
        for band in &self.bands {
            match band.rt60 {
                Some(t) => println!("  {:>6.0} Hz  RT60 {:.3} s", band.center, t),
                None => println!("  {:>6.0} Hz  -", band.center),
            }
        }
    }
}

/// Energy decay curve in dB relative to the total energy.
pub fn schroeder_db(energy: &[f32]) -> Vec<f32> {
    let mut curve = vec![0.0f64; energy.len()];
    let mut sum = 0.0f64;
    for (c, &e) in curve.iter_mut().zip(energy.iter()).rev() {
        sum += e as f64;
        *c = sum;
    }

    let total = curve.first().copied().unwrap_or(0.0).max(1e-30);
    curve
        .iter()
        .map(|&c| (10.0 * (c.max(1e-30) / total).log10()) as f32)
        .collect()
}

/// Time to fall from `from_db` to `to_db`, extrapolated to 60 dB.
pub fn decay_time(curve: &[f32], from_db: f32, to_db: f32, sample_rate: f32) -> Option<f32> {
    let start = curve.iter().position(|&db| db <= from_db)?;
    let end = start + curve[start..].iter().position(|&db| db <= to_db)?;
    let seconds = (end - start) as f32 / sample_rate;
    Some(seconds * 60.0 / (from_db - to_db))
}

/// Per-octave decay from the band energy of two windows half a second apart.
pub fn band_decay(signal: &[f32], sample_rate: f32) -> Vec<BandDecay> {
    let gap = (0.5 * sample_rate) as usize;
    let early = signal
        .iter()
        .position(|s| s.abs() > 1e-6)
        .unwrap_or(0);
    let late = early + gap;

    let measurable = late + FFT_SIZE <= signal.len();
    let (early_bands, late_bands) = if measurable {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| {
                0.5 * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / (FFT_SIZE - 1) as f32).cos())
            })
            .collect();

        let spectrum = |start: usize| {
            let mut buffer: Vec<Complex<f32>> = signal[start..start + FFT_SIZE]
                .iter()
                .zip(window.iter())
                .map(|(s, w)| Complex::new(s * w, 0.0))
                .collect();
            fft.process(&mut buffer);
            band_energies(&buffer, sample_rate)
        };
        (spectrum(early), spectrum(late))
    } else {
        ([0.0; BANDS.len()], [0.0; BANDS.len()])
    };

    BANDS
        .iter()
        .enumerate()
        .map(|(i, &center)| {
            let rt60 = if measurable && early_bands[i] > 0.0 && late_bands[i] > 0.0 {
                let drop_db = 10.0 * (early_bands[i] / late_bands[i]).log10();
                (drop_db > 0.0).then(|| 60.0 * (gap as f32 / sample_rate) / drop_db)
            } else {
                None
            };
            BandDecay { center, rt60 }
        })
        .collect()
}

fn band_energies(spectrum: &[Complex<f32>], sample_rate: f32) -> [f32; BANDS.len()] {
    let bin_hz = sample_rate / spectrum.len() as f32;
    let mut energies = [0.0; BANDS.len()];
    for (k, bin) in spectrum.iter().enumerate().take(spectrum.len() / 2) {
        let freq = k as f32 * bin_hz;
        for (energy, &center) in energies.iter_mut().zip(BANDS.iter()) {
            if freq >= center / std::f32::consts::SQRT_2 && freq < center * std::f32::consts::SQRT_2 {
                *energy += bin.norm_sqr();
            }
        }
    }
    energies
}
