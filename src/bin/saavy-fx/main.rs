//! saavy-fx - Play or bounce the plate reverb
//!
//! Run with: cargo run -- play
//!      or:  cargo run -- bounce --seconds 4

mod app;
mod bounce;
mod preset;
mod voice;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use saavy_fx::dsp::reverb::ReverbParams;
use tracing::Level;

#[derive(Parser)]
#[command(name = "saavy-fx")]
#[command(about = "Delay-network reverb: live playback and offline analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML preset with reverb parameters
    #[arg(short, long, global = true)]
    preset: Option<PathBuf>,

    #[command(flatten)]
    params: ParamArgs,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Overrides applied on top of the preset.
#[derive(Args)]
struct ParamArgs {
    #[arg(long, global = true)]
    amount: Option<f32>,
    #[arg(long, global = true)]
    diffusion: Option<f32>,
    #[arg(long, global = true)]
    input_gain: Option<f32>,
    #[arg(long, global = true)]
    reverb_time: Option<f32>,
    #[arg(long, global = true)]
    lp: Option<f32>,
}

impl ParamArgs {
    fn apply(&self, params: &mut ReverbParams) {
        if let Some(v) = self.amount {
            params.amount = v;
        }
        if let Some(v) = self.diffusion {
            params.diffusion = v;
        }
        if let Some(v) = self.input_gain {
            params.input_gain = v;
        }
        if let Some(v) = self.reverb_time {
            params.reverb_time = v;
        }
        if let Some(v) = self.lp {
            params.lp = v;
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Play the demo voice through the reverb on the default output device
    Play {
        /// Seconds between notes
        #[arg(long, default_value_t = 1.5)]
        interval: f32,
    },

    /// Render offline and print a decay analysis
    Bounce {
        /// Length of the render in seconds
        #[arg(long, default_value_t = 4.0)]
        seconds: f32,

        /// Block size used for rendering
        #[arg(long, default_value_t = 256)]
        block: usize,

        /// What to feed into the reverb
        #[arg(long, value_enum, default_value_t = Source::Impulse)]
        source: Source,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Source {
    /// Unit impulse on the left channel
    Impulse,
    /// One note of the demo voice
    Ping,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut params = match &cli.preset {
        Some(path) => preset::load(path)?,
        None => ReverbParams::default(),
    };
    cli.params.apply(&mut params);

    let clamped = params.clamped();
    if clamped != params {
        tracing::warn!(?params, ?clamped, "parameters out of range, clamping");
    }

    match cli.command {
        Command::Play { interval } => app::run(clamped, interval),
        Command::Bounce {
            seconds,
            block,
            source,
        } => bounce::run(clamped, seconds, block, source),
    }
}
