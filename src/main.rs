//! muse CLI: trace, render or play a Triadex Muse patch.
//!
//! Usage:
//!   muse trace --pulses 32
//!   muse --slider W=12 --seed 7 render out.wav --pulses 64
//!   muse --config patch.toml play

mod config;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use config::{load_patch, parse_slider_assignment, Overrides};
use muse_ir::{Patch, SliderName, Temperament};
use muse_master::Controller;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "muse", version, about = "Triadex Muse algorithmic melody generator")]
struct Cli {
    /// Patch file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Frequency of scale degree 0 in Hz
    #[arg(long, global = true)]
    tonic: Option<f64>,

    /// Pulses per minute
    #[arg(long, global = true)]
    bpm: Option<u32>,

    /// Slider binding as NAME=SELECTOR, e.g. W=12 (repeatable)
    #[arg(short, long = "slider", value_name = "NAME=SEL", value_parser = parse_slider_assignment, global = true)]
    sliders: Vec<(SliderName, u8)>,

    /// Shift register seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, value_enum, global = true)]
    temperament: Option<TemperamentArg>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the note sequence without producing audio
    Trace {
        #[arg(short, long, default_value_t = 32)]
        pulses: u64,
    },
    /// Render the melody to a 16-bit stereo WAV file
    Render {
        output: PathBuf,
        #[arg(short, long, default_value_t = 64)]
        pulses: u64,
        #[arg(long, default_value_t = 44100, value_parser = clap::value_parser!(u32).range(1..))]
        sample_rate: u32,
        /// Output level, 0.0-1.0
        #[arg(long)]
        gain: Option<f32>,
    },
    /// Play on the default audio device until the pulse limit or Ctrl-C
    Play {
        #[arg(short, long)]
        pulses: Option<u64>,
        /// Output level, 0.0-1.0
        #[arg(long)]
        gain: Option<f32>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TemperamentArg {
    Equal,
    Legacy,
}

impl From<TemperamentArg> for Temperament {
    fn from(arg: TemperamentArg) -> Self {
        match arg {
            TemperamentArg::Equal => Temperament::Equal,
            TemperamentArg::Legacy => Temperament::Legacy,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so trace output on stdout stays clean. `RUST_LOG` wins
/// over `-v` when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let overrides = Overrides {
        tonic_hz: cli.tonic,
        bpm: cli.bpm,
        sliders: cli.sliders,
        seed: cli.seed,
        temperament: cli.temperament.map(Temperament::from),
    };
    let patch = load_patch(cli.config.as_deref(), &overrides)?;
    debug!(?patch, "patch loaded");

    let mut ctrl = Controller::new(patch)?;
    print_patch(ctrl.patch());

    match cli.command {
        Command::Trace { pulses } => print_trace(&ctrl, pulses),
        Command::Render {
            output,
            pulses,
            sample_rate,
            gain,
        } => {
            if let Some(gain) = gain {
                ctrl.set_gain(gain);
            }
            render_to_wav(&ctrl, &output, pulses, sample_rate)?;
        }
        Command::Play { pulses, gain } => {
            if let Some(gain) = gain {
                ctrl.set_gain(gain);
            }
            play_audio(&mut ctrl, pulses)?;
        }
    }
    Ok(())
}

fn print_patch(patch: &Patch) {
    let sliders = SliderName::ALL
        .iter()
        .map(|&name| format!("{}={}", name, patch.selector(name)))
        .collect::<Vec<_>>()
        .join(" ");
    println!("Tonic:   {} Hz", patch.tonic_hz);
    println!("Tempo:   {} BPM", patch.bpm);
    println!("Sliders: {}", sliders);
    if let Some(seed) = patch.seed {
        println!("Seed:    {}", seed);
    }
    println!();
}

fn print_trace(ctrl: &Controller, pulses: u64) {
    println!("{:>6}  {:>6}  {:>10}", "pulse", "degree", "hz");
    for record in ctrl.pulse_records(pulses) {
        println!(
            "{:>6}  {:>6}  {:>10.3}",
            record.pulse, record.degree, record.frequency
        );
    }
}

fn render_to_wav(
    ctrl: &Controller,
    path: &std::path::Path,
    pulses: u64,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    println!(
        "Rendering {} pulses to {} at {} Hz...",
        pulses,
        path.display(),
        sample_rate
    );
    let file =
        File::create(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    let frames = ctrl.render_to(&mut writer, sample_rate, pulses)?;
    writer
        .flush()
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
    println!("Rendered {} frames", frames);
    Ok(())
}

fn play_audio(ctrl: &mut Controller, pulses: Option<u64>) -> Result<(), Box<dyn Error>> {
    ctrl.play(pulses)?;
    println!("Playing...");
    println!();

    while ctrl.is_playing() {
        if let Some(pos) = ctrl.position() {
            print!("\rPulse: {:6} | Degree: {:2}", pos.pulse, pos.degree);
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    ctrl.stop()?;

    println!("\rDone.                         ");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let args = ["muse", "render", "out.wav", "--sample-rate", "0"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = ["muse", "render", "out.wav", "--sample-rate", "8000"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Render {
                sample_rate: 8000,
                ..
            }
        ));
    }

    #[test]
    fn global_patch_flags_follow_the_subcommand() {
        let args = ["muse", "trace", "-p", "4", "--slider", "W=12", "-s", "a=3"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.sliders, vec![(SliderName::W, 12), (SliderName::A, 3)]);
        assert!(matches!(cli.command, Command::Trace { pulses: 4 }));
    }
}
