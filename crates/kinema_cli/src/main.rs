//! Kinema CLI
//!
//! Drives the physics and keyframe engines headlessly from a scene file and
//! prints JSON lines to stdout. Logs go to stderr.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::SimulateOptions;
use config::SceneConfig;

#[derive(Parser, Debug)]
#[command(name = "kinema", version, about = "Headless mass-spring and keyframe runner")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Step the [physics] section and print energy and positions
    Simulate {
        /// Scene file
        scene: PathBuf,

        /// Override the number of steps
        #[arg(long)]
        steps: Option<usize>,

        /// Print every Nth step
        #[arg(long, default_value_t = 1)]
        every: usize,

        /// Include force vectors in the output
        #[arg(long)]
        forces: bool,
    },

    /// Play the [animation] section and print property values per frame
    Sample {
        /// Scene file
        scene: PathBuf,

        /// Override the number of frames
        #[arg(long)]
        frames: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Simulate {
            scene,
            steps,
            every,
            forces,
        } => {
            let config = SceneConfig::load(&scene)?;
            let options = SimulateOptions {
                steps,
                every,
                show_forces: forces,
            };
            commands::simulate(&config, options, io::stdout().lock())
        }
        Command::Sample { scene, frames } => {
            let config = SceneConfig::load(&scene)?;
            commands::sample(&config, frames, io::stdout().lock())
        }
    }
}
