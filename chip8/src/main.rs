use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{FileConfig, Profile};

mod config;
mod keymap;
mod run;

/// Runs a CHIP-8 ROM in a window.
#[derive(Parser, Debug)]
#[command(name = "vm8", version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Size multiplier for each display pixel
    #[arg(short, long)]
    scale: Option<u32>,

    /// Semantics for Dxyn, Fx33 and Fx65
    #[arg(short, long, value_enum)]
    quirks: Option<Profile>,

    /// YAML file supplying defaults for the options above
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = file.merge(args.scale, args.quirks);

    run::run(&args.rom, &config)
}
