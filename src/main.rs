//! mdpass - markdown tree post-processor.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use mdpass::config::MdpassConfig;
use mdpass::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = MdpassConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Transform { args } => cli::transform::run_transform(args, &config),
        Commands::Convert { args } => cli::convert::run_convert(args),
    }
}
