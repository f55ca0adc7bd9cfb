//! torsion-build CLI

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use torsion_build::util::shell::{ColorChoice, Shell};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("torsion_build=error")
    } else if cli.verbose {
        EnvFilter::new("torsion_build=debug")
    } else {
        EnvFilter::new("torsion_build=info")
    };

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        cli.color
    };

    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, color));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    let session = Session {
        shell,
        root: cli.root,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Compile(args) => commands::compile::execute(args, &session),
        Commands::Clean(args) => commands::clean::execute(args, &session),
        Commands::Doctor(args) => commands::doctor::execute(args, &session),
        Commands::Targets(args) => commands::targets::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
