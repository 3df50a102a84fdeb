//! cmakegen CLI - CMakeLists.txt generation for C/C++ source trees

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use cmakegen::util::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cmakegen=debug")
    } else if cli.quiet || cli.message_format == MessageFormat::Json {
        EnvFilter::new("cmakegen=error")
    } else {
        EnvFilter::new("cmakegen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Arc::new(Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.no_color,
        cli.message_format == MessageFormat::Json,
    ));

    // Execute command
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &shell),
        Commands::Analyze(args) => commands::analyze::execute(args, &shell),
        Commands::Generate(args) => commands::generate::execute(args, &shell),
        Commands::Build(args) => commands::build::execute(args, &shell),
        Commands::Config(args) => commands::config::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
