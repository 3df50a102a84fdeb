//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;

/// cmakegen - Generate CMakeLists.txt files for existing C/C++ source trees
#[derive(Parser)]
#[command(name = "cmakegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a source tree and list its modules
    Scan(ScanArgs),

    /// Show include dependencies and the module build order
    Analyze(AnalyzeArgs),

    /// Write CMakeLists.txt files for a source tree
    Generate(GenerateArgs),

    /// Configure and build a generated project with CMake
    Build(BuildArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Project root (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Project root (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Project root (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Minimum CMake version (overrides cmake.min_version)
    #[arg(long, value_name = "VERSION")]
    pub min_version: Option<String>,

    /// Overwrite existing CMakeLists.txt files
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Project root (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Remove the build directory before configuring
    #[arg(long)]
    pub clean: bool,

    /// Build directory (defaults to <path>/build)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show(ConfigShowArgs),

    /// Write a global config file with every default filled in
    Init(ConfigInitArgs),

    /// Set a configuration value
    Set(ConfigSetArgs),

    /// Print the config file locations
    Path,
}

#[derive(Args)]
pub struct ConfigShowArgs {
    /// Project whose config is merged over the global one
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigInitArgs {
    /// Overwrite an existing config file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key, e.g. `cmake.min_version`
    pub key: String,

    /// New value; list keys take a comma-separated list
    pub value: String,

    /// Write to the project config of this directory instead of the global one
    #[arg(long, value_name = "PATH")]
    pub project: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
