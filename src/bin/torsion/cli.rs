//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use torsion_build::builder::CompilerKind;
use torsion_build::util::shell::ColorChoice;
use torsion_build::{Architecture, BuildConfig, Platform, Selection};

/// Torsion build - compile the engine's native, binding and managed layers
#[derive(Parser)]
#[command(name = "torsion-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root (defaults to the nearest directory containing `engine/`)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build packages, native code, bindings and managed code into out/torsion
    Compile(CompileArgs),

    /// Remove build outputs
    Clean(CleanArgs),

    /// Check that the required tools are installed
    Doctor(DoctorArgs),

    /// Show the host target and the supported targets
    Targets(TargetsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CompileArgs {
    /// Compiler family: gcc, clang, msvc, any
    #[arg(long, value_name = "COMPILER")]
    pub compiler: Option<CompilerKind>,

    /// Build configuration: Debug, Release
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<BuildConfig>,

    /// Target platform: windows, linux, macos, android, current
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<Selection<Platform>>,

    /// Target architecture: x64, x86, arm64, arm, current
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<Selection<Architecture>>,

    /// Assume vcpkg packages are already installed
    #[arg(long)]
    pub skip_packages: bool,

    /// Worker count for vcpkg and dotnet (default: cores - 1)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct DoctorArgs {}

#[derive(Args)]
pub struct TargetsArgs {
    /// List every supported platform and architecture pair
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
