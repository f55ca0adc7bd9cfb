//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use process::{
    PathLookup, ProcessBuilder, ProcessOutput, ProcessRunner, SystemRunner, ToolLookup,
};
pub use shell::Shell;
