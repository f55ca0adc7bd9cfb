//! High-level operations.
//!
//! This module contains the implementation of the CLI commands.

pub mod clean;
pub mod compile;
pub mod doctor;

pub use clean::{clean, CleanResult};
pub use compile::{compile, BuildOptions, BuildReport, Drivers, Pipeline, Step, StepFailure};
pub use doctor::{doctor, format_report, CheckResult, DoctorReport};
