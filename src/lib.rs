//! Torsion build - the build orchestrator for the Torsion engine
//!
//! This crate drives the external toolchains that produce an engine
//! package: vcpkg for native packages, CMake for the native sources, SWIG
//! for the C# bindings and the .NET SDK for the managed sources.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording process runner, an in-memory
/// tool lookup and on-disk project fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Architecture, BuildConfig, Host, Layout, Platform, Selection, Triplet};
pub use ops::{BuildOptions, BuildReport, Pipeline};
pub use util::context::GlobalContext;
