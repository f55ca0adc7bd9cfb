//! Build stage drivers.
//!
//! One driver per external toolchain, each behind a trait from
//! [`driver`] so the pipeline can be run against stand-ins.

pub mod cmake;
pub mod context;
pub mod dotnet;
pub mod driver;
pub mod errors;
pub mod swig;
pub mod toolchain;
pub mod vcpkg;

pub use cmake::CMake;
pub use context::Toolbox;
pub use dotnet::DotNet;
pub use driver::{BindingGenerator, BuildTarget, ManagedBuild, NativeBuild, PackageManager};
pub use errors::{DriverError, DriverResult};
pub use swig::Swig;
pub use toolchain::{CompilerKind, CompilerPair};
pub use vcpkg::Vcpkg;
