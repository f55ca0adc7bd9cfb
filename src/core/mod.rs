//! Core data structures.
//!
//! - Platforms, architectures and host detection
//! - Tool naming tables (vcpkg triplets, .NET RIDs, CMake system names)
//! - The project directory layout

pub mod layout;
pub mod platform;
pub mod triplet;

pub use layout::Layout;
pub use platform::{Architecture, BuildConfig, Host, Platform, Selection};
pub use triplet::Triplet;
