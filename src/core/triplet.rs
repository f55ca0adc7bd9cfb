//! Toolchain naming tables.
//!
//! Every mapping from `(Platform, Architecture)` to a tool-specific name
//! lives here: vcpkg triplets, .NET runtime identifiers and CMake
//! cross-compilation variables.

use std::fmt;

use crate::core::platform::{Architecture, Host, Platform};

/// A vcpkg triplet this project can install packages for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Triplet {
    X64Windows,
    X86Windows,
    Arm64Windows,
    X64Linux,
    X86Linux,
    Arm64Linux,
    X64Osx,
    Arm64Osx,
    ArmAndroid,
    Arm64Android,
    X64Android,
}

/// Supported `(platform, arch)` pairs and their triplets.
pub const TRIPLETS: &[(Platform, Architecture, Triplet)] = &[
    (Platform::Windows, Architecture::X64, Triplet::X64Windows),
    (Platform::Windows, Architecture::X86, Triplet::X86Windows),
    (Platform::Windows, Architecture::Arm64, Triplet::Arm64Windows),
    (Platform::Linux, Architecture::X64, Triplet::X64Linux),
    (Platform::Linux, Architecture::X86, Triplet::X86Linux),
    (Platform::Linux, Architecture::Arm64, Triplet::Arm64Linux),
    (Platform::MacOS, Architecture::X64, Triplet::X64Osx),
    (Platform::MacOS, Architecture::Arm64, Triplet::Arm64Osx),
    (Platform::Android, Architecture::Arm, Triplet::ArmAndroid),
    (Platform::Android, Architecture::Arm64, Triplet::Arm64Android),
    (Platform::Android, Architecture::X64, Triplet::X64Android),
];

impl Triplet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Triplet::X64Windows => "x64-windows",
            Triplet::X86Windows => "x86-windows",
            Triplet::Arm64Windows => "arm64-windows",
            Triplet::X64Linux => "x64-linux",
            Triplet::X86Linux => "x86-linux",
            Triplet::Arm64Linux => "arm64-linux",
            Triplet::X64Osx => "x64-osx",
            Triplet::Arm64Osx => "arm64-osx",
            Triplet::ArmAndroid => "arm-android",
            Triplet::Arm64Android => "arm64-android",
            Triplet::X64Android => "x64-android",
        }
    }

    /// Look up the triplet for a pair. `None` means the pair is unsupported.
    pub fn for_target(platform: Platform, arch: Architecture) -> Option<Triplet> {
        TRIPLETS
            .iter()
            .find(|(p, a, _)| *p == platform && *a == arch)
            .map(|(_, _, triplet)| *triplet)
    }

    /// Triplet for a resolved host or target.
    pub fn for_host(host: Host) -> Option<Triplet> {
        Self::for_target(host.platform, host.arch)
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The OS part of a .NET runtime identifier.
pub fn runtime_os(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => "win",
        Platform::MacOS => "osx",
        Platform::Linux => "linux",
        Platform::Android => "android",
    }
}

/// Full .NET runtime identifier, e.g. `linux-x64` or `win-arm64`.
pub fn runtime_identifier(platform: Platform, arch: Architecture) -> String {
    format!("{}-{}", runtime_os(platform), arch.as_str())
}

/// Value for `CMAKE_SYSTEM_NAME`.
pub fn cmake_system_name(platform: Platform) -> &'static str {
    match platform {
        Platform::Linux => "Linux",
        Platform::Windows => "Windows",
        Platform::MacOS => "Darwin",
        Platform::Android => "Android",
    }
}

/// Value for `CMAKE_SYSTEM_PROCESSOR`.
pub fn cmake_system_processor(arch: Architecture) -> &'static str {
    match arch {
        Architecture::X64 => "x86_64",
        Architecture::X86 => "i386",
        Architecture::Arm64 => "aarch64",
        Architecture::Arm => "arm",
    }
}
