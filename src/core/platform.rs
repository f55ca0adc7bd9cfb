//! Platforms, architectures and host detection.
//!
//! A build targets one `(Platform, Architecture)` pair. "Use the host" is
//! never a variant of these enums: callers hold an `Option<Platform>` and
//! resolve `None` against [`Host::current`].

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::de::value::StringDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Operating system family a build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
    #[serde(alias = "darwin", alias = "osx")]
    MacOS,
    Android,
}

impl Platform {
    /// All platforms, in table order.
    pub const ALL: [Platform; 4] = [
        Platform::Linux,
        Platform::Windows,
        Platform::MacOS,
        Platform::Android,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" | "win" => Ok(Platform::Windows),
            "macos" | "darwin" | "osx" => Ok(Platform::MacOS),
            "android" => Ok(Platform::Android),
            _ => Err(ParseValueError::new(
                "platform",
                s,
                "windows, linux, macos, android",
            )),
        }
    }
}

/// CPU architecture a build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X64,
    X86,
    Arm64,
    #[serde(alias = "arm86")]
    Arm,
}

impl Architecture {
    /// All architectures, in table order.
    pub const ALL: [Architecture; 4] = [
        Architecture::X64,
        Architecture::X86,
        Architecture::Arm64,
        Architecture::Arm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::X86 => "x86",
            Architecture::Arm64 => "arm64",
            Architecture::Arm => "arm",
        }
    }

    /// Map a machine identifier (`uname -m`, `std::env::consts::ARCH`)
    /// to an architecture. Unknown strings yield `None`.
    pub fn from_machine(machine: &str) -> Option<Self> {
        match machine.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Some(Architecture::X64),
            "x86" | "i386" | "i586" | "i686" => Some(Architecture::X86),
            "aarch64" | "arm64" => Some(Architecture::Arm64),
            "arm" | "armv7" | "armv7l" | "armhf" => Some(Architecture::Arm),
            _ => None,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x64" => Ok(Architecture::X64),
            "x86" => Ok(Architecture::X86),
            "arm64" => Ok(Architecture::Arm64),
            // `arm86` is the spelling older build scripts accepted.
            "arm" | "arm86" => Ok(Architecture::Arm),
            _ => Err(ParseValueError::new(
                "architecture",
                s,
                "x64, x86, arm64, arm",
            )),
        }
    }
}

/// Build configuration passed to CMake and `dotnet publish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildConfig {
    #[default]
    #[serde(alias = "debug")]
    Debug,
    #[serde(alias = "release")]
    Release,
}

impl BuildConfig {
    /// The spelling both CMake and MSBuild expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfig::Debug => "Debug",
            BuildConfig::Release => "Release",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfig {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildConfig::Debug),
            "release" => Ok(BuildConfig::Release),
            _ => Err(ParseValueError::new("build config", s, "Debug, Release")),
        }
    }
}

/// A target value, or `current` for the host's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    Current,
    Value(T),
}

impl<T> Selection<T> {
    /// Spelling of [`Selection::Current`].
    pub const CURRENT: &'static str = "current";

    /// `None` means the host.
    pub fn into_option(self) -> Option<T> {
        match self {
            Selection::Current => None,
            Selection::Value(value) => Some(value),
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::CURRENT) {
            return Ok(Selection::Current);
        }
        s.parse().map(Selection::Value).map_err(|e: T::Err| e.to_string())
    }
}

impl<T: Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::Current => serializer.serialize_str(Self::CURRENT),
            Selection::Value(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Selection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.eq_ignore_ascii_case(Self::CURRENT) {
            return Ok(Selection::Current);
        }
        let inner: StringDeserializer<D::Error> = value.into_deserializer();
        T::deserialize(inner).map(Selection::Value)
    }
}

/// Error for an unrecognised platform, architecture or config name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}'; expected one of: {expected}")]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseValueError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        ParseValueError {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// The machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Host {
    pub platform: Platform,
    pub arch: Architecture,
}

impl Host {
    pub fn new(platform: Platform, arch: Architecture) -> Self {
        Host { platform, arch }
    }

    /// Resolve the host from OS and machine identifiers.
    ///
    /// Accepts both `platform.system()` style names (`darwin`) and Rust's
    /// `std::env::consts::OS` names (`macos`). An unknown machine under a
    /// known OS falls back to x64; an unknown OS falls back to linux-x64.
    pub fn from_identifiers(os: &str, machine: &str) -> Self {
        let platform = match os.to_ascii_lowercase().as_str() {
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            "darwin" | "macos" => Platform::MacOS,
            "android" => Platform::Android,
            _ => {
                tracing::warn!("Unknown host platform {}-{}, defaulting to linux-x64", os, machine);
                return Host::new(Platform::Linux, Architecture::X64);
            }
        };

        let arch = Architecture::from_machine(machine).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown machine '{}' on {}, defaulting to x64",
                machine,
                platform
            );
            Architecture::X64
        });

        Host::new(platform, arch)
    }

    /// The host this process runs on. Computed once.
    pub fn current() -> Self {
        static HOST: OnceLock<Host> = OnceLock::new();
        *HOST.get_or_init(|| {
            Host::from_identifiers(std::env::consts::OS, std::env::consts::ARCH)
        })
    }

    /// Resolve an optional target against this host.
    pub fn target(&self, platform: Option<Platform>, arch: Option<Architecture>) -> Host {
        Host::new(
            platform.unwrap_or(self.platform),
            arch.unwrap_or(self.arch),
        )
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)
    }
}
