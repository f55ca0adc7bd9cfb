//! Environment and toolchain health checks.
//!
//! The `doctor` command verifies that every tool the build pipeline
//! drives is installed, and reports where it was found.
//!
//! ## Checks Performed
//!
//! - CMake and the configured generator (Ninja by default)
//! - A C/C++ compiler pair
//! - vcpkg and its CMake toolchain file
//! - SWIG
//! - The .NET SDK

use std::fmt::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::builder::cmake::{CMAKE, DEFAULT_GENERATOR};
use crate::builder::dotnet::DOTNET;
use crate::builder::swig::SWIG;
use crate::builder::toolchain::find_compiler_pair;
use crate::builder::vcpkg::VCPKG;
use crate::builder::{DotNet, DriverError, Toolbox, Vcpkg};
use crate::util::shell::format_duration;
use crate::core::triplet::runtime_identifier;
use crate::core::Triplet;
use crate::util::config::Config;
use crate::util::process::ProcessBuilder;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..CheckResult::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Host and target naming, as `(label, value)`
    pub environment: Vec<(String, String)>,
}

impl DoctorReport {
    pub fn new() -> Self {
        DoctorReport::default()
    }

    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Run every check against `toolbox`.
pub fn doctor(toolbox: &Toolbox, config: &Config) -> DoctorReport {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    let host = toolbox.host;
    report.environment.push(("host".to_string(), host.to_string()));
    report.environment.push((
        "triplet".to_string(),
        Triplet::for_host(host)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unsupported".to_string()),
    ));
    report.environment.push((
        "runtime".to_string(),
        runtime_identifier(host.platform, host.arch),
    ));
    report
        .environment
        .push(("jobs".to_string(), toolbox.jobs.to_string()));

    report.add(check_tool(toolbox, "CMake", CMAKE, &["--version"]));
    report.add(check_generator(toolbox, config.generator()));
    report.add(check_compilers(toolbox, config));

    // Only tool discovery is needed, so the drivers get no source directory
    let vcpkg = Vcpkg::new(toolbox.clone(), PathBuf::new());
    let dotnet = DotNet::new(toolbox.clone(), PathBuf::new(), PathBuf::new());

    report.add(check_driver(toolbox, "vcpkg", VCPKG, vcpkg.is_available(), &["version"]));
    report.add(check_vcpkg_toolchain(&vcpkg));
    report.add(check_tool(toolbox, "SWIG", SWIG, &["-version"]));
    report.add(check_driver(
        toolbox,
        ".NET SDK",
        DOTNET,
        dotnet.is_available(),
        &["--version"],
    ));

    report.total_duration = start.elapsed();
    report
}

/// Check that `tool` is installed and ask it for a version.
fn check_tool(toolbox: &Toolbox, name: &str, tool: &str, version_args: &[&str]) -> CheckResult {
    let available = toolbox.tools.is_available(tool);
    check_driver(toolbox, name, tool, available, version_args)
}

/// Like [`check_tool`], with availability decided by the driver.
fn check_driver(
    toolbox: &Toolbox,
    name: &str,
    tool: &str,
    available: bool,
    version_args: &[&str],
) -> CheckResult {
    let start = Instant::now();

    match toolbox.tools.find(tool).filter(|_| available) {
        Some(path) => {
            let version = probe_version(toolbox, &path, version_args);
            CheckResult::pass(name, format!("{} is available", tool))
                .with_path(path)
                .with_version(version)
                .with_duration(start.elapsed())
        }
        None => CheckResult::fail(name, format!("{} not found on PATH", tool))
            .with_duration(start.elapsed()),
    }
}

/// Ninja is required when it is the configured generator.
fn check_generator(toolbox: &Toolbox, generator: &str) -> CheckResult {
    let check = check_tool(toolbox, "Ninja", "ninja", &["--version"]);
    if generator == DEFAULT_GENERATOR {
        check
    } else {
        CheckResult {
            message: format!("{} (generator is {})", check.message, generator),
            ..check
        }
        .optional()
    }
}

fn check_compilers(toolbox: &Toolbox, config: &Config) -> CheckResult {
    let start = Instant::now();
    // Same default as `compile`
    let kind = config.compiler().unwrap_or_default();

    let pair = config
        .compiler_pair()
        .or_else(|| find_compiler_pair(toolbox.tools.as_ref(), kind, toolbox.host.platform));

    match pair {
        Some(pair) => {
            let version = probe_version(toolbox, pair.cxx(), &["--version"]);
            CheckResult::pass(
                "C/C++ Compiler",
                format!("Found {} / {}", pair.cc().display(), pair.cxx().display()),
            )
            .with_path(pair.cxx().to_path_buf())
            .with_version(version)
            .with_duration(start.elapsed())
        }
        None => CheckResult::fail(
            "C/C++ Compiler",
            DriverError::compiler_missing(kind, toolbox.host.platform).to_string(),
        )
        .with_duration(start.elapsed()),
    }
}

fn check_vcpkg_toolchain(vcpkg: &Vcpkg) -> CheckResult {
    let start = Instant::now();

    match vcpkg.toolchain_file() {
        Some(path) => CheckResult::pass("vcpkg toolchain", "CMake integration found")
            .with_path(path)
            .with_duration(start.elapsed())
            .optional(),
        None => CheckResult::fail(
            "vcpkg toolchain",
            "vcpkg.cmake not found beside vcpkg; the native build runs without it",
        )
        .with_duration(start.elapsed())
        .optional(),
    }
}

/// First non-empty output line of `<tool> <args>`, if it runs.
fn probe_version(toolbox: &Toolbox, tool: &std::path::Path, args: &[&str]) -> Option<String> {
    let cmd = ProcessBuilder::new(tool).args(args);
    let output = toolbox.runner.run(&cmd).ok()?;
    if !output.success() {
        return None;
    }

    // Some tools print their banner on stderr
    let text = if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Torsion Doctor");
    let _ = writeln!(output, "==============\n");

    if verbose {
        let _ = writeln!(output, "Environment:");
        for (label, value) in &report.environment {
            let _ = writeln!(output, "  {}: {}", label, value);
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "Checks:");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        let _ = writeln!(output, "  {} {}{}", status, check.name, required);

        if verbose || !check.passed {
            let _ = writeln!(output, "      {}", check.message);
        }
        if verbose {
            if let Some(path) = &check.path {
                let _ = writeln!(output, "      Path: {}", path.display());
            }
            if let Some(version) = &check.version {
                let _ = writeln!(output, "      Version: {}", version);
            }
            let _ = writeln!(output, "      Took: {}", format_duration(check.duration));
        }
    }

    let _ = writeln!(output);

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    let _ = writeln!(
        output,
        "Summary: {} passed, {} failed in {}",
        passed,
        failed,
        format_duration(report.total_duration)
    );

    if required_failed > 0 {
        let _ = writeln!(
            output,
            "\n{} required check(s) failed. `torsion-build compile` will not succeed.",
            required_failed
        );
    } else if failed > 0 {
        let _ = writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        );
    } else {
        let _ = writeln!(output, "\nAll checks passed. Ready to build.");
    }

    output
}
