//! Centralized shell output and progress management.
//!
//! The Shell module provides a unified API for all CLI output:
//! - Status messages with consistent formatting
//! - Progress bars (via indicatif)
//! - Scoped timing spans
//!
//! Commands never manage spacing or indentation directly. Everything goes
//! to stderr so stdout stays free for command results.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no progress
    Quiet,
    /// Default: status messages + progress bars
    #[default]
    Normal,
    /// --verbose: status lines, debug info, no progress bars
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl ColorChoice {
    /// Resolve `Auto` against the terminal and a set `NO_COLOR`.
    pub fn use_color(self, is_terminal: bool, no_color: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal && !no_color,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Removed,

    // In-progress statuses (cyan)
    Cleaning,
    Installing,
    Compiling,
    Generating,
    Publishing,

    // Info statuses (blue/default)
    Info,

    // Warning statuses (yellow)
    Skipped,
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Cleaning => "Cleaning",
            Status::Installing => "Installing",
            Status::Compiling => "Compiling",
            Status::Generating => "Generating",
            Status::Publishing => "Publishing",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Removed => "\x1b[1;32m",
            Status::Cleaning
            | Status::Installing
            | Status::Compiling
            | Status::Generating
            | Status::Publishing => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());

        Shell {
            verbosity,
            use_color: color.use_color(io::stderr().is_terminal(), no_color),
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message as `{status:>12} {message}`.
    ///
    /// In quiet mode, only Error status is printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Start a timed span. The start line is printed immediately; the end
    /// line carries the elapsed time.
    pub fn span(self: &Arc<Self>, status: Status, msg: impl Display) -> Span {
        Span::new(Arc::clone(self), status, msg.to_string())
    }

    /// Create a progress bar over `total` items.
    ///
    /// In quiet or verbose mode, no bar is drawn.
    pub fn progress(self: &Arc<Self>, total: u64, msg: impl Display) -> Progress {
        Progress::new(Arc::clone(self), total, msg.to_string())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// A scoped timing span.
pub struct Span {
    shell: Arc<Shell>,
    start: Instant,
}

impl Span {
    fn new(shell: Arc<Shell>, status: Status, message: String) -> Self {
        shell.status(status, &message);
        Span {
            shell,
            start: Instant::now(),
        }
    }

    /// Finish the span with a custom message.
    pub fn finish_with_message(self, msg: impl Display) -> Duration {
        let elapsed = self.start.elapsed();
        self.shell.status(
            Status::Finished,
            format!("{} in {}", msg, format_duration(elapsed)),
        );
        elapsed
    }
}

/// Progress bar wrapper that respects shell verbosity.
pub struct Progress {
    shell: Arc<Shell>,
    pb: Option<ProgressBar>,
    total: u64,
    current: u64,
    message: String,
}

impl Progress {
    fn new(shell: Arc<Shell>, total: u64, message: String) -> Self {
        let pb = if shell.is_quiet() || shell.is_verbose() || total <= 1 {
            None
        } else {
            let pb = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(message.clone());
            Some(pb)
        };

        Progress {
            shell,
            pb,
            total,
            current: 0,
            message,
        }
    }

    pub fn inc(&mut self, delta: u64) {
        self.current += delta;

        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }

        if self.shell.is_verbose() {
            eprintln!("  {} [{}/{}]", self.message, self.current, self.total);
        }
    }

    /// Print a line above the bar without tearing it.
    pub fn println(&self, msg: impl Display) {
        match &self.pb {
            Some(pb) => pb.println(msg.to_string()),
            None if !self.shell.is_quiet() => eprintln!("{}", msg),
            None => {}
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }

    pub fn position(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Format a duration in a human-readable way.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_choice_parse() {
        assert_eq!("auto".parse::<ColorChoice>().unwrap(), ColorChoice::Auto);
        assert_eq!("always".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
        assert_eq!("never".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
        assert!("invalid".parse::<ColorChoice>().is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "0.50s");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(Verbosity::Normal, ColorChoice::Never);

        let formatted = shell.format_status(Status::Compiling);
        assert_eq!(formatted.trim(), "Compiling");
        assert_eq!(formatted.len(), 12);
    }

    #[test]
    fn test_from_flags() {
        let shell = Shell::from_flags(false, false, ColorChoice::Never);
        assert!(!shell.is_quiet());
        assert!(!shell.is_verbose());

        let shell = Shell::from_flags(false, true, ColorChoice::Never);
        assert!(shell.is_verbose());

        let shell = Shell::from_flags(true, true, ColorChoice::Never);
        assert!(shell.is_quiet());
        assert!(!shell.use_color());
    }

    #[test]
    fn test_color_choice_resolution() {
        assert!(ColorChoice::Auto.use_color(true, false));
        assert!(!ColorChoice::Auto.use_color(false, false));
        assert!(!ColorChoice::Auto.use_color(true, true));
        assert!(ColorChoice::Always.use_color(false, true));
        assert!(!ColorChoice::Never.use_color(true, false));
    }

    #[test]
    fn test_span_reports_elapsed() {
        let shell = Arc::new(Shell::new(Verbosity::Quiet, ColorChoice::Never));
        let span = shell.span(Status::Compiling, "native components");
        std::thread::sleep(Duration::from_millis(5));
        assert!(span.finish_with_message("native components") >= Duration::from_millis(5));
    }

    #[test]
    fn test_progress_counts_without_bar() {
        let shell = Arc::new(Shell::new(Verbosity::Quiet, ColorChoice::Never));
        let mut progress = shell.progress(3, "Generating");
        progress.inc(1);
        progress.inc(1);
        assert_eq!(progress.position(), 2);
        assert_eq!(progress.total(), 3);
        progress.finish();
    }
}
