//! SWIG binding generator.
//!
//! Every `*.i` file under the bindings directory is run through SWIG
//! once. The batch is best-effort: a failing interface is reported and
//! skipped, and the batch fails only when nothing was generated.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::context::Toolbox;
use crate::builder::driver::BindingGenerator;
use crate::builder::errors::{DriverError, DriverResult};
use crate::util::fs::recreate_dir;
use crate::util::process::ProcessBuilder;

/// Executable name.
pub const SWIG: &str = "swig";

/// Generates C# bindings for the native headers.
#[derive(Debug, Clone)]
pub struct Swig {
    toolbox: Toolbox,
    bindings_dir: PathBuf,
    include_dir: PathBuf,
}

impl Swig {
    /// `bindings_dir` holds the interfaces; `include_dir` is searched for
    /// the headers they include.
    pub fn new(
        toolbox: Toolbox,
        bindings_dir: impl Into<PathBuf>,
        include_dir: impl Into<PathBuf>,
    ) -> Self {
        Swig {
            toolbox,
            bindings_dir: bindings_dir.into(),
            include_dir: include_dir.into(),
        }
    }

    /// Interface files under the bindings directory, sorted.
    pub fn interfaces(&self) -> Vec<PathBuf> {
        find_interfaces(&self.bindings_dir)
    }

    /// The SWIG command for one interface.
    pub fn generate_command(
        &self,
        swig: &Path,
        interface: &Path,
        out_dir: &Path,
    ) -> ProcessBuilder {
        let stem = interface
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        ProcessBuilder::new(swig)
            .arg("-c++")
            .arg("-csharp")
            .arg(format!("-I{}", self.include_dir.display()))
            .arg("-outdir")
            .arg(out_dir)
            .arg("-o")
            .arg(out_dir.join(format!("{}_wrap.cpp", stem)))
            .arg(interface)
    }

    fn generate_one(&self, swig: &Path, interface: &Path, out_dir: &Path) -> DriverResult<()> {
        let cmd = self.generate_command(swig, interface, out_dir);
        self.toolbox.run_checked(SWIG, &cmd)?;
        Ok(())
    }
}

/// Recursively collect `*.i` files below `dir`.
pub fn find_interfaces(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "i"))
        .collect();
    found.sort();
    found
}

impl BindingGenerator for Swig {
    fn generate(&self, out_dir: &Path) -> DriverResult<usize> {
        let swig = self.toolbox.require(SWIG)?;

        let interfaces = self.interfaces();
        if interfaces.is_empty() {
            return Err(DriverError::discovery("SWIG interfaces (*.i)", &self.bindings_dir));
        }

        recreate_dir(out_dir)?;

        let mut progress = self
            .toolbox
            .shell
            .progress(interfaces.len() as u64, "Generating bindings");
        let mut generated = 0;

        for interface in &interfaces {
            let name = interface
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.generate_one(&swig, interface, out_dir) {
                Ok(()) => {
                    tracing::debug!("Generated C# from interface {}", name);
                    generated += 1;
                }
                Err(e) => {
                    tracing::warn!("SWIG failed on interface {}: {}", name, e);
                    progress.println(format!("warning: skipped {}", name));
                }
            }
            progress.inc(1);
        }
        progress.finish();

        if generated == 0 {
            return Err(DriverError::NoBindings {
                attempted: interfaces.len(),
            });
        }

        if generated < interfaces.len() {
            self.toolbox.shell.warn(format!(
                "generated {} of {} binding interfaces",
                generated,
                interfaces.len()
            ));
        }
        tracing::info!("Generated {} binding(s), see: {}", generated, out_dir.display());
        Ok(generated)
    }
}
