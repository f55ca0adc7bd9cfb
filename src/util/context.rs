//! Global context for orchestrator operations.
//!
//! Provides centralized access to the working directory, the user-wide
//! configuration directory and project root discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::layout::is_project_root;
use crate::util::config::{load_config, Config};

/// Error locating the project root.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(
        "could not find an `engine/` directory in `{}` or any parent directory",
        .dir.display()
    )]
    NotFound { dir: PathBuf },

    #[error("`{}` is not a project root (no `engine/` directory)", .dir.display())]
    NotARoot { dir: PathBuf },
}

/// Global context.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = directories::BaseDirs::new()
            .map(|b| b.home_dir().join(".torsion"))
            .unwrap_or_else(|| PathBuf::from(".torsion"));

        Ok(GlobalContext { cwd, home })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the user-wide directory (~/.torsion/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(".torsion").join("config.toml")
    }

    /// Load global + project configuration for `root`.
    pub fn load_config(&self, root: &Path) -> Config {
        load_config(&self.config_path(), &Self::project_config_path(root))
    }

    /// Resolve the project root.
    ///
    /// An explicit root must contain `engine/`. Otherwise the working
    /// directory and its ancestors are searched.
    pub fn find_project_root(&self, explicit: Option<&Path>) -> Result<PathBuf, ProjectError> {
        if let Some(dir) = explicit {
            let dir = self.cwd.join(dir);
            if is_project_root(&dir) {
                return Ok(dir);
            }
            return Err(ProjectError::NotARoot { dir });
        }

        let mut current = self.cwd.clone();
        loop {
            if is_project_root(&current) {
                return Ok(current);
            }
            if !current.pop() {
                return Err(ProjectError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }
}
