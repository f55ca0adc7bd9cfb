//! Command implementations

pub mod clean;
pub mod compile;
pub mod completions;
pub mod doctor;
pub mod targets;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use torsion_build::util::shell::Shell;
use torsion_build::util::{Config, GlobalContext};
use torsion_build::Layout;

/// Global flags shared by every command.
pub struct Session {
    pub shell: Arc<Shell>,
    pub root: Option<PathBuf>,
    pub verbose: bool,
}

impl Session {
    /// Locate the project and load its configuration.
    pub fn project(&self) -> Result<(Layout, Config)> {
        let ctx = GlobalContext::new()?;
        let root = ctx.find_project_root(self.root.as_deref())?;
        let config = ctx.load_config(&root);
        tracing::debug!("Project root: {}", root.display());
        Ok((Layout::new(root), config))
    }
}
