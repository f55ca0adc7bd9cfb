//! `torsion-build clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use crate::commands::Session;
use torsion_build::ops::clean;
use torsion_build::util::shell::Status;

pub fn execute(_args: CleanArgs, session: &Session) -> Result<()> {
    let (layout, _config) = session.project()?;

    let result = clean(&layout)?;
    if result.removed.is_empty() {
        session.shell.note("nothing to clean");
    }
    for dir in &result.removed {
        session.shell.status(Status::Removed, dir.display());
    }

    Ok(())
}
