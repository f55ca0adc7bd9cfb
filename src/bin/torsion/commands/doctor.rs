//! `torsion-build doctor` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::DoctorArgs;
use crate::commands::Session;
use torsion_build::builder::Toolbox;
use torsion_build::ops::{doctor, format_report};
use torsion_build::util::{Config, GlobalContext};

pub fn execute(_args: DoctorArgs, session: &Session) -> Result<()> {
    // Outside a project only the global configuration applies
    let config = match session.project() {
        Ok((_, config)) => config,
        Err(e) if session.root.is_some() => return Err(e),
        Err(_) => {
            let ctx = GlobalContext::new()?;
            Config::load_or_default(&ctx.config_path())
        }
    };

    let mut toolbox = Toolbox::system(config.tool_lookup(), Arc::clone(&session.shell));
    if let Some(jobs) = config.build.jobs {
        toolbox = toolbox.with_jobs(jobs);
    }

    let report = doctor(&toolbox, &config);
    print!("{}", format_report(&report, session.verbose));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
