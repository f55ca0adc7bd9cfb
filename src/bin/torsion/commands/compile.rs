//! `torsion-build compile` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::CompileArgs;
use crate::commands::Session;
use torsion_build::builder::context::default_jobs;
use torsion_build::builder::Toolbox;
use torsion_build::ops::{compile, BuildOptions};
use torsion_build::Selection;

pub fn execute(args: CompileArgs, session: &Session) -> Result<()> {
    let (layout, config) = session.project()?;

    // CLI > config > defaults
    let platform = match args.platform {
        Some(selection) => selection.into_option(),
        None => config.platform(),
    };
    let arch = args.arch.map(Selection::into_option).unwrap_or_else(|| config.arch());
    let jobs = args.jobs.or(config.build.jobs).unwrap_or_else(default_jobs);

    let opts = BuildOptions {
        config: args.config.or(config.build_config()).unwrap_or_default(),
        compiler: args.compiler.or(config.compiler()).unwrap_or_default(),
        platform,
        arch,
        skip_packages: args.skip_packages,
    };

    let toolbox = Toolbox::system(config.tool_lookup(), Arc::clone(&session.shell)).with_jobs(jobs);

    let report = compile(&layout, &config, &toolbox, &opts);
    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
