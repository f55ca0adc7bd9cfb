//! `torsion-build targets` command

use anyhow::Result;

use crate::cli::TargetsArgs;
use torsion_build::core::triplet::{runtime_identifier, TRIPLETS};
use torsion_build::{Host, Triplet};

pub fn execute(args: TargetsArgs) -> Result<()> {
    let host = Host::current();
    let triplet = Triplet::for_host(host)
        .map(|t| t.to_string())
        .unwrap_or_else(|| "unsupported".to_string());

    println!("Host: {}", host);
    println!("  triplet: {}", triplet);
    println!("  runtime: {}", runtime_identifier(host.platform, host.arch));

    if args.all {
        println!();
        println!("{:<10} {:<7} {:<15} RUNTIME", "PLATFORM", "ARCH", "TRIPLET");
        for (platform, arch, triplet) in TRIPLETS {
            println!(
                "{:<10} {:<7} {:<15} {}",
                platform.as_str(),
                arch.as_str(),
                triplet.as_str(),
                runtime_identifier(*platform, *arch)
            );
        }
    }

    Ok(())
}
