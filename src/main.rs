//! SpliceHash CLI - zero-copy file digests
//!
//! Thin glue around the digest engine: argument parsing, logging setup,
//! output formatting, and exit codes.

use clap::Parser;
use splicehash::config::{CliArgs, Commands, DigestConfig};
use splicehash::core::DigestEngine;
use splicehash::error::{Result, SpliceHashError};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Handle subcommands
    if let Some(command) = &args.command {
        return handle_command(command);
    }

    // Require both positionals for a digest run
    if args.algorithm.is_none() || args.file.is_none() {
        return Err(SpliceHashError::Usage);
    }

    let config = DigestConfig::from_cli(&args).map_err(SpliceHashError::Config)?;
    let engine = DigestEngine::new(config);
    let outcome = engine.execute()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report())?);
    } else if args.quiet {
        println!("{}", outcome.hex());
    } else {
        println!("{}", outcome.format_line());
        if args.verbose > 0 {
            outcome.print_summary();
        }
    }

    Ok(())
}

fn handle_command(command: &Commands) -> Result<()> {
    match command {
        Commands::Algorithms { all } => cmd_algorithms(*all),
    }
}

fn cmd_algorithms(all: bool) -> Result<()> {
    #[cfg(target_os = "linux")]
    {
        let names = splicehash::session::kernel_algorithms(all)?;
        if names.is_empty() {
            println!("No hash algorithms found in /proc/crypto");
        } else {
            for name in names {
                println!("{}", name);
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = all;
        println!("No kernel hash registry on this platform; software backend supports:");
        for name in splicehash::session::SOFTWARE_ALGORITHMS {
            println!("{}", name);
        }
    }

    Ok(())
}
