//! confmig command line front end
//!
//! Loads configuration files, runs them through the built-in migrations and
//! writes the results back.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod logging;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::ArgMatches;
use confmig_core::Migrator;

pub use cli::command;
pub use commands::{FileOutcome, OutputMode};

/// Run the parsed command
///
/// # Returns
/// The number of files that could not be migrated.
///
/// # Errors
/// Startup failures: invalid engine config or a broken migration registry
pub fn run(matches: &ArgMatches, stdout: &mut dyn Write) -> anyhow::Result<usize> {
    let registry = confmig_plugins::default_registry().context("building migration registry")?;

    match matches.subcommand() {
        Some(("migrate", args)) => {
            let config = commands::load_engine_config(
                matches.get_one::<PathBuf>("engine-config").map(PathBuf::as_path),
            )?;
            let mode = if args.get_flag("stdout") {
                OutputMode::Stdout
            } else if args.get_flag("force") {
                OutputMode::Overwrite
            } else {
                OutputMode::Sibling
            };
            let files: Vec<PathBuf> = args
                .get_many::<PathBuf>("files")
                .map(|files| files.cloned().collect())
                .unwrap_or_default();

            let migrator = Migrator::with_config(&registry, config);
            let failed = commands::migrate_files(&migrator, &files, mode, stdout);
            if failed > 0 {
                tracing::error!(failed, total = files.len(), "some files were not migrated");
            }
            Ok(failed)
        }
        Some(("list", _)) => {
            commands::list(&registry, stdout).context("writing plugin list")?;
            Ok(0)
        }
        _ => Ok(0),
    }
}
