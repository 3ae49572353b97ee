//! Subcommand implementations

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use confmig_core::{MigrationConfig, MigrationRegistry, Migrator};

/// Where migrated documents go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Write `<FILE>.migrated` next to the input
    #[default]
    Sibling,
    /// Replace the input file
    Overwrite,
    /// Print to stdout, write nothing
    Stdout,
}

/// Result of migrating one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Settings were rewritten; `target` is `None` when printed to stdout
    Migrated {
        /// Number of rewritten settings
        applied: u64,
        /// File the result was written to
        target: Option<PathBuf>,
    },
    /// Nothing to migrate, input left alone
    Current,
}

/// Path of the sibling output file for `path`
#[must_use]
pub fn migrated_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".migrated");
    PathBuf::from(name)
}

/// Load engine settings, falling back to the defaults without a file
///
/// # Errors
/// If the file cannot be read or holds invalid settings
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<MigrationConfig> {
    let Some(path) = path else {
        return Ok(MigrationConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading engine config {}", path.display()))?;
    MigrationConfig::from_toml_str(&raw)
        .with_context(|| format!("loading engine config {}", path.display()))
}

/// Migrate a single file
///
/// The input is only replaced after the whole document migrated successfully.
///
/// # Errors
/// If the file cannot be read or written, or the migration fails
pub fn migrate_file(
    migrator: &Migrator<'_>,
    path: &Path,
    mode: OutputMode,
    stdout: &mut dyn Write,
) -> anyhow::Result<FileOutcome> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let migration = migrator
        .apply(&raw)
        .with_context(|| format!("migrating {}", path.display()))?;

    if mode == OutputMode::Stdout {
        stdout
            .write_all(&migration.output)
            .context("writing to stdout")?;
    }
    if migration.is_noop() {
        return Ok(FileOutcome::Current);
    }

    let target = match mode {
        OutputMode::Sibling => Some(migrated_path(path)),
        OutputMode::Overwrite => Some(path.to_path_buf()),
        OutputMode::Stdout => None,
    };
    if let Some(target) = &target {
        fs::write(target, &migration.output)
            .with_context(|| format!("writing {}", target.display()))?;
    }

    Ok(FileOutcome::Migrated {
        applied: migration.applied,
        target,
    })
}

/// Migrate every file independently, returning the number of failures
///
/// A failing file is logged and skipped; the remaining files are still processed.
pub fn migrate_files(
    migrator: &Migrator<'_>,
    paths: &[PathBuf],
    mode: OutputMode,
    stdout: &mut dyn Write,
) -> usize {
    let mut failed = 0;
    for path in paths {
        match migrate_file(migrator, path, mode, stdout) {
            Ok(FileOutcome::Current) => {
                tracing::info!(file = %path.display(), "already current, nothing to do");
            }
            Ok(FileOutcome::Migrated { applied, target }) => {
                tracing::info!(
                    file = %path.display(),
                    applied,
                    output = ?target,
                    "migrated"
                );
            }
            Err(err) => {
                tracing::error!(file = %path.display(), "{err:#}");
                failed += 1;
            }
        }
    }
    failed
}

/// Print every plugin with a registered migration, one per line
///
/// # Errors
/// If writing to `out` fails
pub fn list(registry: &MigrationRegistry, out: &mut dyn Write) -> std::io::Result<()> {
    for plugin in registry.plugins() {
        writeln!(out, "{plugin}")?;
    }
    Ok(())
}
