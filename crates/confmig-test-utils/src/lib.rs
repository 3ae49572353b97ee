//! Testing utilities for the confmig workspace
//!
//! Shared fixtures, document helpers, and assertions.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use confmig_core::{ConfigDocument, MigrationError};
use toml_edit::{DocumentMut, Table};

/// Legacy kinesis output with a static partition key
pub const LEGACY_KINESIS_STATIC: &str = r#"[agent]
  interval = "10s"

# Kinesis output
[[outputs.kinesis]]
  region = "eu-west-1"
  streamname = "metrics"
  partitionkey = "host"
"#;

/// Legacy kinesis output with random partitioning
pub const LEGACY_KINESIS_RANDOM: &str = r#"[[outputs.kinesis]]
  region = "eu-west-1"
  streamname = "metrics"
  use_random_partitionkey = true
"#;

/// Legacy kinesis output whose key disagrees with the partition sub-table
pub const CONFLICTING_KINESIS_KEY: &str = r#"[[outputs.kinesis]]
  partitionkey = "test_key"
  [outputs.kinesis.partition]
    key = "test_key2"
    method = "static"
"#;

/// Legacy kinesis output whose key implies a different partition method
pub const CONFLICTING_KINESIS_METHOD: &str = r#"[[outputs.kinesis]]
  partitionkey = "test_key"
  [outputs.kinesis.partition]
    key = "test_key"
    method = "random"
"#;

/// Configuration that no rule touches
pub const CURRENT_CONFIG: &str = r#"# Global tags
[global_tags]
  dc = "us-east-1" # trailing comment

[[inputs.cpu]]
  percpu = true

[[outputs.file]]
  files = ["stdout"]
"#;

/// Parse the body of one plugin instance into a standalone table
pub fn instance_table(body: &str) -> Table {
    body.parse::<DocumentMut>().unwrap().as_table().clone()
}

/// Plugin ids of a document in document order, rendered as `category.name`
pub fn plugin_ids(raw: &[u8]) -> Vec<String> {
    ConfigDocument::parse(raw)
        .unwrap()
        .plugin_ids()
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Parse a document into plain TOML data, dropping all formatting
pub fn semantic(raw: &[u8]) -> toml::Value {
    let text = std::str::from_utf8(raw).unwrap();
    toml::from_str(text).unwrap()
}

/// Assert two documents hold the same plugins in the same order and the same settings
pub fn assert_same_config(actual: &[u8], expected: &[u8]) {
    pretty_assertions::assert_eq!(plugin_ids(actual), plugin_ids(expected));
    pretty_assertions::assert_eq!(semantic(actual), semantic(expected));
}

/// Assert a migration failed with a conflict between the two named settings
pub fn assert_conflict(err: &MigrationError, legacy_field: &str, new_field: &str) {
    let conflict = err
        .conflict()
        .unwrap_or_else(|| panic!("expected a conflict, got: {err}"));
    assert_eq!(conflict.legacy_field(), legacy_field);
    assert_eq!(conflict.new_field(), new_field);
    assert!(err
        .to_string()
        .contains(&format!("contradicting setting for '{legacy_field}' and '{new_field}'")));
}

/// One `input.conf` / `expected.conf` pair
#[derive(Debug, Clone)]
pub struct Testcase {
    pub name: String,
    pub input: Vec<u8>,
    pub expected: Vec<u8>,
}

/// Load every testcase directory below `root`, sorted by name
pub fn load_testcases(root: impl AsRef<Path>) -> Vec<Testcase> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root.as_ref())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    dirs.into_iter()
        .map(|dir| Testcase {
            name: dir.file_name().unwrap().to_string_lossy().into_owned(),
            input: fs::read(dir.join("input.conf")).unwrap(),
            expected: fs::read(dir.join("expected.conf")).unwrap(),
        })
        .collect()
}
