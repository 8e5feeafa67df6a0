//! Test fixtures for Babel crates.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// English GEM entry, YAML.
pub const EN_YAML: &str = r#"GEM:
  one: "Something went wrong %s"
  other: "Some things went wrong %s"
ITEMS:
  one: "%d item"
  other: "%d items"
"#;

/// Italian GEM entry, TOML.
pub const IT_TOML: &str = r#"[GEM]
one = "Qualcosa è andato storto %s"
other = "Alcune cose sono andate storte %s"

[ITEMS]
one = "%d elemento"
other = "%d elementi"
"#;

/// Italian GEM entry, JSON.
pub const IT_JSON: &str = r#"{
  "GEM": {
    "one": "Qualcosa è andato storto %s",
    "other": "Alcune cose sono andate storte %s"
  }
}"#;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given content.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = write_file(dir.path(), name, content);
    (dir, path)
}

/// Writes `content` to `dir/name`, returning the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// A localizations directory holding `en.yaml` and `it.toml`.
pub fn localizations_dir() -> TempDir {
    let dir = temp_dir();
    write_file(dir.path(), "en.yaml", EN_YAML);
    write_file(dir.path(), "it.toml", IT_TOML);
    dir
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
