#![allow(dead_code)]

// Integration test utilities and common code
// WHY: centralized helpers avoid duplication across integration tests

use anno::{Expander, Note};
use std::path::PathBuf;
use tempfile::TempDir;

/// Notes reduced to (value, start, end, kind) for compact assertions
pub fn summarize(notes: &[Note]) -> Vec<(String, usize, usize, String)> {
    notes
        .iter()
        .map(|n| (n.to_string(), n.start, n.end(), n.kind.clone()))
        .collect()
}

/// Expander that rewrites every given kind to itself
pub fn identity_expander(kinds: &[&str]) -> Expander {
    kinds
        .iter()
        .fold(Expander::new(), |expander, kind| expander.with_rule(*kind, |v| v.to_string()))
}

/// Mention rule used throughout the duplicate-mention scenarios
pub fn profile_link(val: &str) -> String {
    format!(r#"<a href="/profile/{val}">{val}</a>"#)
}

/// Temporary directory holding input files for CLI runs
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Write a file into the fixture directory
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }
}
