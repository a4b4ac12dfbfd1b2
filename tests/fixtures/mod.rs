//! Fixture cases for golden-file assertions
//!
//! Each directory under `tests/fixtures/cases/` holds a `defaults.yaml`, a
//! `local.yaml` and, when the two differ, an `expected.yaml` with the
//! overrides that extraction must produce.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chart_overrides::{parse_document, Tree};

/// Root of the fixture cases
pub fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cases")
}

/// One golden case on disk
#[derive(Debug, Clone)]
pub struct FixtureCase {
    pub name: String,
    pub dir: PathBuf,
}

impl FixtureCase {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: cases_dir().join(name),
        }
    }

    pub fn defaults_path(&self) -> PathBuf {
        self.dir.join("defaults.yaml")
    }

    pub fn local_path(&self) -> PathBuf {
        self.dir.join("local.yaml")
    }

    pub fn expected_path(&self) -> PathBuf {
        self.dir.join("expected.yaml")
    }

    pub fn defaults(&self) -> Tree {
        load(&self.defaults_path())
    }

    pub fn local(&self) -> Tree {
        load(&self.local_path())
    }

    /// Expected overrides; `None` when the case has no `expected.yaml`
    pub fn expected(&self) -> Option<Tree> {
        let path = self.expected_path();
        path.exists().then(|| load(&path))
    }
}

/// All cases, sorted by name
pub fn all_cases() -> Vec<FixtureCase> {
    let mut cases: Vec<FixtureCase> = fs::read_dir(cases_dir())
        .expect("Failed to read fixture cases")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| FixtureCase {
            name: entry.file_name().to_string_lossy().into_owned(),
            dir: entry.path(),
        })
        .collect();
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    cases
}

fn load(path: &Path) -> Tree {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    parse_document(&text, &path.display().to_string())
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}
