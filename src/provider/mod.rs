//! Defaults providers
//!
//! A provider turns a package reference and version into the parsed default
//! document the local values are compared against. Providers are injected
//! into the extraction pipeline so the source of defaults can be swapped:
//! - HelmProvider: `helm show values` for a chart
//! - FileProvider: a defaults file on disk
//! - StaticProvider: an in-memory tree for tests

mod file;
mod helm;

pub use file::FileProvider;
pub use helm::{ChartRef, HelmProvider, RepoSetup, RepoSpec, DEFAULT_HELM};

use std::io;
use std::path::PathBuf;

use overrides_core::Tree;

use crate::codec::ParseError;

/// Source of default documents
pub trait DefaultsProvider: Send + Sync {
    /// Fetch and parse the defaults for a package at a version
    fn fetch_defaults(&self, package_ref: &str, version: &str) -> Result<Tree, ProviderError>;

    /// Identifier recorded in the provenance header
    fn source_id(&self, package_ref: &str, version: &str) -> String {
        format!("{}:{}", package_ref, version)
    }
}

/// Provider errors
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("'{0}' command not found; ensure it is installed and in PATH")]
    ToolNotFound(String),

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {}: {stderr}", exit_label(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` produced invalid output: {message}")]
    InvalidOutput { command: String, message: String },

    #[error("defaults file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// In-memory provider returning a fixed tree
pub struct StaticProvider {
    defaults: Tree,
}

impl StaticProvider {
    pub fn new(defaults: Tree) -> Self {
        Self { defaults }
    }
}

impl DefaultsProvider for StaticProvider {
    fn fetch_defaults(&self, _package_ref: &str, _version: &str) -> Result<Tree, ProviderError> {
        Ok(self.defaults.clone())
    }
}
