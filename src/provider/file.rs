//! File-backed defaults provider

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use overrides_core::Tree;
use tracing::debug;

use super::{DefaultsProvider, ProviderError};
use crate::codec::parse_document;

/// Reads defaults from a YAML file instead of a package tool.
///
/// The package reference and version are ignored; the file path is the
/// provenance identifier.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DefaultsProvider for FileProvider {
    fn fetch_defaults(&self, _package_ref: &str, _version: &str) -> Result<Tree, ProviderError> {
        debug!(path = %self.path.display(), "reading defaults file");
        let text = fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ProviderError::NotFound(self.path.clone()),
            _ => ProviderError::Io {
                path: self.path.clone(),
                source,
            },
        })?;
        Ok(parse_document(&text, &self.path.display().to_string())?)
    }

    fn source_id(&self, _package_ref: &str, _version: &str) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "replicaCount: 1").unwrap();
        writeln!(temp, "image:").unwrap();
        writeln!(temp, "  tag: latest").unwrap();

        let provider = FileProvider::new(temp.path());
        let tree = provider.fetch_defaults("", "").unwrap();

        assert_eq!(tree.keys(), vec!["replicaCount", "image"]);
        assert_eq!(provider.source_id("ignored", "0.0.0"), temp.path().display().to_string());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProvider::new(dir.path().join("absent.yaml"));
        let err = provider.fetch_defaults("", "").unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn test_malformed_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "a: [unterminated").unwrap();

        let err = FileProvider::new(temp.path()).fetch_defaults("", "").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
