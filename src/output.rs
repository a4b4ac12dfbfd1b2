//! Rendering and writing override documents
//!
//! YAML output carries a provenance header naming the defaults, the local
//! file and the generator, so a reader can tell where the overrides came
//! from.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use overrides_core::Tree;
use tracing::info;

use crate::codec::{emit_document, Format, SerializationError};
use crate::error::{Error, Result};

/// First line of every provenance header
pub const HEADER_TITLE: &str = "# Values overriding chart defaults";

/// Generator tag recorded in the header
pub fn generator_tag() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Where an override document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Defaults identifier (`repo/chart:version` or a file path)
    pub defaults: String,
    /// Local values file as given
    pub local_path: String,
    /// Hex SHA-256 of the local file bytes
    pub local_digest: String,
}

impl Provenance {
    pub fn header(&self) -> String {
        format!(
            "{}\n# Generated by {}\n# Defaults: {}\n# Based on local file: {}\n# Local digest: sha256:{}\n---\n",
            HEADER_TITLE,
            generator_tag(),
            self.defaults,
            self.local_path,
            self.local_digest,
        )
    }
}

/// Serialize a tree, prefixed by the header for YAML when one is given.
///
/// JSON has no comments, so it never carries a header.
pub fn render(
    tree: &Tree,
    format: Format,
    provenance: Option<&Provenance>,
) -> std::result::Result<String, SerializationError> {
    let body = emit_document(tree, format)?;
    match (format, provenance) {
        (Format::Yaml, Some(provenance)) => Ok(provenance.header() + &body),
        _ => Ok(body),
    }
}

/// Output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Destination::Stdout, Destination::File)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::Stdout => None,
            Destination::File(path) => Some(path.as_path()),
        }
    }

    /// Write `contents`, creating parent directories for files
    pub fn write(&self, contents: &str) -> Result<()> {
        match self {
            Destination::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(contents.as_bytes())
                    .and_then(|_| stdout.flush())
                    .map_err(|e| Error::io("<stdout>", e))
            }
            Destination::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
                }
                fs::write(path, contents).map_err(|e| Error::io(path, e))
            }
        }
    }
}

/// What was written for an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The override document was written
    Written,
    /// Nothing differed; an empty file was written
    EmptyFile,
    /// Nothing differed and nothing was written
    Skipped,
}

/// Write an optional document.
///
/// With no document, an empty file is written only for file destinations
/// and only when `write_empty` is set; stdout gets nothing.
pub fn write_document(
    document: Option<&str>,
    destination: &Destination,
    write_empty: bool,
) -> Result<WriteOutcome> {
    match (document, destination) {
        (Some(text), _) => {
            destination.write(text)?;
            if let Destination::File(path) = destination {
                info!(path = %path.display(), "wrote differences");
            }
            Ok(WriteOutcome::Written)
        }
        (None, Destination::File(path)) if write_empty => {
            info!(path = %path.display(), "writing empty output file");
            destination.write("")?;
            Ok(WriteOutcome::EmptyFile)
        }
        (None, _) => {
            info!("no output generated");
            Ok(WriteOutcome::Skipped)
        }
    }
}
