//! Extraction pipeline
//!
//! Fetch defaults → parse local values → extract overrides → render. The
//! engine in `overrides_core` does the comparison; everything here is I/O
//! around it.

use std::fs;
use std::path::Path;

use overrides_core::{extract_overrides, Tree};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::codec::{parse_document, Format, ParseError};
use crate::error::{Error, Result};
use crate::output::{render, Provenance};
use crate::provider::DefaultsProvider;

/// Rendering options for an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub format: Format,
    /// Prefix YAML output with the provenance header
    pub header: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            format: Format::Yaml,
            header: true,
        }
    }
}

/// Result of comparing a local document with its defaults
#[derive(Debug, Clone)]
pub struct Extraction {
    pub provenance: Provenance,
    /// The override tree; `None` when nothing differs
    pub overrides: Option<Tree>,
    /// The rendered document, present exactly when `overrides` is
    pub document: Option<String>,
}

impl Extraction {
    pub fn has_differences(&self) -> bool {
        self.overrides.is_some()
    }

    /// Dotted paths of every overridden value
    pub fn overridden_paths(&self) -> Vec<String> {
        self.overrides
            .as_ref()
            .map(Tree::leaf_paths)
            .unwrap_or_default()
    }

    pub fn report(&self, output: Option<&Path>) -> ExtractReport {
        ExtractReport {
            defaults: self.provenance.defaults.clone(),
            local: self.provenance.local_path.clone(),
            local_digest: self.provenance.local_digest.clone(),
            output: output.map(|p| p.display().to_string()),
            differences: self.has_differences(),
            overridden: self.overridden_paths(),
        }
    }
}

/// Machine-readable summary of an extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    pub defaults: String,
    pub local: String,
    pub local_digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub differences: bool,
    pub overridden: Vec<String>,
}

impl ExtractReport {
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A parsed document read from disk, with the digest of its bytes
pub(crate) struct LoadedDocument {
    pub tree: Tree,
    pub digest: String,
}

/// Read and parse a YAML document from `path`
pub(crate) fn load_document(path: &Path) -> Result<LoadedDocument> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let origin = path.display().to_string();
    let text = String::from_utf8(bytes)
        .map_err(|e| ParseError::new(&origin, format!("invalid UTF-8: {}", e)))?;
    let tree = parse_document(&text, &origin)?;

    Ok(LoadedDocument { tree, digest })
}

/// Compare the local values at `local_path` with the defaults `provider`
/// returns for `package_ref` at `version`.
pub fn extract(
    local_path: &Path,
    package_ref: &str,
    version: &str,
    provider: &dyn DefaultsProvider,
    options: ExtractOptions,
) -> Result<Extraction> {
    let defaults_id = provider.source_id(package_ref, version);

    info!(defaults = %defaults_id, "fetching default values");
    let default = provider.fetch_defaults(package_ref, version)?;
    info!("default values loaded");

    info!(path = %local_path.display(), "loading local values");
    let local = load_document(local_path)?;
    info!("local values loaded");

    info!("comparing values and extracting differences");
    let overrides = extract_overrides(&local.tree, &default);

    let provenance = Provenance {
        defaults: defaults_id,
        local_path: local_path.display().to_string(),
        local_digest: local.digest,
    };

    let document = match &overrides {
        Some(tree) => {
            let header = options.header.then_some(&provenance);
            Some(render(tree, options.format, header)?)
        }
        None => None,
    };

    match &overrides {
        Some(tree) => info!(count = tree.leaf_paths().len(), "differences identified"),
        None => info!("no differences found between local values and defaults"),
    }

    Ok(Extraction {
        provenance,
        overrides,
        document,
    })
}
