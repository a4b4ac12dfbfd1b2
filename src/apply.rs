//! Applying override files onto defaults
//!
//! The inverse of extraction, for checking that an override file
//! reproduces the intended values.

use std::path::Path;

use overrides_core::{merge_layers, Tree};
use tracing::info;

use crate::error::Result;
use crate::extract::load_document;

/// Merge override files onto a defaults file, in order.
///
/// Mappings merge by key, everything else (sequences included) is replaced
/// by the later layer.
pub fn apply_files<P: AsRef<Path>>(defaults: &Path, overrides: &[P]) -> Result<Tree> {
    let mut layers = Vec::with_capacity(overrides.len() + 1);

    info!(path = %defaults.display(), "loading defaults");
    layers.push(load_document(defaults)?.tree);

    for path in overrides {
        let path = path.as_ref();
        info!(path = %path.display(), "loading overrides");
        layers.push(load_document(path)?.tree);
    }

    Ok(merge_layers(&layers))
}
