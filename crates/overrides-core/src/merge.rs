//! Override merge
//!
//! The inverse of extraction: lay an override tree on top of defaults.
//! - Mappings: deep-merge by key (recursive)
//! - Sequences: REPLACE (override wins entirely)
//! - Scalars: override wins
//! - Null: override (null can override any value)

use crate::tree::Tree;

/// Merge `overrides` onto `default`.
///
/// Keys keep the defaults' order; keys only the overrides have are appended
/// in override order.
pub fn apply_overrides(default: &Tree, overrides: &Tree) -> Tree {
    match (default, overrides) {
        (Tree::Mapping(base), Tree::Mapping(overlay)) => {
            let mut merged = base.as_ref().clone();
            for (key, overlay_value) in overlay.iter() {
                let value = match base.get(key) {
                    Some(base_value) => apply_overrides(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key, value);
            }
            Tree::from(merged)
        }

        // Sequences, scalars and any other case: overlay wins
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order (first is the base, last has highest precedence)
pub fn merge_layers<'a, I>(layers: I) -> Tree
where
    I: IntoIterator<Item = &'a Tree>,
{
    layers
        .into_iter()
        .fold(Tree::Null, |merged, layer| apply_overrides(&merged, layer))
}
