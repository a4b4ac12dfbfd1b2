//! Override extraction
//!
//! Computes the minimal sub-document of a local tree that, merged back onto
//! the defaults, reproduces the local tree:
//! - Kind mismatch: the whole local node (an explicit null is dropped)
//! - Mappings: recurse per key, in local declaration order
//! - Sequences: atomic, the whole local sequence when they differ
//! - Scalars and nulls: the local value when they differ

use crate::tree::{Mapping, Tree};

/// Extract the overrides `local` introduces relative to `default`.
///
/// Returns `None` when `local` changes nothing observable at this node.
/// Neither input is modified; unchanged local sub-trees are shared into the
/// result rather than copied.
///
/// Keys present only in `default` are never emitted, since absence in the
/// local document means "inherit". A local `null` is never emitted either:
/// not for a key the defaults lack, and not over a non-null default.
pub fn extract_overrides(local: &Tree, default: &Tree) -> Option<Tree> {
    match (local, default) {
        (Tree::Mapping(local_map), Tree::Mapping(default_map)) => {
            extract_mapping(local_map, default_map)
        }
        (Tree::Sequence(local_items), Tree::Sequence(default_items)) => {
            (local_items != default_items).then(|| local.clone())
        }
        (Tree::Scalar(local_value), Tree::Scalar(default_value)) => {
            (local_value != default_value).then(|| local.clone())
        }
        (Tree::Null, _) => None,
        // Shapes diverge: the override replaces the whole node
        _ => Some(local.clone()),
    }
}

fn extract_mapping(local: &Mapping, default: &Mapping) -> Option<Tree> {
    let mut overrides = Mapping::new();

    for (key, local_value) in local.iter() {
        let diff = match default.get(key) {
            Some(default_value) => extract_overrides(local_value, default_value),
            None if local_value.is_null() => None,
            None => Some(local_value.clone()),
        };

        if let Some(value) = diff {
            overrides.insert(key, value);
        }
    }

    (!overrides.is_empty()).then(|| Tree::from(overrides))
}
