//! Document codec
//!
//! Parses YAML text into a [`Tree`] and serializes trees back to YAML or
//! JSON. Key order survives both directions; comments do not.

use overrides_core::{Mapping, Scalar, Tree};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Output format for serialized trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

/// A document could not be parsed
#[derive(Debug, thiserror::Error)]
#[error("failed to parse {origin}: {message}")]
pub struct ParseError {
    /// File path or defaults identifier the text came from
    pub origin: String,
    /// Codec message, verbatim
    pub message: String,
}

impl ParseError {
    pub fn new(origin: &str, message: impl ToString) -> Self {
        Self {
            origin: origin.to_string(),
            message: message.to_string(),
        }
    }
}

/// A tree could not be serialized
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON cannot represent {value} at `{path}`")]
    NonFinite { path: String, value: f64 },
}

/// Plain strings a YAML 1.1 reader such as Helm's resolves to booleans
const YAML11_BOOLS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off", "OFF",
];

/// Parse a single YAML document.
///
/// Empty, comment-only and explicit `null` documents parse as an empty
/// mapping. Merge keys (`<<: *anchor`) are resolved. Scalar mapping keys are
/// stringified, and two keys that stringify alike are rejected, as are
/// sequence and mapping keys. Tags are dropped and the tagged value kept.
pub fn parse_document(text: &str, origin: &str) -> Result<Tree, ParseError> {
    if is_blank(text) {
        return Ok(Tree::empty_mapping());
    }

    let mut value: Value = serde_yaml::from_str(text).map_err(|e| ParseError::new(origin, e))?;
    value.apply_merge().map_err(|e| ParseError::new(origin, e))?;
    match value {
        Value::Null => Ok(Tree::empty_mapping()),
        other => from_yaml(other, origin),
    }
}

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn from_yaml(value: Value, origin: &str) -> Result<Tree, ParseError> {
    let tree = match value {
        Value::Null => Tree::Null,
        Value::Bool(b) => Tree::from(b),
        Value::Number(n) => Tree::Scalar(number_scalar(&n)),
        Value::String(s) => Tree::from(s),
        Value::Sequence(items) => Tree::sequence(
            items
                .into_iter()
                .map(|item| from_yaml(item, origin))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut mapping = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let key = key_string(key, origin)?;
                if mapping.contains_key(&key) {
                    return Err(ParseError::new(
                        origin,
                        format!("duplicate key `{}` after key stringification", key),
                    ));
                }
                mapping.insert(key, from_yaml(value, origin)?);
            }
            Tree::from(mapping)
        }
        Value::Tagged(tagged) => from_yaml(tagged.value, origin)?,
    };
    Ok(tree)
}

fn number_scalar(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::UInt(u)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn key_string(key: Value, origin: &str) -> Result<String, ParseError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => key_string(tagged.value, origin),
        Value::Sequence(_) | Value::Mapping(_) => Err(ParseError::new(
            origin,
            "mapping keys must be scalars",
        )),
    }
}

/// Serialize a tree in the requested format; output ends with a newline.
///
/// YAML output single-quotes strings such as `yes` and `off` that a YAML
/// 1.1 reader would take for booleans. JSON has no NaN or infinity, so a
/// tree holding a non-finite float is a `SerializationError::NonFinite`.
pub fn emit_document(tree: &Tree, format: Format) -> Result<String, SerializationError> {
    match format {
        Format::Yaml => emit_yaml(tree),
        Format::Json => {
            if let Some((path, value)) = find_non_finite(tree, None) {
                return Err(SerializationError::NonFinite { path, value });
            }
            let mut text = serde_json::to_string_pretty(tree)?;
            text.push('\n');
            Ok(text)
        }
    }
}

fn is_yaml11_bool(s: &str) -> bool {
    YAML11_BOOLS.contains(&s)
}

fn has_yaml11_bool(tree: &Tree) -> bool {
    match tree {
        Tree::Mapping(mapping) => mapping
            .iter()
            .any(|(key, value)| is_yaml11_bool(key) || has_yaml11_bool(value)),
        Tree::Sequence(items) => items.iter().any(has_yaml11_bool),
        Tree::Scalar(Scalar::Str(s)) => is_yaml11_bool(s),
        Tree::Scalar(_) | Tree::Null => false,
    }
}

/// serde_yaml only quotes strings that YAML 1.2 would misread. Strings
/// YAML 1.1 misreads are wrapped in a marker absent from the plain output,
/// emitted, and the marked scalars rewritten as single-quoted ones.
fn emit_yaml(tree: &Tree) -> Result<String, SerializationError> {
    let plain = serde_yaml::to_string(tree)?;
    if !has_yaml11_bool(tree) {
        return Ok(plain);
    }

    let marker = (0u32..)
        .map(|n| format!("__quoted{}__", n))
        .find(|marker| !plain.contains(marker.as_str()))
        .unwrap_or_default();

    let mut text = serde_yaml::to_string(&mark_yaml11_bools(tree, &marker))?;
    for word in YAML11_BOOLS {
        text = text.replace(&format!("{0}{1}{0}", marker, word), &format!("'{}'", word));
    }
    Ok(text)
}

fn mark(s: &str, marker: &str) -> String {
    if is_yaml11_bool(s) {
        format!("{0}{1}{0}", marker, s)
    } else {
        s.to_string()
    }
}

fn mark_yaml11_bools(tree: &Tree, marker: &str) -> Tree {
    match tree {
        Tree::Mapping(mapping) => Tree::from(
            mapping
                .iter()
                .map(|(key, value)| (mark(key, marker), mark_yaml11_bools(value, marker)))
                .collect::<Mapping>(),
        ),
        Tree::Sequence(items) => Tree::sequence(
            items
                .iter()
                .map(|item| mark_yaml11_bools(item, marker))
                .collect(),
        ),
        Tree::Scalar(Scalar::Str(s)) => Tree::from(mark(s, marker)),
        other => other.clone(),
    }
}

fn find_non_finite(tree: &Tree, path: Option<&str>) -> Option<(String, f64)> {
    let child = |segment: &str| match path {
        Some(path) => format!("{}.{}", path, segment),
        None => segment.to_string(),
    };
    match tree {
        Tree::Mapping(mapping) => mapping
            .iter()
            .find_map(|(key, value)| find_non_finite(value, Some(&child(key)))),
        Tree::Sequence(items) => items
            .iter()
            .enumerate()
            .find_map(|(index, item)| find_non_finite(item, Some(&child(&index.to_string())))),
        Tree::Scalar(Scalar::Float(x)) if !x.is_finite() => {
            Some((path.unwrap_or(".").to_string(), *x))
        }
        Tree::Scalar(_) | Tree::Null => None,
    }
}
