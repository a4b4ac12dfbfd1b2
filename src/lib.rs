//! Chart Overrides - keep only the values you changed
//!
//! Compares a local Helm values file with the chart's default values and
//! produces the minimal override document that, layered onto the defaults,
//! reproduces the local file. The comparison engine lives in
//! `overrides_core`; this crate supplies the codec, the defaults providers,
//! provenance output, configuration and logging around it.

pub mod apply;
pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod output;
pub mod provider;

pub use codec::{emit_document, parse_document, Format, ParseError, SerializationError};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use extract::{extract, ExtractOptions, ExtractReport, Extraction};
pub use output::{Destination, Provenance, WriteOutcome};
pub use overrides_core::{apply_overrides, extract_overrides, Kind, Mapping, Scalar, Tree};
pub use provider::{DefaultsProvider, FileProvider, HelmProvider, ProviderError, StaticProvider};
