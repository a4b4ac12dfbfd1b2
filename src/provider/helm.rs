//! Helm-backed defaults provider
//!
//! Runs the `helm` executable to fetch a chart's default values, and
//! optionally registers and refreshes repositories first.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use overrides_core::Tree;
use tracing::{debug, info, warn};

use super::{DefaultsProvider, ProviderError};
use crate::codec::parse_document;

/// Default helm executable name
pub const DEFAULT_HELM: &str = "helm";

/// A chart within a repository, rendered as `repo/chart`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRef {
    pub repo: String,
    pub chart: String,
}

impl ChartRef {
    pub fn new(repo: impl Into<String>, chart: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            chart: chart.into(),
        }
    }
}

impl fmt::Display for ChartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repo, self.chart)
    }
}

/// A repository given as `name=url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub name: String,
    pub url: String,
}

impl RepoSpec {
    /// Parse `name=url`; `None` when either side is missing
    pub fn parse(input: &str) -> Option<Self> {
        let (name, url) = input.split_once('=')?;
        if name.is_empty() || url.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            url: url.to_string(),
        })
    }
}

/// Repository preparation requested before fetching values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoSetup {
    /// Run `helm repo add` when the repo argument is `name=url`
    pub add_repo: bool,
    /// Run `helm repo update`
    pub update_repos: bool,
}

/// Fetches chart defaults through the helm CLI
#[derive(Debug, Clone)]
pub struct HelmProvider {
    executable: String,
}

impl Default for HelmProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HELM)
    }
}

impl HelmProvider {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Resolve the chart reference, adding and updating repos as requested.
    ///
    /// With `add_repo`, a `name=url` repo is registered and the chart is
    /// addressed as `name/chart`. Any other repo argument is used as given.
    pub fn prepare(&self, repo: &str, chart: &str, setup: RepoSetup) -> Result<ChartRef, ProviderError> {
        let mut chart_ref = ChartRef::new(repo, chart);

        if setup.add_repo {
            match RepoSpec::parse(repo) {
                Some(spec) => {
                    info!(name = %spec.name, url = %spec.url, "adding helm repository");
                    self.add_repo(&spec)?;
                    chart_ref = ChartRef::new(spec.name, chart);
                    info!(chart = %chart_ref, "using chart reference");
                }
                None => {
                    warn!(
                        repo,
                        "--add-repo given but repo is not in 'name=url' format; using it as an existing repo name"
                    );
                }
            }
        }

        if setup.update_repos {
            info!("updating helm repositories");
            self.update_repos()?;
        }

        Ok(chart_ref)
    }

    pub fn add_repo(&self, spec: &RepoSpec) -> Result<(), ProviderError> {
        self.run(&["repo", "add", &spec.name, &spec.url]).map(|_| ())
    }

    pub fn update_repos(&self) -> Result<(), ProviderError> {
        self.run(&["repo", "update"]).map(|_| ())
    }

    /// Raw output of `helm show values <chart> --version <version>`
    pub fn show_values(&self, chart_ref: &str, version: &str) -> Result<String, ProviderError> {
        self.run(&["show", "values", chart_ref, "--version", version])
    }

    fn resolve(&self) -> Result<PathBuf, ProviderError> {
        which::which(&self.executable).map_err(|_| ProviderError::ToolNotFound(self.executable.clone()))
    }

    fn run(&self, args: &[&str]) -> Result<String, ProviderError> {
        let program = self.resolve()?;
        let command = format!("{} {}", self.executable, args.join(" "));
        debug!(%command, program = %program.display(), "running helm");

        let output = Command::new(&program)
            .args(args)
            .output()
            .map_err(|source| ProviderError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(%command, bytes = output.stdout.len(), "helm command succeeded");
        String::from_utf8(output.stdout).map_err(|e| ProviderError::InvalidOutput {
            command,
            message: e.to_string(),
        })
    }
}

impl DefaultsProvider for HelmProvider {
    fn fetch_defaults(&self, package_ref: &str, version: &str) -> Result<Tree, ProviderError> {
        let text = self.show_values(package_ref, version)?;
        let origin = format!("defaults:{}", self.source_id(package_ref, version));
        Ok(parse_document(&text, &origin)?)
    }
}
