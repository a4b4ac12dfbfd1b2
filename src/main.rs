//! Chart Overrides CLI
//!
//! Entry point for the `chart-overrides` command-line tool.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};

use chart_overrides::apply::apply_files;
use chart_overrides::logging::{self, filter_for};
use chart_overrides::output::{render, write_document, Destination, WriteOutcome};
use chart_overrides::provider::{DefaultsProvider, FileProvider, HelmProvider, RepoSetup};
use chart_overrides::{extract, Config, Error, ExtractOptions, Format, SerializationError};

#[derive(Parser)]
#[command(name = "chart-overrides")]
#[command(about = "Keep only the Helm values that differ from chart defaults", version)]
struct Cli {
    /// Path to config file (default: ~/.config/chart-overrides/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Helm executable name or path
    #[arg(long, global = true, value_name = "PATH")]
    helm: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the values a local file overrides relative to chart defaults
    Extract {
        /// Path to the local values file
        local_values: PathBuf,

        /// Chart repository name (or name=url with --add-repo)
        #[arg(long, required_unless_present = "defaults_file")]
        repo: Option<String>,

        /// Chart name (e.g. prometheus)
        #[arg(long, required_unless_present = "defaults_file")]
        chart: Option<String>,

        /// Chart version
        #[arg(long = "version", value_name = "VERSION", required_unless_present = "defaults_file")]
        chart_version: Option<String>,

        /// Read defaults from a file instead of running helm
        #[arg(long, value_name = "PATH", conflicts_with_all = ["add_repo", "update_repo"])]
        defaults_file: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Run `helm repo add` first; --repo must be name=url
        #[arg(long)]
        add_repo: bool,

        /// Run `helm repo update` first
        #[arg(long)]
        update_repo: bool,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Omit the provenance header
        #[arg(long)]
        no_header: bool,

        /// Print a JSON summary to stdout
        #[arg(long, requires = "output")]
        json: bool,
    },

    /// Layer override files onto a defaults file and print the result
    Merge {
        /// Path to the defaults file
        defaults: PathBuf,

        /// Override files, applied in order
        #[arg(required = true)]
        overrides: Vec<PathBuf>,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
}

fn main() {
    let cli = Cli::parse();

    let (mut config, config_path) = match Config::resolve(cli.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    if let Some(helm) = cli.helm {
        config.helm.executable = helm;
    }

    let filter = filter_for(cli.verbose, cli.quiet, &config.log.filter);
    logging::init(config.log.format, &filter);
    if let Some(path) = &config_path {
        debug!(path = %path.display(), "loaded config");
    }

    let result = match cli.command {
        Commands::Extract {
            local_values,
            repo,
            chart,
            chart_version,
            defaults_file,
            output,
            add_repo,
            update_repo,
            format,
            no_header,
            json,
        } => {
            if let Some(format) = format {
                config.output.format = format;
            }
            if no_header {
                config.output.header = false;
            }
            let chart = ChartArgs {
                repo: repo.unwrap_or_default(),
                chart: chart.unwrap_or_default(),
                version: chart_version.unwrap_or_default(),
                setup: RepoSetup {
                    add_repo,
                    update_repos: update_repo,
                },
            };
            run_extract(&config, &local_values, chart, defaults_file, output, json)
        }
        Commands::Merge {
            defaults,
            overrides,
            output,
            format,
        } => run_merge(&defaults, &overrides, output, format.unwrap_or(config.output.format)),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

struct ChartArgs {
    repo: String,
    chart: String,
    version: String,
    setup: RepoSetup,
}

fn run_extract(
    config: &Config,
    local_values: &Path,
    chart: ChartArgs,
    defaults_file: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), Error> {
    let (provider, package_ref): (Box<dyn DefaultsProvider>, String) = match defaults_file {
        Some(path) => {
            let package_ref = if chart.repo.is_empty() {
                chart.chart
            } else {
                format!("{}/{}", chart.repo, chart.chart)
            };
            (Box::new(FileProvider::new(path)), package_ref)
        }
        None => {
            let helm = HelmProvider::new(config.helm.executable.clone());
            let chart_ref = helm.prepare(&chart.repo, &chart.chart, chart.setup)?;
            (Box::new(helm), chart_ref.to_string())
        }
    };

    let options = ExtractOptions {
        format: config.output.format,
        header: config.output.header,
    };
    let extraction = extract(local_values, &package_ref, &chart.version, provider.as_ref(), options)?;

    let destination = Destination::from_option(output);
    let outcome = write_document(
        extraction.document.as_deref(),
        &destination,
        config.output.write_empty,
    )?;

    if outcome == WriteOutcome::Written {
        for path in extraction.overridden_paths() {
            info!(%path, "override");
        }
    }

    if json {
        let report = extraction.report(destination.path());
        let text = report.to_json().map_err(SerializationError::from)?;
        println!("{}", text);
    }

    Ok(())
}

fn run_merge(
    defaults: &Path,
    overrides: &[PathBuf],
    output: Option<PathBuf>,
    format: Format,
) -> Result<(), Error> {
    let merged = apply_files(defaults, overrides)?;
    let text = render(&merged, format, None)?;
    Destination::from_option(output).write(&text)
}
