//! Command-line interface for the Ustorp site data tooling.
//!
//! This binary wraps the [`ustorp_core`] library: it reprojects habitat
//! surveys, inspects management plans, lists label positions and loads the
//! complete site map the way the web map does.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! It parses arguments, configures logging, and delegates to command handlers.
//!
//! # Available Commands
//!
//! - `reproject` - Reproject a SWEREF99 TM GeoJSON document to WGS84
//! - `plan` - Parse and display a management plan
//! - `labels` - List the label position and colour of every habitat feature
//! - `site` - Load all site documents and summarise or export the map data

mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use ustorp_core::config::SiteConfig;
use ustorp_core::error::IoErrorExt;
use ustorp_core::plan::parse_management_plan;
use ustorp_core::reproject::reproject_feature_collection;
use ustorp_core::site::{load_site, parse_feature_collection};
use ustorp_core::source::FsSource;

#[derive(Parser)]
#[command(
    name = "ustorp",
    version,
    about = "Site data tooling for the Ustorp restoration map",
    long_about = "Reprojects the habitat survey from SWEREF99 TM to WGS84, parses the\n\
                  per-area management plans and prepares the annotations shown on the map."
)]
/// Command-line arguments and options for the `ustorp` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `ustorp` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Reprojects a GeoJSON FeatureCollection from SWEREF99 TM to WGS84.
    Reproject {
        /// Path to the SWEREF99 TM GeoJSON document.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the WGS84 document; standard output if omitted.
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Parses a management plan export and displays its contents.
    Plan {
        /// Path to the plan CSV document.
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Print the plan as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Lists the label position and fill colour of every habitat feature.
    Labels {
        /// Path to the habitat GeoJSON document.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// The input is already in WGS84; skip reprojection.
        #[arg(long)]
        wgs84: bool,
    },

    /// Loads every site document and summarises the resulting map data.
    Site {
        /// Directory holding the site documents.
        #[arg(long, value_name = "DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Property-boundary document, relative to the data directory.
        #[arg(long, value_name = "PATH")]
        property_path: Option<String>,

        /// Habitat survey document, relative to the data directory.
        #[arg(long, value_name = "PATH")]
        habitat_path: Option<String>,

        /// Management plan path template; `{id}` is replaced by the Objektid.
        #[arg(long, value_name = "TEMPLATE")]
        plan_template: Option<String>,

        /// Initial map zoom level.
        #[arg(long)]
        zoom: Option<u8>,

        /// Write the map data as JSON to this file.
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

/// Entry point for the `ustorp` command-line interface.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system cannot be initialized.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Reproject { input, output } => {
            info!("Reprojecting {}", input.display());
            handle_reproject(&input, output.as_deref())?;
        },
        Commands::Plan { input, json } => {
            info!("Parsing management plan {}", input.display());
            handle_plan(&input, json)?;
        },
        Commands::Labels { input, wgs84 } => {
            info!("Computing label positions for {}", input.display());
            handle_labels(&input, wgs84)?;
        },
        Commands::Site {
            data_dir,
            property_path,
            habitat_path,
            plan_template,
            zoom,
            output,
        } => {
            let config = site_config(data_dir, property_path, habitat_path, plan_template, zoom)?;
            handle_site(&config, output.as_deref()).await?;
        },
    }

    Ok(())
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn write_output(path: Option<&Path>, format: &str, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents).with_write_context(format, path)?;
            info!("Wrote {}", path.display());
        },
        None => println!("{contents}"),
    }
    Ok(())
}

fn handle_reproject(input: &Path, output: Option<&Path>) -> Result<()> {
    let text = read_document(input)?;
    let collection = parse_feature_collection(&text, &input.display().to_string())
        .map_err(|e| anyhow!(e.user_message()))?;
    let count = collection.features.len();

    let reprojected = reproject_feature_collection(collection);
    write_output(output, "GeoJSON", &serde_json::to_string_pretty(&reprojected)?)?;

    info!("Reprojected {count} feature(s)");
    Ok(())
}

fn handle_plan(input: &Path, json: bool) -> Result<()> {
    let plan = parse_management_plan(&read_document(input)?);
    debug!("Parsed {} action(s)", plan.actions.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("{}", display::render_plan(&plan));
    }
    Ok(())
}

fn handle_labels(input: &Path, wgs84: bool) -> Result<()> {
    let text = read_document(input)?;
    let mut habitat = parse_feature_collection(&text, &input.display().to_string())
        .map_err(|e| anyhow!(e.user_message()))?;
    if !wgs84 {
        habitat = reproject_feature_collection(habitat);
    }

    println!("{}", display::render_labels(&habitat));
    Ok(())
}

/// Builds and validates the site configuration from command-line overrides.
fn site_config(
    data_dir: PathBuf,
    property_path: Option<String>,
    habitat_path: Option<String>,
    plan_template: Option<String>,
    zoom: Option<u8>,
) -> Result<SiteConfig> {
    let mut config = SiteConfig::with_data_dir(data_dir);
    if let Some(path) = property_path {
        config.property_path = path;
    }
    if let Some(path) = habitat_path {
        config.habitat_path = path;
    }
    if let Some(template) = plan_template {
        config.plan_path_template = template;
    }
    if let Some(zoom) = zoom {
        config.view.zoom = zoom;
    }

    config
        .validate()
        .map_err(|e| anyhow!("Configuration error: {e}"))?;
    Ok(config)
}

async fn handle_site(config: &SiteConfig, output: Option<&Path>) -> Result<()> {
    if !config.data_dir.is_dir() {
        return Err(anyhow!(
            "Data directory '{}' does not exist.",
            config.data_dir.display()
        ));
    }

    let source = FsSource::new(&config.data_dir);
    let site = load_site(&source, config).await;

    println!("{}", display::render_site(&site));
    if let Some(path) = output {
        write_output(Some(path), "JSON", &serde_json::to_string_pretty(&site)?)?;
    }
    Ok(())
}
