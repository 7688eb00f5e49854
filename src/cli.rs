/*!
chartbind Command Line Interface

Applies binding edits, chart type changes, axis swaps and style toggles to a
JSON chart document and writes the transformed document back out.
*/

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartbind::{
    apply_axis_swap, apply_binding_edit, apply_style_mode_toggle, apply_type_change,
    ChartBinding, ChartDescriptor, ChartType, DefaultCatalog, EditContext, EditOrigin,
    EngineConfig, KeywordGeoLookup, TypeChange, VERSION,
};

#[derive(Parser)]
#[command(name = "chartbind")]
#[command(about = "Rule engine keeping chart bindings consistent across edits")]
#[command(version = VERSION)]
pub struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output file path (defaults to stdout)
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-normalize a binding after a field edit
    Normalize {
        /// Chart document (JSON)
        file: PathBuf,

        /// The edit came from a legend, so aesthetic settings win
        #[arg(long)]
        legend: bool,
    },

    /// Change the chart type
    ChangeType {
        /// Chart document (JSON)
        file: PathBuf,

        /// Target chart type
        #[arg(long)]
        to: ChartType,

        /// Change only this series (full name, multi-style only)
        #[arg(long)]
        series: Option<String>,

        /// Multi-style flag after the change (keeps the current mode when omitted)
        #[arg(long)]
        multi_style: Option<bool>,

        /// Run the transition even if the type is unchanged
        #[arg(long)]
        forced: bool,
    },

    /// Swap the X and Y axes
    Swap {
        /// Chart document (JSON)
        file: PathBuf,
    },

    /// Set separated and multi-style rendering
    Style {
        /// Chart document (JSON)
        file: PathBuf,

        /// One axis per measure
        #[arg(long)]
        separated: bool,

        /// Per-series chart types and aesthetics
        #[arg(long)]
        multi_style: bool,
    },
}

/// A binding together with its descriptors
#[derive(Debug, Serialize, Deserialize)]
struct ChartDocument {
    binding: ChartBinding,
    #[serde(default)]
    descriptor: ChartDescriptor,
}

fn read_document(path: &Path) -> anyhow::Result<ChartDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse chart document {}", path.display()))?;
    Ok(document)
}

fn write_document(document: &ChartDocument, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!(path = %path.display(), "document written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays a clean JSON document
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Invalid configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let file = match &cli.command {
        Commands::Normalize { file, .. }
        | Commands::ChangeType { file, .. }
        | Commands::Swap { file }
        | Commands::Style { file, .. } => file.clone(),
    };
    let mut document = read_document(&file)?;

    let geo = KeywordGeoLookup::default();
    let mut warnings: Vec<String> = Vec::new();
    {
        let mut ctx = EditContext::new(config, &DefaultCatalog, &geo, &mut warnings);
        let ChartDocument {
            binding,
            descriptor,
        } = &mut document;

        match cli.command {
            Commands::Normalize { legend, .. } => {
                if legend {
                    ctx.origin = EditOrigin::Legend;
                }
                apply_binding_edit(binding, &mut ctx);
            }

            Commands::ChangeType {
                to,
                series,
                multi_style,
                forced,
                ..
            } => {
                let mut change = TypeChange::to(to);
                if let Some(multi_style) = multi_style {
                    change = change.multi_style(multi_style);
                }
                if let Some(series) = series {
                    change = change.for_series(series);
                }
                if forced {
                    change = change.forced();
                }
                apply_type_change(binding, descriptor, &change, &mut ctx)?;
            }

            Commands::Swap { .. } => {
                apply_axis_swap(binding, descriptor);
            }

            Commands::Style {
                separated,
                multi_style,
                ..
            } => {
                apply_style_mode_toggle(binding, descriptor, separated, multi_style, &mut ctx);
            }
        }
    }

    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }

    write_document(&document, cli.output.as_deref())
}
