//! Leafcoco: PlantVillage grape leaf dataset migration and COCO export.
//!
//! Two pipelines share one normalized on-disk layout:
//!
//! - [`migrate`] turns the legacy per-disease directories into
//!   `{category}/{subcategory}/{images,json,csv,sets}` with a label map and
//!   per-subcategory split manifests.
//! - [`export`] reads that tree and writes one COCO instances document per
//!   split, synthesizing whole-image boxes where no box data exists.
//!
//! # Modules
//!
//! - [`ir`]: in-memory model, directory layout and file codecs
//! - [`taxonomy`]: the fixed subcategory table and legacy names
//! - [`error`]: error types for leafcoco operations

pub mod error;
pub mod export;
pub mod ir;
pub mod logging;
pub mod migrate;
pub mod taxonomy;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

pub use error::LeafcocoError;

/// The leafcoco CLI application.
#[derive(Parser)]
#[command(name = "leafcoco")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Reorganize the legacy layout into the normalized tree.
    Migrate(MigrateArgs),
    /// Write one COCO instances document per split.
    Export(ExportArgs),
}

#[derive(clap::Args)]
struct MigrateArgs {
    /// Directory holding the legacy `Grape___*` directories and `all/`.
    #[arg(long, env = "LEAFCOCO_ROOT")]
    root: PathBuf,

    /// Directory to create `<category>/` under (defaults to --root).
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, default_value = "grapes")]
    category: String,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Directory containing the normalized `<category>/` tree.
    #[arg(long, env = "LEAFCOCO_ROOT")]
    root: PathBuf,

    /// Directory for the export documents (defaults to <root>/annotations).
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, default_value = "grapes")]
    category: String,

    /// Splits to export, one document each.
    #[arg(
        long,
        value_enum,
        num_args = 1..,
        default_values_t = [SplitArg::Train, SplitArg::Val, SplitArg::Test]
    )]
    splits: Vec<SplitArg>,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SplitArg {
    Train,
    Val,
    Test,
    All,
}

impl SplitArg {
    fn as_str(self) -> &'static str {
        match self {
            SplitArg::Train => "train",
            SplitArg::Val => "val",
            SplitArg::Test => "test",
            SplitArg::All => taxonomy::ALL_SPLIT,
        }
    }
}

/// Run the leafcoco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LeafcocoError> {
    let cli = Cli::parse();
    logging::init_logging();

    match cli.command {
        Commands::Migrate(args) => run_migrate(args),
        Commands::Export(args) => run_export(args),
    }
}

fn run_migrate(args: MigrateArgs) -> Result<(), LeafcocoError> {
    let options = migrate::MigrateOptions {
        output_root: args.out.unwrap_or_else(|| args.root.clone()),
        legacy_root: args.root,
        category: args.category,
    };

    let report = migrate::migrate(&options)?;
    info!(
        images = report.total_images_copied(),
        csv = report.total_csv_written(),
        malformed_json = report.total_malformed_json(),
        "migration finished"
    );
    match args.output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", report);
            Ok(())
        }
    }
}

fn run_export(args: ExportArgs) -> Result<(), LeafcocoError> {
    let options = export::ExportOptions {
        output_dir: args.out.unwrap_or_else(|| args.root.join("annotations")),
        dataset_root: args.root,
        category: args.category,
        splits: args.splits.iter().map(|s| s.as_str().to_string()).collect(),
    };

    let reports = export::export(&options)?;
    info!(documents = reports.len(), "export finished");

    match args.output {
        OutputFormat::Json => print_json(&reports),
        OutputFormat::Text => {
            for report in &reports {
                print!("{}", report);
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(report: &T) -> Result<(), LeafcocoError> {
    let json = serde_json::to_string_pretty(report).map_err(LeafcocoError::ReportRender)?;
    println!("{}", json);
    Ok(())
}
