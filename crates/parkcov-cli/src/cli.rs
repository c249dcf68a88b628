//! CLI definition using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use parkcov_domain::service::{AgeSegment, DashboardSort};
use parkcov_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parkcov")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Parts-catalog coverage and quality-mix policy over a vehicle fleet")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Store directory override (catalog and annotations)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Where the product and fleet snapshot comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// Products CSV (Stmvid, Nivel 1, Nivel 2, Proveedor, ...)
    #[arg(long, requires = "fleet", conflicts_with = "rubro")]
    pub products: Option<PathBuf>,

    /// Fleet CSV (IDMODELO, MODELO, MARCA, HASTA, Clasificacion, ...)
    #[arg(long, requires = "products")]
    pub fleet: Option<PathBuf>,

    /// Read products for this dimension-1 value and the fleet from the catalog
    #[arg(long)]
    pub rubro: Option<String>,

    /// Drop products from this supplier code (repeatable). Adds to config.
    #[arg(long = "exclude-supplier", value_name = "CODE")]
    pub exclude_supplier: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DashboardOrder {
    /// Dimension-1 name ascending
    #[default]
    Name,
    /// Coverage percentage descending
    Percentage,
    /// Covered model count descending
    Covered,
}

impl From<DashboardOrder> for DashboardSort {
    fn from(order: DashboardOrder) -> Self {
        match order {
            DashboardOrder::Name => DashboardSort::Name,
            DashboardOrder::Percentage => DashboardSort::Percentage,
            DashboardOrder::Covered => DashboardSort::Covered,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Coverage pivot per brand and model, with summary statistics
    Coverage {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Only models in this priority category (AA, A, B, C)
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Only models of this brand
        #[arg(long, short = 'b')]
        brand: Option<String>,

        /// Do not split columns by dimension 1
        #[arg(long)]
        hide_dim1: bool,

        /// Do not split columns by dimension 2
        #[arg(long)]
        hide_dim2: bool,

        /// Write the coverage table to an Excel file
        #[arg(long, short = 'o')]
        export: Option<PathBuf>,
    },

    /// Fleet models with no product listed
    Uncovered {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Write the list to an Excel file
        #[arg(long, short = 'o')]
        export: Option<PathBuf>,
    },

    /// Global and per-tier coverage statistics
    Stats {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Quality-mix policy findings for the target category
    Policy {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Only findings in this age segment (vintage, modern, new)
        #[arg(long, short = 's')]
        segment: Option<AgeSegment>,

        /// Target priority category. Uses config value if not specified.
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Write the findings to an Excel file
        #[arg(long, short = 'o')]
        export: Option<PathBuf>,
    },

    /// Coverage of the stored fleet for every stored dimension-1 value
    Dashboard {
        /// Row order
        #[arg(long, value_enum, default_value_t = DashboardOrder::Name)]
        sort: DashboardOrder,
    },

    /// Upsert fleet models from a CSV into the catalog
    ImportFleet {
        /// Path to fleet CSV
        file: PathBuf,
    },

    /// Replace catalog products for every dimension-1 value in a CSV
    ImportProducts {
        /// Path to products CSV
        file: PathBuf,
    },

    /// List dimension-1 values stored in the catalog
    Rubros,

    /// Manage model annotations
    Note {
        #[command(subcommand)]
        action: NoteCommand,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Split pivot columns by dimension 1
        #[arg(long)]
        set_show_dim1: Option<bool>,

        /// Split pivot columns by dimension 2
        #[arg(long)]
        set_show_dim2: Option<bool>,

        /// Excluded supplier codes, comma separated (empty clears)
        #[arg(long, value_delimiter = ',')]
        set_excluded_suppliers: Option<Vec<String>>,

        /// Set policy target category
        #[arg(long)]
        set_policy_category: Option<String>,

        /// Annotation teams, comma separated
        #[arg(long, value_delimiter = ',')]
        set_teams: Option<Vec<String>>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Save a note for a model (blank text removes it)
    Set {
        /// Model name as shown in the coverage table
        model: String,

        /// Note text
        text: String,

        /// Owning team (one of the configured teams)
        #[arg(long, short = 't')]
        team: String,
    },

    /// Remove a model's note
    Remove {
        /// Model name
        model: String,
    },

    /// List all notes
    List,

    /// Write all notes to an Excel task report
    Export {
        /// Output Excel file path
        #[arg(long, short = 'o', default_value = "model_tasks.xlsx")]
        output: PathBuf,
    },
}
