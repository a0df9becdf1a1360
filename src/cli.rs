use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::views::RowFilterPolicy;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "carver",
    about = "CARVER risk register - score assets, map them on a 5×5 heatmap and export reports",
    version
)]
pub struct Args {
    /// Directory holding the persisted register and role
    #[arg(long, default_value = ".carver", global = true)]
    pub state_dir: PathBuf,

    /// Whether the selected role also filters rows by asset type
    #[arg(long, value_enum, default_value = "columns-only", global = true)]
    pub row_filter: RowFilterPolicy,

    /// Enable verbose logging of all operations
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the register table for the current role
    Show {
        /// Case-insensitive text filter over name, type, country, location and notes
        #[arg(short, long, default_value = "")]
        search: String,

        /// Column to sort by (name, type, C, A, ..., L, I, score)
        #[arg(long, default_value = "score")]
        sort: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },

    /// Print the 5×5 Likelihood × Impact heatmap
    Heatmap,

    /// Write the Markdown risk report
    Report {
        /// Output path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the register with derived metrics
    Export {
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output path (defaults to carver_report.csv / carver_report.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the register with a CSV or JSON file
    Import {
        file: PathBuf,
    },

    /// Add a blank asset with all ratings at 3
    Add,

    /// Edit one field of an asset
    Edit {
        id: String,
        /// Field name or CARVER code (name, type, country, location, notes, C, A, R, V, E, Rz)
        field: String,
        value: String,
    },

    /// Delete an asset
    Remove {
        id: String,
    },

    /// Replace the register with the sample dataset
    Reset,

    /// Select the role view (All, Ops, Sec, Comms)
    Role {
        role: String,
    },

    /// Run the built-in scoring and export checks
    SelfTest,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ExportFormat {
    /// Delimited text with derived L, I and score columns
    Csv,
    /// Pretty-printed JSON array including derived fields
    Json,
}

impl ExportFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "carver_report.csv",
            ExportFormat::Json => "carver_report.json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Json => write!(f, "JSON"),
        }
    }
}
