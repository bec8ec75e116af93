//! Command-line interface

pub mod handler;

use std::path::PathBuf;

use clap::Parser;

/// Import legacy repair-shop spreadsheets into the shop's SQLite database
#[derive(Debug, Parser)]
#[command(name = "repair-import", version, about)]
pub struct Cli {
    /// Path to the source .xlsx workbook
    pub source: PathBuf,

    /// Path to the existing shop database
    pub database: PathBuf,

    /// Worksheet to import (defaults to the first sheet in the workbook)
    #[arg(long)]
    pub sheet: Option<String>,

    /// TOML file overriding the source column labels
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Commit once after all rows instead of per row (legacy behavior; a
    /// failed row may leave its customer insert behind)
    #[arg(long)]
    pub single_transaction: bool,
}
