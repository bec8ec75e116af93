//! Import command handler

use anyhow::Result;
use colored::Colorize;

use super::Cli;
use crate::db;
use crate::import::{self, ColumnMap, CommitPolicy};

/// Run one import: load the worksheet, open the database, push every row
/// through the pipeline, print the summary.
pub async fn handle_import(cli: Cli) -> Result<()> {
    println!("Starting Excel import...");
    println!("Workbook: {}", cli.source.display());
    println!("Database: {}", cli.database.display());
    println!("{}", "-".repeat(50));

    let columns = match &cli.mapping {
        Some(path) => ColumnMap::from_toml_file(path)?,
        None => ColumnMap::default(),
    };

    let sheet = import::read_sheet(&cli.source, cli.sheet.as_deref())?;
    println!(
        "{} Loaded {} rows from {}",
        "✓".green(),
        sheet.rows.len(),
        cli.source.display()
    );

    let pool = db::connect(&cli.database).await?;
    println!(
        "{} Connected to database: {}",
        "✓".green(),
        cli.database.display()
    );

    let policy = if cli.single_transaction {
        CommitPolicy::WholeRun
    } else {
        CommitPolicy::PerRow
    };

    let report = import::run_import(&pool, &sheet, &columns, policy).await?;
    pool.close().await;

    report.print_summary();
    Ok(())
}
