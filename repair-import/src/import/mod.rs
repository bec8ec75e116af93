//! Excel to shop-database import pipeline
//!
//! One linear pass: the worksheet is materialized up front, each data row is
//! transformed into a customer, a repair order and an optional opening
//! payment, and the entities are written to the shop database. Row-level
//! failures are counted and skipped; the run only aborts on a fatal source
//! or destination error.

pub mod columns;
pub mod excel;
pub mod report;
pub mod serial;
pub mod transform;
pub mod types;

pub use columns::ColumnMap;
pub use excel::{Sheet, read_sheet};
pub use report::ImportReport;
pub use transform::transform_row;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::db::repository::write_row;
use types::TransformedRow;

/// Commit boundary for the write stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Each row's writes commit or roll back as their own transaction, so a
    /// failed row cannot leave a customer behind without its order
    PerRow,
    /// One transaction spans the whole run, committed after the last row.
    /// Legacy behavior: a failed row's earlier writes stay in the run
    /// transaction and are committed with everything else.
    WholeRun,
}

/// Run the pipeline over a materialized sheet and return the outcome
/// counters. Prints one console line per imported or failed row; failures
/// are reported with the 1-based data row index and the loop continues.
pub async fn run_import(
    pool: &SqlitePool,
    sheet: &Sheet,
    columns: &ColumnMap,
    policy: CommitPolicy,
) -> Result<ImportReport> {
    let cols = columns.resolve(&sheet.header);
    let mut report = ImportReport::default();

    let mut run_tx = match policy {
        CommitPolicy::WholeRun => Some(
            pool.begin()
                .await
                .context("Failed to begin import transaction")?,
        ),
        CommitPolicy::PerRow => None,
    };

    for (idx, cells) in sheet.rows.iter().enumerate() {
        let row_number = idx + 1;
        let now = Local::now().naive_local();

        let record = match transform_row(cells, &cols, now) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                report.record_error();
                log::warn!("row {}: {:#}", row_number, e);
                println!("{} Error importing row {}: {:#}", "✗".red(), row_number, e);
                continue;
            }
        };

        let written = match run_tx.as_mut() {
            Some(tx) => write_row(&mut **tx, &record).await,
            None => write_row_atomic(pool, &record).await,
        };

        match written {
            Ok(()) => {
                report.record_success();
                println!(
                    "{} Imported: {} - {}",
                    "✓".green(),
                    record.customer.name,
                    record.order.laptop_type
                );
            }
            Err(e) => {
                report.record_error();
                log::warn!("row {}: {:#}", row_number, e);
                println!("{} Error importing row {}: {:#}", "✗".red(), row_number, e);
            }
        }
    }

    if let Some(tx) = run_tx {
        tx.commit()
            .await
            .context("Failed to commit import transaction")?;
    }

    Ok(report)
}

/// Wrap one row's writes in their own transaction
async fn write_row_atomic(pool: &SqlitePool, record: &TransformedRow) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin row transaction")?;

    match write_row(&mut tx, record).await {
        Ok(()) => tx.commit().await.context("Failed to commit row"),
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                log::warn!("row rollback failed: {}", rollback);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool_with_tables(ddl: &[&str]) -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        for stmt in ddl {
            sqlx::query(stmt).execute(&pool).await.unwrap();
        }
        pool
    }

    const CUSTOMERS_DDL: &str = "CREATE TABLE customers (
        id TEXT PRIMARY KEY, name TEXT, phone TEXT, address TEXT, created_at TEXT)";
    const ORDERS_DDL: &str = "CREATE TABLE repair_orders (
        id TEXT PRIMARY KEY, serial_code TEXT, customer_id TEXT, dealer_id TEXT,
        device_owner_name TEXT, laptop_type TEXT, problem_description TEXT,
        total_cost REAL, paid_amount REAL, status TEXT, created_at TEXT,
        completed_at TEXT, delivered_at TEXT, notes TEXT)";
    const PAYMENTS_DDL: &str = "CREATE TABLE payments (
        id TEXT PRIMARY KEY, order_id TEXT, amount REAL, payment_date TEXT, notes TEXT)";

    fn sheet(rows: Vec<Vec<Data>>) -> Sheet {
        let map = ColumnMap::default();
        Sheet {
            header: vec![
                map.customer,
                map.phone,
                map.model,
                map.problem,
                map.cost,
                map.remaining,
                map.delivery,
                map.date,
            ],
            rows,
        }
    }

    fn data_row(name: &str, phone: &str, cost: f64, remaining: f64) -> Vec<Data> {
        vec![
            if name.is_empty() {
                Data::Empty
            } else {
                Data::String(name.to_string())
            },
            Data::String(phone.to_string()),
            Data::String("ThinkPad T480".to_string()),
            Data::String("لا يعمل".to_string()),
            Data::Float(cost),
            Data::Float(remaining),
            Data::Empty,
            Data::String("2023-06-10".to_string()),
        ]
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn test_end_to_end_three_row_sheet() {
        let pool = pool_with_tables(&[CUSTOMERS_DDL, ORDERS_DDL, PAYMENTS_DDL]).await;
        let sheet = sheet(vec![
            data_row("أحمد", "0100", 300.0, 100.0),
            data_row("", "0999", 50.0, 0.0),
            data_row("أحمد", "0100", 120.0, 120.0),
        ]);

        let report = run_import(&pool, &sheet, &ColumnMap::default(), CommitPolicy::PerRow)
            .await
            .unwrap();

        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 0);
        assert_eq!(count(&pool, "customers").await, 1);
        assert_eq!(count(&pool, "repair_orders").await, 2);
        // only row 1 has a positive paid amount
        assert_eq!(count(&pool, "payments").await, 1);
    }

    #[tokio::test]
    async fn test_row_error_counts_and_continues() {
        let pool = pool_with_tables(&[CUSTOMERS_DDL, ORDERS_DDL, PAYMENTS_DDL]).await;
        let mut bad = data_row("منى", "0122", 0.0, 0.0);
        bad[4] = Data::String("free".to_string());
        let sheet = sheet(vec![bad, data_row("أحمد", "0100", 100.0, 0.0)]);

        let report = run_import(&pool, &sheet, &ColumnMap::default(), CommitPolicy::PerRow)
            .await
            .unwrap();

        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(count(&pool, "repair_orders").await, 1);
    }

    #[tokio::test]
    async fn test_per_row_policy_rolls_back_failed_row() {
        // no repair_orders table: the order insert fails after the customer
        // insert succeeded within the same row
        let pool = pool_with_tables(&[CUSTOMERS_DDL, PAYMENTS_DDL]).await;
        let sheet = sheet(vec![data_row("أحمد", "0100", 100.0, 0.0)]);

        let report = run_import(&pool, &sheet, &ColumnMap::default(), CommitPolicy::PerRow)
            .await
            .unwrap();

        assert_eq!(report.success_count, 0);
        assert_eq!(report.error_count, 1);
        assert_eq!(count(&pool, "customers").await, 0);
    }

    #[tokio::test]
    async fn test_whole_run_policy_keeps_partial_row_writes() {
        let pool = pool_with_tables(&[CUSTOMERS_DDL, PAYMENTS_DDL]).await;
        let sheet = sheet(vec![data_row("أحمد", "0100", 100.0, 0.0)]);

        let report = run_import(&pool, &sheet, &ColumnMap::default(), CommitPolicy::WholeRun)
            .await
            .unwrap();

        assert_eq!(report.success_count, 0);
        assert_eq!(report.error_count, 1);
        // the legacy single-commit run keeps the dangling customer
        assert_eq!(count(&pool, "customers").await, 1);
    }

    #[tokio::test]
    async fn test_reimport_duplicates_orders() {
        let pool = pool_with_tables(&[CUSTOMERS_DDL, ORDERS_DDL, PAYMENTS_DDL]).await;
        let sheet = sheet(vec![data_row("أحمد", "0100", 100.0, 0.0)]);
        let map = ColumnMap::default();

        run_import(&pool, &sheet, &map, CommitPolicy::PerRow).await.unwrap();
        run_import(&pool, &sheet, &map, CommitPolicy::PerRow).await.unwrap();

        assert_eq!(count(&pool, "customers").await, 1);
        assert_eq!(count(&pool, "repair_orders").await, 2);
    }
}
