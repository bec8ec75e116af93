//! Writes into the customers, repair_orders and payments tables

use anyhow::{Context, Result};
use sqlx::SqliteConnection;

use crate::import::types::{Customer, Payment, RepairOrder, TransformedRow};

/// Look up a customer by the `(name, phone)` dedup key
pub async fn find_customer_id(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &str,
) -> Result<Option<String>> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT id FROM customers WHERE name = ? AND phone = ?")
            .bind(name)
            .bind(phone)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to look up customer")?;

    Ok(row.map(|(id,)| id))
}

pub async fn insert_customer(conn: &mut SqliteConnection, customer: &Customer) -> Result<()> {
    sqlx::query(
        "INSERT INTO customers (id, name, phone, address, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&customer.id)
    .bind(&customer.name)
    .bind(&customer.phone)
    .bind(&customer.address)
    .bind(&customer.created_at)
    .execute(&mut *conn)
    .await
    .context("Failed to insert customer")?;

    Ok(())
}

/// Insert a repair order. `customer_id` is passed separately because the
/// dedup lookup may have replaced the freshly generated one.
pub async fn insert_order(
    conn: &mut SqliteConnection,
    order: &RepairOrder,
    customer_id: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO repair_orders
         (id, serial_code, customer_id, dealer_id, device_owner_name,
          laptop_type, problem_description, total_cost, paid_amount,
          status, created_at, completed_at, delivered_at, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(&order.serial_code)
    .bind(customer_id)
    .bind(&order.dealer_id)
    .bind(&order.device_owner_name)
    .bind(&order.laptop_type)
    .bind(&order.problem_description)
    .bind(order.total_cost)
    .bind(order.paid_amount)
    .bind(order.status.as_str())
    .bind(&order.created_at)
    .bind(&order.completed_at)
    .bind(&order.delivered_at)
    .bind(&order.notes)
    .execute(&mut *conn)
    .await
    .context("Failed to insert repair order")?;

    Ok(())
}

pub async fn insert_payment(conn: &mut SqliteConnection, payment: &Payment) -> Result<()> {
    sqlx::query(
        "INSERT INTO payments (id, order_id, amount, payment_date, notes)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&payment.id)
    .bind(&payment.order_id)
    .bind(payment.amount)
    .bind(&payment.payment_date)
    .bind(&payment.notes)
    .execute(&mut *conn)
    .await
    .context("Failed to insert payment")?;

    Ok(())
}

/// Write one transformed row: reuse the existing customer for the
/// `(name, phone)` pair or insert the fresh one, then the order, then the
/// payment when present. Orders are never deduplicated; re-importing the
/// same sheet duplicates them.
pub async fn write_row(conn: &mut SqliteConnection, row: &TransformedRow) -> Result<()> {
    let customer_id = match find_customer_id(conn, &row.customer.name, &row.customer.phone).await? {
        Some(existing) => existing,
        None => {
            insert_customer(conn, &row.customer).await?;
            row.customer.id.clone()
        }
    };

    insert_order(conn, &row.order, &customer_id).await?;

    if let Some(payment) = &row.payment {
        insert_payment(conn, payment).await?;
    }

    Ok(())
}
