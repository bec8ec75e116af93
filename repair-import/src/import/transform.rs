//! Row transformation: raw worksheet cells into database entities

use anyhow::{Context, Result};
use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::columns::{
    ColumnIndices, DELIVERED_MARKER, MISSING_TEXT, PAYMENT_NOTE, PHONE_PLACEHOLDER,
};
use super::excel::{cell_to_datetime, cell_to_f64, cell_to_string};
use super::serial::generate_serial_code;
use super::types::{Customer, OrderStatus, Payment, RepairOrder, TransformedRow};

/// Timestamp format used across the destination schema
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

static EMPTY_CELL: Data = Data::Empty;

fn cell<'a>(cells: &'a [Data], idx: Option<usize>) -> &'a Data {
    idx.and_then(|i| cells.get(i)).unwrap_or(&EMPTY_CELL)
}

/// Transform one data row. `Ok(None)` means the row is silently skipped
/// (blank customer name); an `Err` is a row-level failure the caller counts
/// and moves past. `now` is the import-time clock, used for the serial code
/// and as the fallback when the intake date is blank or unparsable.
pub fn transform_row(
    cells: &[Data],
    cols: &ColumnIndices,
    now: NaiveDateTime,
) -> Result<Option<TransformedRow>> {
    let name = cell_to_string(cell(cells, cols.customer));
    if name.is_empty() || name == MISSING_TEXT {
        return Ok(None);
    }

    let mut phone = cell_to_string(cell(cells, cols.phone));
    if phone.is_empty() {
        phone = PHONE_PLACEHOLDER.to_string();
    }
    let laptop_type = cell_to_string(cell(cells, cols.model));
    let problem_description = cell_to_string(cell(cells, cols.problem));

    let total_cost = cell_to_f64(cell(cells, cols.cost))
        .context("Invalid cost value")?
        .unwrap_or(0.0);
    let remaining = cell_to_f64(cell(cells, cols.remaining))
        .context("Invalid remaining balance")?
        .unwrap_or(0.0);
    let paid_amount = total_cost - remaining;

    let created_at = resolve_date(cell(cells, cols.date), now)
        .format(TIMESTAMP_FORMAT)
        .to_string();

    let delivered = cell_to_string(cell(cells, cols.delivery)) == DELIVERED_MARKER;
    let (status, completed_at, delivered_at) = if delivered {
        (
            OrderStatus::Delivered,
            Some(created_at.clone()),
            Some(created_at.clone()),
        )
    } else {
        (OrderStatus::Pending, None, None)
    };

    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        name,
        phone,
        address: None,
        created_at: created_at.clone(),
    };

    let order = RepairOrder {
        id: Uuid::new_v4().to_string(),
        serial_code: generate_serial_code(now),
        customer_id: customer.id.clone(),
        dealer_id: None,
        device_owner_name: None,
        laptop_type,
        problem_description,
        total_cost,
        paid_amount,
        status,
        created_at: created_at.clone(),
        completed_at,
        delivered_at,
        notes: None,
    };

    let payment = (paid_amount > 0.0).then(|| Payment {
        id: Uuid::new_v4().to_string(),
        order_id: order.id.clone(),
        amount: paid_amount,
        payment_date: created_at,
        notes: Some(PAYMENT_NOTE.to_string()),
    });

    Ok(Some(TransformedRow {
        customer,
        order,
        payment,
    }))
}

/// Resolve the intake date: a native datetime cell wins, then the cell text
/// against the known formats, then the import-time clock.
fn resolve_date(cell: &Data, now: NaiveDateTime) -> NaiveDateTime {
    if let Some(dt) = cell_to_datetime(cell) {
        return dt;
    }
    let text = cell_to_string(cell);
    if text.is_empty() || text == MISSING_TEXT {
        return now;
    }
    parse_date_text(&text).unwrap_or(now)
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
