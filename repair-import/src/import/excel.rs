//! Worksheet loading and cell coercion

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::NaiveDateTime;

/// A worksheet materialized in file order: stringified header row plus raw
/// data rows.
#[derive(Debug, Default, Clone)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

/// Load one worksheet from an xlsx workbook. Picks the named sheet, or the
/// first one when no name is given. An unreadable file or a missing sheet is
/// fatal; an empty worksheet is not.
pub fn read_sheet(path: &Path, sheet_name: Option<&str>) -> Result<Sheet> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_name = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .context("Excel file has no sheets")?
            .clone(),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(cell_to_string).collect(),
        None => return Ok(Sheet::default()),
    };

    Ok(Sheet {
        header,
        rows: rows.map(|r| r.to_vec()).collect(),
    })
}

/// Render a cell as trimmed text. Blank and error cells become the empty
/// string; integral floats render without the trailing `.0` so numeric phone
/// columns keep their literal digits.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Read a cell as a number. Blank cells are `Ok(None)`; text that does not
/// parse as a number is an error for the row, not a default.
pub fn cell_to_f64(cell: &Data) -> Result<Option<f64>> {
    match cell {
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>()
                    .map(Some)
                    .map_err(|_| anyhow!("not a number: '{}'", s))
            }
        }
        Data::Empty => Ok(None),
        other => Err(anyhow!("cell is not numeric: {:?}", other)),
    }
}

/// Native Excel datetime cells, when the workbook stored a real date value
/// rather than text.
pub fn cell_to_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        _ => None,
    }
}
