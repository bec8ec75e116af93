//! Source worksheet column labels
//!
//! The legacy sheets use Arabic headers. The mapping is injectable so the
//! transformer is not tied to one header set: a TOML file passed via
//! `--mapping` may override any subset of the labels.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Delivery marker value meaning the device was picked up by the customer
pub const DELIVERED_MARKER: &str = "تم";

/// Placeholder stored when the sheet has no phone number
pub const PHONE_PLACEHOLDER: &str = "لا يوجد";

/// Text the legacy sheets carry in place of a missing customer name
pub const MISSING_TEXT: &str = "nan";

/// Note attached to payments synthesized from the sheet's paid amount
pub const PAYMENT_NOTE: &str = "استيراد من Excel";

/// Header labels of the source worksheet, matched by exact text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    pub customer: String,
    pub phone: String,
    pub model: String,
    pub problem: String,
    pub cost: String,
    pub remaining: String,
    pub delivery: String,
    pub date: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            customer: "العميل".to_string(),
            phone: "رقم الهاتف".to_string(),
            model: "الموديل".to_string(),
            problem: "صيانه".to_string(),
            cost: "التكلفه".to_string(),
            remaining: "باقى حساب".to_string(),
            delivery: "استلام".to_string(),
            date: "تاريخ الاسلام".to_string(),
        }
    }
}

impl ColumnMap {
    /// Load a mapping from a TOML file. Labels not named in the file keep
    /// their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read column mapping file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse column mapping file: {}", path.display()))
    }

    /// Map the labels to column positions in the given header row. A label
    /// that does not appear resolves to `None`; its cells read as blank
    /// downstream.
    pub fn resolve(&self, header: &[String]) -> ColumnIndices {
        let mut indices = ColumnIndices::default();
        for (col, label) in header.iter().enumerate() {
            let label = label.trim();
            if label == self.customer {
                indices.customer.get_or_insert(col);
            } else if label == self.phone {
                indices.phone.get_or_insert(col);
            } else if label == self.model {
                indices.model.get_or_insert(col);
            } else if label == self.problem {
                indices.problem.get_or_insert(col);
            } else if label == self.cost {
                indices.cost.get_or_insert(col);
            } else if label == self.remaining {
                indices.remaining.get_or_insert(col);
            } else if label == self.delivery {
                indices.delivery.get_or_insert(col);
            } else if label == self.date {
                indices.date.get_or_insert(col);
            }
        }
        indices
    }
}

/// Resolved column positions for one worksheet
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnIndices {
    pub customer: Option<usize>,
    pub phone: Option<usize>,
    pub model: Option<usize>,
    pub problem: Option<usize>,
    pub cost: Option<usize>,
    pub remaining: Option<usize>,
    pub delivery: Option<usize>,
    pub date: Option<usize>,
}
