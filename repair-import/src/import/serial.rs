//! Human-facing order reference tokens

use chrono::NaiveDateTime;
use uuid::Uuid;

/// Prefix carried by every generated serial code
pub const SERIAL_PREFIX: &str = "RPR";

/// Build a serial code: prefix, 14-digit timestamp, 4-character uppercase
/// random suffix. Practically unique and easy to read back over the phone,
/// not a primary key.
pub fn generate_serial_code(now: NaiveDateTime) -> String {
    let unique = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}{}",
        SERIAL_PREFIX,
        now.format("%Y%m%d%H%M%S"),
        unique[..4].to_uppercase()
    )
}
