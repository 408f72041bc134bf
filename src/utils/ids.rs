//! Sequential public identifier generation
//!
//! Every aggregate carries a human-readable public id such as "EVT0001",
//! allocated by scanning the ids already present in its table and
//! incrementing the highest numeric suffix. The scan runs inside the
//! caller's transaction; races between concurrent creators are closed by
//! the unique index on the id column plus the retry loop in the services.

/// Public id prefixes, one per table.
pub const USER_PREFIX: &str = "USR";
pub const ADMIN_PREFIX: &str = "ADM";
pub const COLLEGE_PREFIX: &str = "COL";
pub const EVENT_PREFIX: &str = "EVT";
pub const SPONSOR_PREFIX: &str = "SPN";
pub const REGISTRATION_PREFIX: &str = "REG";
pub const INVOICE_PREFIX: &str = "INV";
pub const PAYMENT_PREFIX: &str = "PAY";
pub const UGC_PREFIX: &str = "UGC";
pub const PHOTO_PREFIX: &str = "PHT";
pub const REVIEW_PREFIX: &str = "REV";
pub const ANALYTICS_PREFIX: &str = "ANL";

/// Numeric suffix width shared by all public ids.
pub const ID_WIDTH: usize = 4;

/// Compute the next sequential id for a prefix.
///
/// Ids that do not carry the prefix or whose suffix is not numeric are
/// skipped; when nothing parses the sequence starts at 1. The suffix is
/// zero-padded to `width` but never truncated, so sequences outgrow the
/// padding transparently ("EVT9999" is followed by "EVT10000").
pub fn next_id(prefix: &str, width: usize, existing: &[String]) -> String {
    let max_seen = existing
        .iter()
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{:0width$}", prefix, max_seen + 1, width = width)
}
