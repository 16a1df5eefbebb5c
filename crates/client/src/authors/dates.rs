//! Best-effort parsing of free-text birth dates.

use chrono::NaiveDate;

const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y", "%B %d %Y", "%m/%d/%Y"];

/// Parse a catalog birth date such as `1920-01-01`, `3 January 1892` or
/// `January 3, 1892`. Returns None for anything else, including year-only text.
pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim().trim_end_matches('.');
    if text.is_empty() {
        return None;
    }

    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
