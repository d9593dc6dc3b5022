//! Date text accepted by date fields, normalized to `yyyy-mm-dd`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

pub const OUTPUT_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse the calendar date out of `dd/mm/yyyy`, `yyyy-mm-dd`, HTTP / RFC 2822
/// dates, and ISO or SQL timestamps (time part ignored).
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS.iter().find_map(|f| NaiveDate::parse_from_str(s, f).ok()) {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, HTTP_DATE) {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let date_part = s.split(|c| c == 'T' || c == ' ').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(OUTPUT_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
