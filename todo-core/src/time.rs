//! Time utilities: due-date parsing and the "today" source.

use chrono::{Local, NaiveDate};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date '{input}' (expected YYYY-MM-DD): {reason}")]
pub struct DateError {
    pub input: String,
    pub reason: String,
}

/// Parse a due date like "2026-02-20".
///
/// The year must be exactly four digits with no sign. Unpadded month/day
/// ("2026-2-5") is accepted; `format_due_date` writes it back padded.
pub fn parse_due_date(input: &str) -> Result<NaiveDate, DateError> {
    let s = input.trim();
    let err = |reason: String| DateError {
        input: s.to_string(),
        reason,
    };

    check_shape(s).map_err(|reason| err(reason.to_string()))?;
    NaiveDate::parse_from_str(s, DUE_DATE_FORMAT).map_err(|e| err(e.to_string()))
}

// chrono's %Y takes a sign and any digit count; pin it to YYYY-M[M]-D[D].
fn check_shape(s: &str) -> Result<(), &'static str> {
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());

    let mut parts = s.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err("expected three dash-separated fields");
    };

    if year.len() != 4 || !all_digits(year) {
        return Err("year must be four digits");
    }
    if month.len() > 2 || !all_digits(month) {
        return Err("month must be one or two digits");
    }
    if day.len() > 2 || !all_digits(day) {
        return Err("day must be one or two digits");
    }
    Ok(())
}

pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The process's local date at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
