//! Quarter and month helpers.
//!
//! Quarters are the primary reporting period: quarter `q` covers the three
//! zero-indexed calendar months `3(q-1)..3(q-1)+2`. The quarter and year
//! stored on a record are always derived from its date through
//! [`quarter_from_date`] so the two can never drift apart.

use chrono::{Datelike, NaiveDate};

/// English month names, indexed by zero-based month.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Returns the quarter (1-4) a date falls in.
#[must_use]
pub fn quarter_from_date(date: NaiveDate) -> i32 {
    (date.month0() / 3 + 1) as i32
}

/// Returns the quarter immediately before the given one.
/// Quarter 1 of year Y wraps to quarter 4 of year Y-1.
#[must_use]
pub const fn previous_quarter(quarter: i32, year: i32) -> (i32, i32) {
    if quarter == 1 {
        (4, year - 1)
    } else {
        (quarter - 1, year)
    }
}

/// Returns the zero-based index of the first month of a quarter.
#[must_use]
pub const fn quarter_start_month0(quarter: i32) -> i32 {
    (quarter - 1) * 3
}

/// Returns the month name for a zero-based month index, or an empty string
/// for an out-of-range index.
#[must_use]
pub fn month_name(month0: i32) -> &'static str {
    usize::try_from(month0)
        .ok()
        .and_then(|idx| MONTH_NAMES.get(idx))
        .copied()
        .unwrap_or("")
}

/// Human label for a quarter, e.g. `1` → "January – March".
#[must_use]
pub const fn quarter_label(quarter: i32) -> &'static str {
    match quarter {
        1 => "January – March",
        2 => "April – June",
        3 => "July – September",
        4 => "October – December",
        _ => "",
    }
}
