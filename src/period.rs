//! Helpers for (month, year) reporting periods.

use chrono::{Datelike, Local};

const MONTH_NAMES: [&str; 12] = [
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

const MONTH_ABBRS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The period before the given one, rolling back to December of the prior
/// year from January.
pub fn previous(month: u32, year: i32) -> (u32, i32) {
    if month == 1 {
        (12, year - 1)
    } else {
        (month - 1, year)
    }
}

/// The current wall-clock period in local time.
pub fn current() -> (u32, i32) {
    let now = Local::now();
    (now.month(), now.year())
}

/// Full month name, or an empty string for an out-of-range month.
pub fn month_name(month: u32) -> &'static str {
    if (1..=12).contains(&month) {
        MONTH_NAMES[(month - 1) as usize]
    } else {
        ""
    }
}

/// Three-letter month abbreviation, or an empty string for an out-of-range
/// month.
pub fn month_abbr(month: u32) -> &'static str {
    if (1..=12).contains(&month) {
        MONTH_ABBRS[(month - 1) as usize]
    } else {
        ""
    }
}
