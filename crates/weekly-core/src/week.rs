//! Monday–Friday week label used when a record leaves `week` empty.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// `YYYY-MM-DD → YYYY-MM-DD` for the ISO week (starting Monday) containing `date`.
pub fn week_range(date: NaiveDate) -> String {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let friday = monday + Duration::days(4);
    format!("{} → {}", monday.format("%Y-%m-%d"), friday.format("%Y-%m-%d"))
}

/// [`week_range`] for today's local date.
pub fn current_week_range() -> String {
    week_range(Local::now().date_naive())
}
