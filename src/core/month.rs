use chrono::{Datelike, Months, NaiveDate};

/// Clamps a date to the first day of its month. Every period handled by the
/// engine is normalized through this before comparison or lookup.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("first of month is a valid date")
}

pub fn next_month(period: NaiveDate) -> NaiveDate {
    period
        .checked_add_months(Months::new(1))
        .expect("month arithmetic stays in range")
}

pub fn prev_month(period: NaiveDate) -> NaiveDate {
    period
        .checked_sub_months(Months::new(1))
        .expect("month arithmetic stays in range")
}

/// Number of calendar months from `start` to `end` inclusive. Both arguments
/// must already be month starts with `start <= end`.
pub fn month_span(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32) + 1;
    months.max(0) as u32
}

/// Contiguous sequence of month starts from `start` to `end` inclusive.
pub fn iter_months(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = month_start(start);
    let end = month_start(end);
    while current <= end {
        months.push(current);
        current = next_month(current);
    }
    months
}

/// Chart axis label, e.g. "Jan 2024".
pub fn month_label(period: NaiveDate) -> String {
    period.format("%b %Y").to_string()
}
