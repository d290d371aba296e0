use chrono::NaiveDate;
use serde::Serialize;

/// Token joining the two ends of a multi-day range ("through").
pub const RANGE_SEPARATOR: &str = "至";

/// Inclusive calendar range of a stop. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Parses `YYYY-MM-DD` or `YYYY-MM-DD 至 YYYY-MM-DD`.
///
/// Returns `None` for anything else, including impossible calendar dates and
/// ranges whose end precedes their start. An unparseable date is a normal
/// state for shows whose dates are not fixed yet.
pub fn parse_date_range(text: &str) -> Option<DateRange> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut parts = text.split(RANGE_SEPARATOR);
    let start = parse_day(parts.next()?)?;
    let end = match parts.next() {
        Some(part) => parse_day(part)?,
        None => start,
    };
    if parts.next().is_some() || end < start {
        return None;
    }

    Some(DateRange { start, end })
}

fn parse_day(text: &str) -> Option<NaiveDate> {
    let mut fields = text.trim().split('-');
    let year = numeric_field(fields.next()?)?;
    let month = numeric_field(fields.next()?)?;
    let day = numeric_field(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

fn numeric_field(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
