//! Calendar-month windows for the monthly aggregations.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Half-open UTC interval `[start, end)` covering one calendar month.
///
/// `end` is the first instant of the following month, so the last
/// millisecond of the month is inside and midnight of the next is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// The month containing `instant`.
    pub fn containing(instant: DateTime<Utc>) -> Self {
        let (year, month) = (instant.year(), instant.month());
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        Self {
            start: first_instant(year, month),
            end: first_instant(next_year, next_month),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

fn first_instant(year: i32, month: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn window_bounds_for_mid_month() {
        let w = MonthWindow::containing(at("2026-02-14T10:00:00Z"));
        assert_eq!(w.start, at("2026-02-01T00:00:00Z"));
        assert_eq!(w.end, at("2026-03-01T00:00:00Z"));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let w = MonthWindow::containing(at("2025-12-31T23:00:00Z"));
        assert_eq!(w.end, at("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn last_millisecond_is_inside_next_midnight_is_not() {
        let w = MonthWindow::containing(at("2026-01-10T00:00:00Z"));
        assert!(w.contains(at("2026-01-31T23:59:59.999Z")));
        assert!(!w.contains(at("2026-02-01T00:00:00.000Z")));
        assert!(w.contains(at("2026-01-01T00:00:00Z")));
    }
}
