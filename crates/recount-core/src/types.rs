use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Inclusive calendar date range. Iteration walks one day at a time,
/// ascending. An inverted range (`start > end`) iterates zero days; it is
/// not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        std::iter::successors(Some(self.start), |d| d.checked_add_days(Days::new(1)))
            .take_while(move |d| *d <= self.end)
    }

    /// Number of days the range covers; 0 when inverted.
    pub fn num_days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }
}

/// Half-open one-day query window `[day 00:00:00, day+1 00:00:00)`.
///
/// Both ledgers filter on record end-time against the same bucket, so the
/// bucket is the unit of comparison. Width is exactly one calendar day by
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayBucket {
    day: NaiveDate,
}

impl DayBucket {
    pub fn for_day(day: NaiveDate) -> Self {
        Self { day }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Inclusive lower bound of the window.
    pub fn start(&self) -> NaiveDateTime {
        self.day.and_time(NaiveTime::MIN)
    }

    /// Exclusive upper bound of the window (midnight of the next day).
    pub fn end(&self) -> NaiveDateTime {
        self.end_date().and_time(NaiveTime::MIN)
    }

    /// The calendar day after the bucket's day.
    pub fn end_date(&self) -> NaiveDate {
        self.day + Days::new(1)
    }
}

/// Relative difference between the two counts, `diff / gratia_count`.
///
/// The ratio is mathematically undefined when the gratia baseline is zero.
/// That case is carried explicitly so it can never be mistaken for a real
/// zero or infinity downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelativeDiff {
    /// Plain ratio; `0.05` renders as `5.0000%`.
    Ratio(f64),
    /// Gratia reported zero records for the day.
    Undefined,
}

impl RelativeDiff {
    pub fn compute(diff: i64, gratia_count: i64) -> Self {
        if gratia_count == 0 {
            RelativeDiff::Undefined
        } else {
            RelativeDiff::Ratio(diff as f64 / gratia_count as f64)
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, RelativeDiff::Undefined)
    }
}

impl fmt::Display for RelativeDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDiff::Ratio(r) => write!(f, "{:.4}%", r * 100.0),
            RelativeDiff::Undefined => write!(f, "undefined"),
        }
    }
}

/// One reconciled day. Created by the reconciler, serialized and appended by
/// the report writer, never mutated afterward.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconciliationRow {
    /// Bucket lower bound (the reconciled day).
    pub start_date: NaiveDate,
    /// Bucket upper bound (the next day).
    pub end_date: NaiveDate,
    pub gratia_count: i64,
    pub gracc_count: i64,
    /// `gracc_count - gratia_count`.
    pub diff: i64,
    pub relative: RelativeDiff,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn range_days_ascending_inclusive() {
        let r = DateRange::new(d("2020-01-01"), d("2020-01-03"));
        let days: Vec<NaiveDate> = r.days().collect();
        assert_eq!(days, vec![d("2020-01-01"), d("2020-01-02"), d("2020-01-03")]);
        assert_eq!(r.num_days(), 3);
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = DateRange::new(d("2020-01-03"), d("2020-01-01"));
        assert_eq!(r.days().count(), 0);
        assert_eq!(r.num_days(), 0);
    }

    #[test]
    fn single_day_range() {
        let r = DateRange::new(d("2020-06-15"), d("2020-06-15"));
        assert_eq!(r.days().count(), 1);
        assert_eq!(r.num_days(), 1);
    }

    #[test]
    fn bucket_is_half_open_one_day() {
        let b = DayBucket::for_day(d("2021-01-31"));
        assert_eq!(b.start().to_string(), "2021-01-31 00:00:00");
        assert_eq!(b.end().to_string(), "2021-02-01 00:00:00");
        assert_eq!(b.end_date(), d("2021-02-01"));
    }

    #[test]
    fn relative_diff_formats_as_percentage() {
        assert_eq!(RelativeDiff::compute(5, 100).to_string(), "5.0000%");
        assert_eq!(RelativeDiff::compute(-2, 110).to_string(), "-1.8182%");
        assert_eq!(RelativeDiff::compute(0, 7).to_string(), "0.0000%");
    }

    #[test]
    fn zero_baseline_is_undefined_not_a_number() {
        let r = RelativeDiff::compute(0, 0);
        assert!(r.is_undefined());
        assert_eq!(r.to_string(), "undefined");
    }
}
