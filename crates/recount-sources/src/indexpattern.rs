//! Month-partition resolver for the gracc index.
//!
//! The physical index is partitioned one-per-calendar-month under a fixed
//! naming convention (`<prefix>-YYYY.MM`); queries are logical and
//! day-grained, so a span must be resolved to the partitions that cover it
//! before it can be issued.

use chrono::{Datelike, Days, NaiveDate};

/// Ordered, deduplicated partition identifiers covering every day of
/// `[start, end_exclusive)`.
///
/// The span is walked a day at a time; contiguous days in the same month
/// collapse into a single identifier. An empty span resolves to no
/// partitions.
pub fn resolve_partitions(prefix: &str, start: NaiveDate, end_exclusive: NaiveDate) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut day = start;
    while day < end_exclusive {
        let id = format!("{}-{:04}.{:02}", prefix, day.year(), day.month());
        if out.last() != Some(&id) {
            out.push(id);
        }
        day = day + Days::new(1);
    }
    out
}

/// Comma-joined pattern for the query URL, one logical query against the
/// union of all resolved partitions.
pub fn pattern_for_span(prefix: &str, start: NaiveDate, end_exclusive: NaiveDate) -> String {
    resolve_partitions(prefix, start, end_exclusive).join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn single_day_resolves_to_its_month() {
        let ids = resolve_partitions("gracc.osg.raw", d("2020-06-15"), d("2020-06-16"));
        assert_eq!(ids, vec!["gracc.osg.raw-2020.06"]);
    }

    #[test]
    fn days_within_one_month_collapse_to_one_partition() {
        let ids = resolve_partitions("gracc.osg.raw", d("2020-06-01"), d("2020-07-01"));
        assert_eq!(ids, vec!["gracc.osg.raw-2020.06"]);
    }

    #[test]
    fn two_day_span_across_month_boundary_hits_both_partitions() {
        // Wider-than-a-day buckets cannot occur by construction, but the
        // resolver must still attribute each day to the right partition.
        let ids = resolve_partitions("gracc.osg.raw", d("2021-01-31"), d("2021-02-02"));
        assert_eq!(
            ids,
            vec!["gracc.osg.raw-2021.01", "gracc.osg.raw-2021.02"]
        );
    }

    #[test]
    fn year_boundary_orders_partitions_ascending() {
        let ids = resolve_partitions("gracc.osg.raw", d("2019-12-30"), d("2020-01-02"));
        assert_eq!(
            ids,
            vec!["gracc.osg.raw-2019.12", "gracc.osg.raw-2020.01"]
        );
    }

    #[test]
    fn empty_span_resolves_to_nothing() {
        assert!(resolve_partitions("p", d("2020-01-02"), d("2020-01-02")).is_empty());
        assert!(resolve_partitions("p", d("2020-01-03"), d("2020-01-02")).is_empty());
    }

    #[test]
    fn pattern_joins_with_commas() {
        let pat = pattern_for_span("gracc.osg.raw", d("2021-01-31"), d("2021-02-02"));
        assert_eq!(pat, "gracc.osg.raw-2021.01,gracc.osg.raw-2021.02");
    }

    #[test]
    fn months_are_zero_padded() {
        let pat = pattern_for_span("gracc.osg.raw", d("2022-03-05"), d("2022-03-06"));
        assert_eq!(pat, "gracc.osg.raw-2022.03");
    }
}
