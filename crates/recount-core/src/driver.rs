use crate::{reconcile_day, DateRange, LedgerSource, RowSink};
use anyhow::{Context, Result};

/// Outcome of a completed range run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSummary {
    /// Days the range covers (0 for an inverted range).
    pub days_requested: i64,
    /// Rows appended to the sink; equals `days_requested` on success.
    pub rows_written: i64,
    /// Days whose relative difference was undefined (zero gratia baseline).
    pub undefined_days: i64,
}

/// Drive the reconciler over every day of `range`, ascending, strictly
/// sequentially.
///
/// Each finished row is appended to `sink` before the next day's counts are
/// requested, so partial progress is durable when a later day fails. The
/// first adapter or sink failure aborts the remaining range; there is no
/// retry and no skip. An inverted range is a successful no-op.
pub async fn run_range(
    range: &DateRange,
    gratia: &dyn LedgerSource,
    gracc: &dyn LedgerSource,
    sink: &mut dyn RowSink,
) -> Result<RangeSummary> {
    let mut summary = RangeSummary {
        days_requested: range.num_days(),
        rows_written: 0,
        undefined_days: 0,
    };

    for day in range.days() {
        tracing::debug!(day = %day, "reconciling day");

        let row = reconcile_day(gratia, gracc, day)
            .await
            .with_context(|| format!("reconciliation failed for {day}"))?;

        if row.relative.is_undefined() {
            summary.undefined_days += 1;
        }

        sink.append_row(&row)
            .with_context(|| format!("report append failed for {day}"))?;
        summary.rows_written += 1;

        tracing::info!(
            day = %day,
            gratia = row.gratia_count,
            gracc = row.gracc_count,
            diff = row.diff,
            relative = %row.relative,
            "row appended"
        );
    }

    Ok(summary)
}
