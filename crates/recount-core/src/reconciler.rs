use crate::{DayBucket, LedgerError, LedgerSource, ReconciliationRow, RelativeDiff};
use chrono::NaiveDate;

/// Reconcile one calendar day.
///
/// Both ledgers are queried with the same half-open bucket, gratia first,
/// then gracc; the calls never overlap. Returns the finished row or the
/// first adapter failure.
///
/// A zero gratia baseline is not an error: the row is produced with
/// [`RelativeDiff::Undefined`] and a `WARN` event records the occurrence.
pub async fn reconcile_day(
    gratia: &dyn LedgerSource,
    gracc: &dyn LedgerSource,
    day: NaiveDate,
) -> Result<ReconciliationRow, LedgerError> {
    let bucket = DayBucket::for_day(day);

    let gratia_count = gratia.count_records(&bucket).await?;
    let gracc_count = gracc.count_records(&bucket).await?;

    let diff = gracc_count - gratia_count;
    let relative = RelativeDiff::compute(diff, gratia_count);

    if relative.is_undefined() {
        tracing::warn!(
            day = %day,
            gracc_count,
            "gratia reported zero records; relative difference is undefined"
        );
    }

    Ok(ReconciliationRow {
        start_date: bucket.day(),
        end_date: bucket.end_date(),
        gratia_count,
        gracc_count,
        diff,
        relative,
    })
}
