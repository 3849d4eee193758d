use crate::{DayBucket, LedgerError, ReconciliationRow};

/// One ledger's day-count contract.
///
/// Implementations must be object-safe so the reconciler can hold
/// `&dyn LedgerSource` without knowing the concrete client, and `Send + Sync`
/// so they can cross async boundaries. Implementations are pure reads; an
/// adapter never writes to its ledger.
#[async_trait::async_trait]
pub trait LedgerSource: Send + Sync {
    /// Short stable name used in events and error messages (e.g. `"gratia"`).
    fn name(&self) -> &'static str;

    /// Exact number of records whose end-time falls inside `bucket`.
    async fn count_records(&self, bucket: &DayBucket) -> Result<i64, LedgerError>;
}

/// Destination for completed rows.
///
/// The range driver hands each row over before requesting the next day's
/// counts; an implementation must make the row durable before returning so a
/// later-day failure cannot lose it.
pub trait RowSink {
    fn append_row(&mut self, row: &ReconciliationRow) -> anyhow::Result<()>;
}
