use recount_core::*;

/// A source that must never be queried.
struct Untouchable;

#[async_trait::async_trait]
impl LedgerSource for Untouchable {
    fn name(&self) -> &'static str {
        "untouchable"
    }

    async fn count_records(&self, bucket: &DayBucket) -> Result<i64, LedgerError> {
        panic!("ledger queried for {} on an empty range", bucket.day());
    }
}

#[derive(Default)]
struct VecSink {
    rows: Vec<ReconciliationRow>,
}

impl RowSink for VecSink {
    fn append_row(&mut self, row: &ReconciliationRow) -> anyhow::Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

#[tokio::test]
async fn scenario_inverted_range_is_a_successful_noop() {
    let range = DateRange::new(
        "2020-02-10".parse().unwrap(),
        "2020-02-01".parse().unwrap(),
    );
    let mut sink = VecSink::default();

    let summary = run_range(&range, &Untouchable, &Untouchable, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.days_requested, 0);
    assert_eq!(summary.rows_written, 0);
    assert!(sink.rows.is_empty());
}
