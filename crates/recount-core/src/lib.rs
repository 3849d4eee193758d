//! recount-core
//!
//! Day-by-day record-count reconciliation between two independent ledgers.
//!
//! Architectural decisions:
//! - One report row per calendar day, computed from a half-open one-day bucket
//! - Both ledgers are queried through the [`LedgerSource`] seam; no ambient
//!   connection globals
//! - Rows are handed to a [`RowSink`] for durable append before the next day
//!   is queried, so partial progress survives a mid-range failure
//! - Strictly sequential: no overlap between days, no retry, no skip
//! - A zero gratia baseline makes the relative difference undefined; the row
//!   is flagged, never silently divided
//!
//! Deterministic logic. No sockets, no filesystem.

mod driver;
mod error;
mod reconciler;
mod source;
mod types;

pub use driver::{run_range, RangeSummary};
pub use error::LedgerError;
pub use reconciler::reconcile_day;
pub use source::{LedgerSource, RowSink};
pub use types::{DateRange, DayBucket, ReconciliationRow, RelativeDiff};
