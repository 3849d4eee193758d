use std::fmt;

/// Errors a [`crate::LedgerSource`] implementation may return.
///
/// Every variant is fatal to the run: the range driver has no per-day retry
/// or skip policy, so the first failure aborts the remaining days and leaves
/// the report non-finalized.
#[derive(Debug)]
pub enum LedgerError {
    /// Network or transport failure reaching the ledger.
    SourceUnavailable { ledger: &'static str, detail: String },
    /// The ledger answered, but the count could not be produced or decoded.
    Query { ledger: &'static str, detail: String },
    /// No search-index partition matches the bucket's date.
    IndexNotFound { pattern: String },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::SourceUnavailable { ledger, detail } => {
                write!(f, "{ledger} unavailable: {detail}")
            }
            LedgerError::Query { ledger, detail } => {
                write!(f, "{ledger} count query failed: {detail}")
            }
            LedgerError::IndexNotFound { pattern } => {
                write!(f, "no index partition matches pattern '{pattern}'")
            }
        }
    }
}

impl std::error::Error for LedgerError {}
