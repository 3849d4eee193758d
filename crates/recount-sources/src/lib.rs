//! recount-sources
//!
//! Ledger query adapters: concrete [`recount_core::LedgerSource`]
//! implementations for the gratia relational database and the gracc search
//! index, plus the month-partition resolver the gracc adapter queries
//! through.
//!
//! Both adapters are pure reads. Connection setup is thin I/O wiring; the
//! reconciliation logic lives in recount-core and receives these adapters by
//! reference, never through globals.

pub mod gracc;
pub mod gratia;
pub mod indexpattern;

pub use gracc::GraccLedger;
pub use gratia::GratiaLedger;
