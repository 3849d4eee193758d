//! recount-report
//!
//! Run-state file manager for the reconciliation report.
//!
//! Architectural decisions:
//! - The report path has exactly one owner: this writer. Nothing else reads
//!   or writes it during a run.
//! - The `Success` terminal marker is present iff every day of the requested
//!   range was reconciled and appended in that run.
//! - An incomplete prior report is crash evidence: it is renamed to the
//!   backup path at initialization and deleted only when the current run
//!   finalizes successfully.
//! - Marker detection is tolerant: empty, unreadable, or mid-line-truncated
//!   files all read as "not finalized"; the check itself never fails.
//!
//! The lifecycle is encoded in ownership: `initialize` constructs the writer,
//! `append` takes `&mut self`, and `finalize` consumes it, so appending after
//! finalization is a compile error rather than a runtime state check.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use recount_core::{ReconciliationRow, RowSink};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Last line of a report whose run completed without error.
pub const TERMINAL_MARKER: &str = "Success";

const COLUMN_HEADER: &str =
    "Start Date\tEnd Date\tgratia_count\tgracc_count\tdiff(gracc-gratia)\tPercentage diff";

/// What a previous invocation left at the report path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorReport {
    /// Nothing on disk.
    Absent,
    /// Last run reached the terminal marker; safe to overwrite.
    Finalized,
    /// Last run died mid-range (or left unreadable content); must be
    /// preserved as the backup artifact.
    Incomplete,
}

/// Classify the file at `path` without ever failing: any I/O error reading
/// the content is treated as "incomplete, preserve it".
pub fn inspect_prior_report(path: &Path) -> PriorReport {
    if !path.exists() {
        return PriorReport::Absent;
    }
    match fs::read_to_string(path) {
        Ok(text) => {
            let finalized = text
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim() == TERMINAL_MARKER)
                .unwrap_or(false);
            if finalized {
                PriorReport::Finalized
            } else {
                PriorReport::Incomplete
            }
        }
        Err(_) => PriorReport::Incomplete,
    }
}

/// Append-only writer owning the report artifact for one run.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    backup_path: PathBuf,
    file: File,
    rows_written: u64,
}

impl ReportWriter {
    /// Set up the report file for a fresh run.
    ///
    /// An incomplete prior report is renamed to the backup path first; a
    /// finalized one is simply overwritten. Renaming onto an existing backup
    /// would destroy older crash evidence, so that is fatal.
    pub fn initialize(
        path: impl AsRef<Path>,
        backup_path: impl AsRef<Path>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let backup_path = backup_path.as_ref().to_path_buf();

        if inspect_prior_report(&path) == PriorReport::Incomplete {
            if backup_path.exists() {
                bail!(
                    "REPORT_BACKUP_EXISTS: cannot preserve incomplete report {} — backup {} \
                     already exists; inspect and remove it first",
                    path.display(),
                    backup_path.display()
                );
            }
            fs::rename(&path, &backup_path).with_context(|| {
                format!(
                    "REPORT_BACKUP_FAILED: rename {} -> {}",
                    path.display(),
                    backup_path.display()
                )
            })?;
            tracing::info!(
                backup = %backup_path.display(),
                "preserved incomplete prior report as backup"
            );
        }

        let mut file = File::create(&path)
            .with_context(|| format!("REPORT_CREATE_FAILED: {}", path.display()))?;
        write!(
            file,
            "Datestamp: {}\n\n{}\n",
            now.format("%Y-%m-%d %H:%M:%S%.6f"),
            COLUMN_HEADER
        )
        .context("write report header failed")?;
        file.sync_data().context("sync report header failed")?;

        tracing::debug!(report = %path.display(), "report initialized");

        Ok(Self {
            path,
            backup_path,
            file,
            rows_written: 0,
        })
    }

    /// Append one row and flush it to disk before returning.
    ///
    /// The row must be durable before the driver queries the next day, so a
    /// later failure cannot lose completed work.
    pub fn append(&mut self, row: &ReconciliationRow) -> Result<()> {
        let line = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            row.start_date, row.end_date, row.gratia_count, row.gracc_count, row.diff, row.relative
        );
        self.file
            .write_all(line.as_bytes())
            .with_context(|| format!("append row for {} failed", row.start_date))?;
        self.file
            .sync_data()
            .with_context(|| format!("sync row for {} failed", row.start_date))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Close out the run.
    ///
    /// On success the terminal marker is written and the backup artifact (if
    /// any) is deleted. On failure the file is left exactly as it is, without
    /// the marker, so the next run's [`ReportWriter::initialize`] detects it
    /// and preserves it as a backup.
    pub fn finalize(mut self, success: bool) -> Result<()> {
        if !success {
            tracing::warn!(
                report = %self.path.display(),
                rows = self.rows_written,
                "run did not complete; report left without terminal marker"
            );
            return Ok(());
        }

        self.file
            .write_all(format!("\n{TERMINAL_MARKER}").as_bytes())
            .context("write terminal marker failed")?;
        self.file.sync_data().context("sync terminal marker failed")?;

        if self.backup_path.exists() {
            fs::remove_file(&self.backup_path).with_context(|| {
                format!(
                    "REPORT_BACKUP_CLEANUP_FAILED: {}",
                    self.backup_path.display()
                )
            })?;
            tracing::info!(backup = %self.backup_path.display(), "removed backup file");
        }

        tracing::info!(
            report = %self.path.display(),
            rows = self.rows_written,
            "run finalized"
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl RowSink for ReportWriter {
    fn append_row(&mut self, row: &ReconciliationRow) -> Result<()> {
        self.append(row)
    }
}
