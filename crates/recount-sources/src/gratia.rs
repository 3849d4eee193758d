//! Gratia adapter: exact daily count from the relational accounting DB.

use anyhow::{Context, Result};
use recount_config::{GratiaPassword, GratiaSettings};
use recount_core::{DayBucket, LedgerError, LedgerSource};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

/// Usage records are joined to their metadata table so the count matches
/// what the accounting views report, not raw row totals.
const COUNT_SQL: &str = "SELECT COUNT(*) \
     FROM JobUsageRecord J \
     INNER JOIN JobUsageRecord_Meta M ON M.dbid = J.dbid \
     WHERE J.EndTime >= ? AND J.EndTime < ?";

/// Read-only handle on the gratia database.
pub struct GratiaLedger {
    pool: MySqlPool,
}

impl GratiaLedger {
    /// Connect with a single pooled connection. The whole run reuses one DB
    /// session and never issues concurrent queries, so one connection is the
    /// honest capacity.
    pub async fn connect(settings: &GratiaSettings, password: &GratiaPassword) -> Result<Self> {
        let opts = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(password.expose())
            .database(&settings.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .with_context(|| {
                format!(
                    "failed to connect to gratia database {}@{}:{}/{}",
                    settings.user, settings.host, settings.port, settings.database
                )
            })?;

        tracing::debug!(host = %settings.host, db = %settings.database, "gratia connected");
        Ok(Self { pool })
    }

    /// Release the DB session at the end of the run.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl LedgerSource for GratiaLedger {
    fn name(&self) -> &'static str {
        "gratia"
    }

    async fn count_records(&self, bucket: &DayBucket) -> Result<i64, LedgerError> {
        let (count,): (i64,) = sqlx::query_as(COUNT_SQL)
            .bind(bucket.start())
            .bind(bucket.end())
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(count)
    }
}

/// Transport-level failures mean the source is unreachable; everything else
/// is a query problem for this specific day.
fn classify(e: sqlx::Error) -> LedgerError {
    let transport = matches!(
        e,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
    );
    if transport {
        LedgerError::SourceUnavailable {
            ledger: "gratia",
            detail: e.to_string(),
        }
    } else {
        LedgerError::Query {
            ledger: "gratia",
            detail: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_classify_as_unavailable() {
        let e = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(
            classify(e),
            LedgerError::SourceUnavailable { ledger: "gratia", .. }
        ));
    }

    #[test]
    fn row_shape_errors_classify_as_query() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            LedgerError::Query { ledger: "gratia", .. }
        ));
    }
}
