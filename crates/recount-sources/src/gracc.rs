//! Gracc adapter: exact daily count from the document-search index.
//!
//! Counts come from the `_count` API, which returns an exact total rather
//! than the capped/approximate totals a plain search response may carry.

use crate::indexpattern;
use anyhow::{Context, Result};
use recount_config::GraccSettings;
use recount_core::{DayBucket, LedgerError, LedgerSource};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// Read-only client for the gracc index endpoint.
#[derive(Debug, Clone)]
pub struct GraccLedger {
    http: reqwest::Client,
    base_url: String,
    index_prefix: String,
}

impl GraccLedger {
    /// Build the TLS client the production endpoint requires: client
    /// certificate + key, optional private CA bundle, and the configured
    /// request timeout.
    pub fn connect(settings: &GraccSettings) -> Result<Self> {
        let mut identity_pem = fs::read(&settings.client_cert).with_context(|| {
            format!(
                "failed to read gracc client certificate {}",
                settings.client_cert.display()
            )
        })?;
        let key_pem = fs::read(&settings.client_key).with_context(|| {
            format!(
                "failed to read gracc client key {}",
                settings.client_key.display()
            )
        })?;
        identity_pem.extend_from_slice(&key_pem);

        let identity = reqwest::Identity::from_pem(&identity_pem)
            .context("gracc client certificate/key is not valid PEM")?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .timeout(Duration::from_secs(settings.timeout_secs));

        if let Some(ca) = &settings.ca_bundle {
            let ca_pem = fs::read(ca)
                .with_context(|| format!("failed to read gracc CA bundle {}", ca.display()))?;
            builder = builder.add_root_certificate(
                reqwest::Certificate::from_pem(&ca_pem)
                    .context("gracc CA bundle is not valid PEM")?,
            );
        }

        let http = builder.build().context("failed to build gracc http client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            index_prefix: settings.index_prefix.clone(),
        })
    }

    /// Plain client against an arbitrary base URL, for tests and local
    /// diagnostics against an unauthenticated endpoint.
    pub fn with_base_url(base_url: impl Into<String>, index_prefix: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            index_prefix: index_prefix.into(),
        }
    }

    fn count_url(&self, pattern: &str) -> String {
        format!("{}/{}/_count", self.base_url, pattern)
    }
}

#[async_trait::async_trait]
impl LedgerSource for GraccLedger {
    fn name(&self) -> &'static str {
        "gracc"
    }

    async fn count_records(&self, bucket: &DayBucket) -> Result<i64, LedgerError> {
        let pattern =
            indexpattern::pattern_for_span(&self.index_prefix, bucket.day(), bucket.end_date());

        // Date-only bounds: the bucket edges are midnights, so the half-open
        // window is expressed exactly by the two calendar dates.
        let body = serde_json::json!({
            "query": {
                "range": {
                    "EndTime": {
                        "gte": bucket.day().to_string(),
                        "lt": bucket.end_date().to_string(),
                    }
                }
            }
        });

        tracing::debug!(%pattern, day = %bucket.day(), "gracc count query");

        let resp = self
            .http
            .post(self.count_url(&pattern))
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::SourceUnavailable {
                ledger: "gracc",
                detail: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| LedgerError::Query {
            ledger: "gracc",
            detail: format!("failed to read response body: {e}"),
        })?;

        if status == reqwest::StatusCode::NOT_FOUND && text.contains("index_not_found_exception") {
            return Err(LedgerError::IndexNotFound { pattern });
        }
        if !status.is_success() {
            return Err(LedgerError::Query {
                ledger: "gracc",
                detail: format!("http status {}: {}", status.as_u16(), text),
            });
        }

        let parsed: CountResponse =
            serde_json::from_str(&text).map_err(|e| LedgerError::Query {
                ledger: "gracc",
                detail: format!("undecodable count response: {e}"),
            })?;

        Ok(parsed.count)
    }
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: i64,
}
