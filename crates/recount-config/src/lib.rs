//! recount-config
//!
//! Layered YAML configuration for the record-count reconciler.
//!
//! Architectural decisions:
//! - Later layers deep-merge over earlier ones; scalars override, maps merge
//! - Config stores env var NAMES for secrets, never secret values
//! - Secret resolution happens once at startup; resolved values redact their
//!   `Debug` output and never appear in error messages

mod secrets;

pub use secrets::GratiaPassword;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Ledger A: the gratia relational accounting database.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GratiaSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    /// NAME of the env var holding the DB password (value never lives here).
    pub password_env: String,
}

impl Default for GratiaSettings {
    fn default() -> Self {
        Self {
            host: "gratiadb03.fnal.gov".to_string(),
            port: 3306,
            database: "gratia".to_string(),
            user: "reader".to_string(),
            password_env: "GRATIA_DB_PASSWORD".to_string(),
        }
    }
}

/// Ledger B: the gracc document-search index.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraccSettings {
    pub base_url: String,
    /// Partition naming prefix; physical indices are `<prefix>-YYYY.MM`.
    pub index_prefix: String,
    pub timeout_secs: u64,
    /// PEM client certificate presented to the endpoint.
    pub client_cert: PathBuf,
    /// PEM private key matching `client_cert`.
    pub client_key: PathBuf,
    /// Optional PEM CA bundle; system roots are used when absent.
    pub ca_bundle: Option<PathBuf>,
}

impl Default for GraccSettings {
    fn default() -> Self {
        Self {
            base_url: "https://gracc.opensciencegrid.org/e".to_string(),
            index_prefix: "gracc.osg.raw".to_string(),
            timeout_secs: 60,
            client_cert: PathBuf::from("gracc_cert/gracc-reports-dev.crt"),
            client_key: PathBuf::from("gracc_cert/gracc-reports-dev.key"),
            ca_bundle: None,
        }
    }
}

/// Report artifact paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    pub file: PathBuf,
    pub backup_file: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("runresults.out"),
            backup_file: PathBuf::from("runresults_BAK.out"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    pub gratia: GratiaSettings,
    pub gracc: GraccSettings,
    pub report: ReportSettings,
}

impl ReconcileConfig {
    /// Load from YAML layers in merge order; an empty path list yields the
    /// built-in defaults.
    pub fn load_layered(paths: &[PathBuf]) -> Result<Self> {
        let mut docs: Vec<String> = Vec::new();
        for p in paths {
            let raw = fs::read_to_string(p)
                .with_context(|| format!("failed to read config layer {}", p.display()))?;
            docs.push(raw);
        }
        let refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
        Self::from_yaml_layers(&refs)
    }

    pub fn from_yaml_layers(yaml_docs: &[&str]) -> Result<Self> {
        let mut merged = serde_json::json!({});
        for raw in yaml_docs {
            let v_yaml: serde_yaml::Value =
                serde_yaml::from_str(raw).context("invalid yaml config layer")?;
            let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
            merged = deep_merge(merged, v_json);
        }
        serde_json::from_value(merged).context("config does not match the expected schema")
    }
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        // Null from a missing key never clobbers an earlier layer's value.
        (a_other, Value::Null) => a_other,
        (_, b_other) => b_other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_tool() {
        let cfg = ReconcileConfig::from_yaml_layers(&[]).unwrap();
        assert_eq!(cfg.gratia.host, "gratiadb03.fnal.gov");
        assert_eq!(cfg.gratia.user, "reader");
        assert_eq!(cfg.gracc.index_prefix, "gracc.osg.raw");
        assert_eq!(cfg.gracc.timeout_secs, 60);
        assert_eq!(cfg.report.file, PathBuf::from("runresults.out"));
        assert_eq!(cfg.report.backup_file, PathBuf::from("runresults_BAK.out"));
    }

    #[test]
    fn later_layer_overrides_scalars_but_keeps_siblings() {
        let base = r#"
gratia:
  host: db.example.org
  user: auditor
"#;
        let site = r#"
gratia:
  user: reader2
report:
  file: out/daily.out
"#;
        let cfg = ReconcileConfig::from_yaml_layers(&[base, site]).unwrap();
        assert_eq!(cfg.gratia.host, "db.example.org");
        assert_eq!(cfg.gratia.user, "reader2");
        assert_eq!(cfg.gratia.database, "gratia");
        assert_eq!(cfg.report.file, PathBuf::from("out/daily.out"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let doc = r#"
gratia:
  hostname: typo.example.org
"#;
        assert!(ReconcileConfig::from_yaml_layers(&[doc]).is_err());
    }

    #[test]
    fn load_layered_reads_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = dir.path().join("base.yaml");
        let p2 = dir.path().join("site.yaml");
        fs::write(&p1, "gracc:\n  timeout_secs: 30\n").unwrap();
        fs::write(&p2, "gracc:\n  timeout_secs: 90\n").unwrap();

        let cfg = ReconcileConfig::load_layered(&[p1, p2]).unwrap();
        assert_eq!(cfg.gracc.timeout_secs, 90);
    }

    #[test]
    fn missing_layer_file_is_an_error() {
        let err = ReconcileConfig::load_layered(&[PathBuf::from("/no/such/layer.yaml")])
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to read config layer"));
    }
}
