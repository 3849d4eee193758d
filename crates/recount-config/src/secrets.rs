//! Runtime secret resolution for the gratia DB password.
//!
//! Contract:
//! - Config YAML stores only the env var NAME (`gratia.password_env`).
//! - Callers resolve once at startup and pass the result into constructors;
//!   `std::env::var` calls are never scattered across the codebase.
//! - `Debug` output redacts the value.
//! - Error messages reference the env var NAME, never the value.

use anyhow::{bail, Result};

/// The gratia database password, resolved once at startup.
#[derive(Clone)]
pub struct GratiaPassword(String);

impl GratiaPassword {
    /// Resolve from an explicit CLI value, falling back to the env var whose
    /// NAME is configured. Blank values count as absent.
    pub fn resolve(cli_value: Option<&str>, env_name: &str) -> Result<Self> {
        if let Some(v) = cli_value.map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(Self(v.to_string()));
        }
        match std::env::var(env_name) {
            Ok(v) if !v.trim().is_empty() => Ok(Self(v)),
            _ => bail!(
                "SECRETS_MISSING: gratia DB password not given via --password and \
                 env var '{env_name}' is not set or empty"
            ),
        }
    }

    /// The secret value, for handing to the DB connector only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for GratiaPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GratiaPassword").field(&"<REDACTED>").finish()
    }
}
