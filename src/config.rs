//! # Client configuration.
//!
//! [`Config`] defines everything the client needs to talk to a collector:
//! credential token, software version, collector endpoint, and whether the
//! console mirror is muted. [`Overrides`] is its per-record counterpart —
//! any subset of the same fields, merged field-by-field over the client
//! config when a record is created.
//!
//! # Example
//! ```
//! use gulog::{Config, Overrides};
//!
//! let cfg = Config::new("t0k3n", "1.4.0");
//! assert_eq!(cfg.endpoint, gulog::DEFAULT_ENDPOINT);
//! assert!(!cfg.mute_console);
//!
//! let staging = cfg.merged(&Overrides {
//!     endpoint: Some("https://staging.gulog.io".into()),
//!     ..Overrides::default()
//! });
//! assert_eq!(staging.endpoint, "https://staging.gulog.io");
//! assert_eq!(staging.token, "t0k3n");
//! ```

use crate::error::ConfigError;

/// Default collector base address.
pub const DEFAULT_ENDPOINT: &str = "https://gulog.io";

/// Configuration for a gulog client.
///
/// Validated once at client construction and immutable afterwards. Each
/// record captures its own effective copy (see [`Config::merged`]), so
/// records created with overrides never observe each other's settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Credential token created on the collector panel for this software.
    pub token: String,
    /// Version of this software, semver format (major.minor.patch).
    pub version: String,
    /// Base address of the collector.
    pub endpoint: String,
    /// Suppresses console mirroring only; never suppresses remote delivery.
    pub mute_console: bool,
}

impl Config {
    /// Creates a configuration with the required fields and documented
    /// defaults (`endpoint = DEFAULT_ENDPOINT`, `mute_console = false`).
    pub fn new(token: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            version: version.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            mute_console: false,
        }
    }

    /// Returns a new config with the collector endpoint replaced.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Returns a new config with console mirroring muted or unmuted.
    pub fn with_mute_console(mut self, mute: bool) -> Self {
        self.mute_console = mute;
        self
    }

    /// Checks the "must initialize before use" precondition.
    ///
    /// A client cannot be constructed from a config that fails here, so
    /// every record-scoped operation is guaranteed a usable token/version.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.version.is_empty() {
            return Err(ConfigError::MissingVersion);
        }
        Ok(())
    }

    /// Computes the effective configuration for one record.
    ///
    /// Override fields that are `Some` take precedence; `None` fields fall
    /// back to this config's values.
    pub fn merged(&self, overrides: &Overrides) -> Config {
        Config {
            token: overrides.token.clone().unwrap_or_else(|| self.token.clone()),
            version: overrides
                .version
                .clone()
                .unwrap_or_else(|| self.version.clone()),
            endpoint: overrides
                .endpoint
                .clone()
                .unwrap_or_else(|| self.endpoint.clone()),
            mute_console: overrides.mute_console.unwrap_or(self.mute_console),
        }
    }
}

/// Per-record configuration overrides.
///
/// Any subset of [`Config`] fields; absent fields inherit the client
/// config. Passed to record creation, applied once, never re-read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replacement credential token.
    pub token: Option<String>,
    /// Replacement software version.
    pub version: Option<String>,
    /// Replacement collector endpoint.
    pub endpoint: Option<String>,
    /// Replacement console-mute flag.
    pub mute_console: Option<bool>,
}

impl Overrides {
    /// Returns true if no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
            && self.version.is_none()
            && self.endpoint.is_none()
            && self.mute_console.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let cfg = Config::new("t", "1.0.0");
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert!(!cfg.mute_console);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_token_rejected() {
        let cfg = Config::new("", "1.0.0");
        assert_eq!(cfg.validate(), Err(ConfigError::MissingToken));
    }

    #[test]
    fn missing_version_rejected() {
        let cfg = Config::new("t", "");
        assert_eq!(cfg.validate(), Err(ConfigError::MissingVersion));
    }

    #[test]
    fn merge_prefers_present_override_fields() {
        let cfg = Config::new("t", "1.0.0").with_mute_console(true);
        let eff = cfg.merged(&Overrides {
            token: Some("other".into()),
            mute_console: Some(false),
            ..Overrides::default()
        });
        assert_eq!(eff.token, "other");
        assert_eq!(eff.version, "1.0.0");
        assert_eq!(eff.endpoint, DEFAULT_ENDPOINT);
        assert!(!eff.mute_console);
    }

    #[test]
    fn empty_overrides_are_identity() {
        let cfg = Config::new("t", "1.0.0").with_endpoint("http://localhost:7070");
        assert!(Overrides::default().is_empty());
        assert_eq!(cfg.merged(&Overrides::default()), cfg);
    }
}
