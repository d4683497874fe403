//! Dispatch configuration
//!
//! Chooses which marker source the process-wide probe reads.
//!
//! ```rust,ignore
//! use dualvariant_runtime::config::{DispatchConfig, MarkerSourceKind};
//!
//! // Defaults with env overrides
//! let config = DispatchConfig::from_env();
//!
//! // Or explicitly
//! let config = DispatchConfig::new()
//!     .marker_source(MarkerSourceKind::Env)
//!     .marker_env("MY_HOST_MARKER");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use dualvariant_core::{dv_warn, env_get_opt, env_get_str, MarkerSource};

use crate::marker::{EnvMarker, ProcessMarker, DEFAULT_MARKER_ENV};
use crate::probe::CachedProbe;

/// Selects the marker source (`process` or `env`)
pub const MARKER_SOURCE_ENV: &str = "DUALVARIANT_MARKER_SOURCE";

/// Variable the `env` source reads
pub const MARKER_ENV_KEY_ENV: &str = "DUALVARIANT_MARKER_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerSourceKind {
    /// In-process marker slot
    #[default]
    Process,
    /// Environment variable
    Env,
}

impl MarkerSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerSourceKind::Process => "process",
            MarkerSourceKind::Env => "env",
        }
    }
}

impl fmt::Display for MarkerSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(MarkerSourceKind::Process),
            "env" => Ok(MarkerSourceKind::Env),
            other => Err(format!("unknown marker source {:?}", other)),
        }
    }
}

/// Runtime dispatch configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub marker_source: MarkerSourceKind,
    /// Variable read when `marker_source` is `Env`
    pub marker_env: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DispatchConfig {
    /// Defaults with environment overrides.
    ///
    /// - `DUALVARIANT_MARKER_SOURCE` - `process` (default) or `env`
    /// - `DUALVARIANT_MARKER_ENV` - variable for the `env` source
    ///   (default `DUALVARIANT_RUNTIME_MARKER`)
    ///
    /// An unknown source name is logged and ignored.
    pub fn from_env() -> Self {
        let marker_source = match env_get_opt::<String>(MARKER_SOURCE_ENV) {
            None => MarkerSourceKind::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                dv_warn!("{}: {}, using process", MARKER_SOURCE_ENV, e);
                MarkerSourceKind::default()
            }),
        };
        Self {
            marker_source,
            marker_env: env_get_str(MARKER_ENV_KEY_ENV, DEFAULT_MARKER_ENV),
        }
    }

    /// Explicit defaults, no environment.
    pub fn new() -> Self {
        Self {
            marker_source: MarkerSourceKind::default(),
            marker_env: DEFAULT_MARKER_ENV.to_string(),
        }
    }

    // Builder methods

    pub fn marker_source(mut self, kind: MarkerSourceKind) -> Self {
        self.marker_source = kind;
        self
    }

    pub fn marker_env(mut self, key: impl Into<String>) -> Self {
        self.marker_env = key.into();
        self
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.marker_source == MarkerSourceKind::Env {
            if self.marker_env.is_empty() {
                return Err("marker_env must not be empty");
            }
            if self.marker_env.contains(['=', '\0']) {
                return Err("marker_env must not contain '=' or NUL");
            }
        }
        Ok(())
    }

    /// The configured marker source.
    pub fn source(&self) -> Box<dyn MarkerSource> {
        match self.marker_source {
            MarkerSourceKind::Process => Box::new(ProcessMarker::new()),
            MarkerSourceKind::Env => Box::new(EnvMarker::new(self.marker_env.clone())),
        }
    }

    pub fn build_probe(&self) -> ProcessProbe {
        CachedProbe::new(self.source())
    }
}

/// Probe type behind `global_probe()`
pub type ProcessProbe = CachedProbe<Box<dyn MarkerSource>>;

/// Process-wide probe, configured from the environment on first use.
///
/// An invalid configuration is logged and replaced by the defaults.
pub fn global_probe() -> &'static ProcessProbe {
    static PROBE: OnceLock<ProcessProbe> = OnceLock::new();
    PROBE.get_or_init(|| {
        let config = DispatchConfig::from_env();
        match config.validate() {
            Ok(()) => config.build_probe(),
            Err(e) => {
                dv_warn!("invalid dispatch config ({}), using defaults", e);
                DispatchConfig::new().build_probe()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::new();
        assert_eq!(config.marker_source, MarkerSourceKind::Process);
        assert_eq!(config.marker_env, DEFAULT_MARKER_ENV);
        assert!(config.validate().is_ok());
        assert_eq!(config.source().name(), "process");
    }

    #[test]
    fn test_builder() {
        let config = DispatchConfig::new()
            .marker_source(MarkerSourceKind::Env)
            .marker_env("HOST_MARKER");
        assert_eq!(config.source().name(), "env");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let config = DispatchConfig::new().marker_source(MarkerSourceKind::Env);
        assert!(config.clone().marker_env("").validate().is_err());
        assert!(config.clone().marker_env("A=B").validate().is_err());
        // Unused by the process source
        assert!(DispatchConfig::new().marker_env("").validate().is_ok());
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("ENV".parse::<MarkerSourceKind>(), Ok(MarkerSourceKind::Env));
        assert_eq!(" process ".parse::<MarkerSourceKind>(), Ok(MarkerSourceKind::Process));
        assert!("registry".parse::<MarkerSourceKind>().is_err());
    }

    #[test]
    fn test_env_probe_reads_configured_key() {
        use dualvariant_core::{CapabilityProbe, MarkerState};

        let key = "__DV_TEST_CONFIG_MARKER__";
        std::env::set_var(key, "4");
        let probe = DispatchConfig::new()
            .marker_source(MarkerSourceKind::Env)
            .marker_env(key)
            .build_probe();
        assert_eq!(probe.probe().marker, MarkerState::Active { revision: 4 });
        std::env::remove_var(key);
    }
}
