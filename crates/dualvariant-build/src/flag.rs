//! Architecture flag resolution
//!
//! Two inputs can carry the flag: the `DUALVARIANT_MODERN` environment
//! variable and the facade manifest property
//!
//! ```toml
//! [package.metadata.dualvariant]
//! architecture = "modern"
//! ```
//!
//! Parsing is strict. An unrecognized spelling is a configuration error,
//! never a silent fallback to legacy.

use std::fs;
use std::path::Path;

use dualvariant_core::ArchitectureFlag;

use crate::error::{BuildError, BuildResult, ConfigurationError};

/// Environment variable carrying the flag
pub const FLAG_ENV: &str = "DUALVARIANT_MODERN";

/// Manifest path of the flag property, for diagnostics
const PROPERTY_NAME: &str = "package.metadata.dualvariant.architecture";

fn parse_input(input: &'static str, raw: Option<&str>) -> Result<ArchitectureFlag, ConfigurationError> {
    let Some(raw) = raw else {
        return Ok(ArchitectureFlag::Unset);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(ArchitectureFlag::Unset),
        "1" | "true" | "yes" | "on" | "modern" => Ok(ArchitectureFlag::Modern),
        "0" | "false" | "no" | "off" | "legacy" => Ok(ArchitectureFlag::Legacy),
        _ => Err(ConfigurationError::Unrecognized {
            input,
            value: raw.to_string(),
        }),
    }
}

/// Parse the raw value of `DUALVARIANT_MODERN`. `None` or empty is `Unset`.
pub fn parse_flag(raw: Option<&str>) -> Result<ArchitectureFlag, ConfigurationError> {
    parse_input(FLAG_ENV, raw)
}

/// Combine the environment and manifest inputs.
///
/// Whichever is set wins; if both are set they must agree.
pub fn resolve_flag(
    env: Option<&str>,
    property: Option<&str>,
) -> Result<ArchitectureFlag, ConfigurationError> {
    let env = parse_input(FLAG_ENV, env)?;
    let property = parse_input(PROPERTY_NAME, property)?;
    match (env, property) {
        (ArchitectureFlag::Unset, p) => Ok(p),
        (e, ArchitectureFlag::Unset) => Ok(e),
        (e, p) if e == p => Ok(e),
        (e, p) => Err(ConfigurationError::Contradictory { env: e, property: p }),
    }
}

/// Extract the flag property from manifest text.
pub fn manifest_property(text: &str) -> Result<Option<String>, ConfigurationError> {
    let table = text
        .parse::<toml::Table>()
        .map_err(|e| ConfigurationError::InvalidManifest(e.to_string()))?;

    let value = table
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("dualvariant"))
        .and_then(|d| d.get("architecture"));

    match value {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(toml::Value::Boolean(b)) => Ok(Some(if *b { "1" } else { "0" }.to_string())),
        Some(other) => Err(ConfigurationError::InvalidManifest(format!(
            "{} must be a string or boolean, found {}",
            PROPERTY_NAME,
            other.type_str()
        ))),
    }
}

/// Read the flag property from a `Cargo.toml`.
pub fn read_manifest_property(manifest: &Path) -> BuildResult<Option<String>> {
    let text = fs::read_to_string(manifest).map_err(|source| BuildError::Io {
        path: manifest.to_path_buf(),
        source,
    })?;
    Ok(manifest_property(&text)?)
}
