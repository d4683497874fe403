//! Build-time error types. All of them abort the build.

use std::fmt;
use std::path::PathBuf;

use dualvariant_core::{ArchitectureFlag, VariantId};

pub type BuildResult<T> = Result<T, BuildError>;

/// Flag or strategy input that cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Value is not one of the recognized spellings
    Unrecognized { input: &'static str, value: String },

    /// Environment and manifest property disagree
    Contradictory {
        env: ArchitectureFlag,
        property: ArchitectureFlag,
    },

    /// Zero or several descriptors match the flag
    NoUniqueVariant { flag: ArchitectureFlag, matches: usize },

    /// `DUALVARIANT_INCLUSION` names no known strategy
    UnknownStrategy(String),

    /// Manifest could not be read as TOML, or the property is not a string
    InvalidManifest(String),

    /// Cargo did not provide a required build script variable
    MissingEnv(&'static str),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::Unrecognized { input, value } => write!(
                f,
                "unrecognized architecture flag {:?} in {} (expected 1/true/modern or 0/false/legacy)",
                value, input
            ),
            ConfigurationError::Contradictory { env, property } => write!(
                f,
                "contradictory architecture flag: environment says {} but manifest property says {}",
                env, property
            ),
            ConfigurationError::NoUniqueVariant { flag, matches } => write!(
                f,
                "architecture flag {} matches {} variant descriptors, expected exactly one",
                flag, matches
            ),
            ConfigurationError::UnknownStrategy(name) => write!(
                f,
                "unknown inclusion strategy {:?} (expected conditional, disjoint or disjoint-all)",
                name
            ),
            ConfigurationError::InvalidManifest(msg) => write!(f, "invalid manifest: {}", msg),
            ConfigurationError::MissingEnv(key) => write!(f, "{} not set by cargo", key),
        }
    }
}

/// The selected variant's code is not available to this build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingVariantError {
    /// A source root does not exist on disk
    SourceMissing { owner: &'static str, path: PathBuf },

    /// The root exists but its cargo feature is off
    NotCompiled { variant: VariantId, feature: &'static str },
}

impl fmt::Display for MissingVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingVariantError::SourceMissing { owner, path } => {
                write!(f, "{} source root missing: {}", owner, path.display())
            }
            MissingVariantError::NotCompiled { variant, feature } => write!(
                f,
                "{} variant selected but its source root is not compiled (enable feature {:?})",
                variant, feature
            ),
        }
    }
}

#[derive(Debug)]
pub enum BuildError {
    Configuration(ConfigurationError),
    MissingVariant(MissingVariantError),
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Configuration(e) => write!(f, "configuration error: {}", e),
            BuildError::MissingVariant(e) => write!(f, "missing variant: {}", e),
            BuildError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for BuildError {
    fn from(e: ConfigurationError) -> Self {
        BuildError::Configuration(e)
    }
}

impl From<MissingVariantError> for BuildError {
    fn from(e: MissingVariantError) -> Self {
        BuildError::MissingVariant(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e: BuildError = ConfigurationError::Contradictory {
            env: ArchitectureFlag::Legacy,
            property: ArchitectureFlag::Modern,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "configuration error: contradictory architecture flag: environment says legacy but manifest property says modern"
        );

        let e: BuildError = MissingVariantError::NotCompiled {
            variant: VariantId::Modern,
            feature: "modern",
        }
        .into();
        assert_eq!(
            e.to_string(),
            "missing variant: modern variant selected but its source root is not compiled (enable feature \"modern\")"
        );
    }
}
