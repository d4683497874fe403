//! Runtime error types
//!
//! Build-time errors live in `dualvariant-build`. At runtime only binding
//! can fail; probing is total.

use core::fmt;

use crate::variant::VariantId;

/// Result type for facade resolution
pub type BindResult<T> = Result<T, BindError>;

/// Errors surfaced by the facade binder. Cached: a failed resolution is a
/// configuration defect and is never retried within the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The runtime marker asks for a variant that was not compiled into
    /// this artifact.
    InconsistentBinding {
        detected: VariantId,
        compiled: Vec<VariantId>,
    },

    /// Zero or several descriptors accept the probe outcome.
    NoUniqueVariant { detected: bool, matches: usize },

    /// The variant constructor panicked. Cached like any other failure.
    ConstructionPanicked { variant: VariantId, message: String },

    /// Another variant already registered the component's global name.
    NameConflict {
        name: &'static str,
        existing: VariantId,
        requested: VariantId,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::InconsistentBinding { detected, compiled } => {
                write!(
                    f,
                    "configuration mismatch: runtime marker selects the {} variant but this artifact was built with [",
                    detected
                )?;
                for (i, id) in compiled.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", id)?;
                }
                write!(f, "]")
            }
            BindError::NoUniqueVariant { detected, matches } => write!(
                f,
                "{} variant descriptors accept a probe with detected={}, expected exactly one",
                matches, detected
            ),
            BindError::ConstructionPanicked { variant, message } => {
                write!(f, "{} variant constructor panicked: {}", variant, message)
            }
            BindError::NameConflict { name, existing, requested } => write!(
                f,
                "component {:?} already registered by the {} variant, refusing {} registration",
                name, existing, requested
            ),
        }
    }
}

impl std::error::Error for BindError {}

/// Errors from the process-global marker slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerError {
    /// The marker is written once, before application code runs.
    AlreadyInstalled,
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerError::AlreadyInstalled => write!(f, "capability marker already installed"),
        }
    }
}

impl std::error::Error for MarkerError {}
