//! Error types for shared component logic

use core::fmt;

/// Result type for shared operations
pub type SharedResult<T> = Result<T, PropertyError>;

/// Errors raised while constructing resources or applying properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// Resource kind is empty or not an identifier
    InvalidKind(String),

    /// Property name is empty or not an identifier
    InvalidName(String),

    /// Property exists with a different value type
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Resource id not owned by this component
    UnknownResource(u64),
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::InvalidKind(kind) => write!(f, "invalid resource kind {:?}", kind),
            PropertyError::InvalidName(name) => write!(f, "invalid property name {:?}", name),
            PropertyError::TypeMismatch { name, expected, found } => write!(
                f,
                "property {:?} holds {} but {} was given",
                name, expected, found
            ),
            PropertyError::UnknownResource(id) => write!(f, "unknown resource res#{}", id),
        }
    }
}

impl std::error::Error for PropertyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PropertyError::InvalidName(String::new());
        assert_eq!(format!("{}", e), "invalid property name \"\"");

        let e = PropertyError::TypeMismatch {
            name: "opacity".into(),
            expected: "float",
            found: "text",
        };
        assert_eq!(
            format!("{}", e),
            "property \"opacity\" holds float but text was given"
        );
    }
}
