//! Build-time architecture flag

use core::fmt;

use crate::variant::VariantId;

/// Tri-state architecture flag, fixed for the lifetime of an artifact.
///
/// `Unset` takes the legacy branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchitectureFlag {
    #[default]
    Unset,
    Legacy,
    Modern,
}

impl ArchitectureFlag {
    pub const ALL: [ArchitectureFlag; 3] = [
        ArchitectureFlag::Unset,
        ArchitectureFlag::Legacy,
        ArchitectureFlag::Modern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArchitectureFlag::Unset => "unset",
            ArchitectureFlag::Legacy => "legacy",
            ArchitectureFlag::Modern => "modern",
        }
    }

    /// Variant family this flag selects.
    pub fn variant(&self) -> VariantId {
        match self {
            ArchitectureFlag::Unset | ArchitectureFlag::Legacy => VariantId::Legacy,
            ArchitectureFlag::Modern => VariantId::Modern,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, ArchitectureFlag::Unset)
    }
}

impl fmt::Display for ArchitectureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_takes_legacy_branch() {
        assert_eq!(ArchitectureFlag::default(), ArchitectureFlag::Unset);
        assert_eq!(ArchitectureFlag::Unset.variant(), VariantId::Legacy);
        assert_eq!(ArchitectureFlag::Legacy.variant(), VariantId::Legacy);
        assert_eq!(ArchitectureFlag::Modern.variant(), VariantId::Modern);
    }

    #[test]
    fn test_is_set() {
        assert!(!ArchitectureFlag::Unset.is_set());
        assert!(ArchitectureFlag::Legacy.is_set());
        assert_eq!(ArchitectureFlag::Modern.to_string(), "modern");
    }
}
