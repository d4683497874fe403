//! Variant identity and build-time descriptors
//!
//! A `VariantDescriptor` maps a variant to its activation condition, its
//! source root and the capability marker the live runtime must present for
//! it. The two descriptors are static: the build resolver reads them from
//! `build.rs`, the binder reads them at runtime.

use std::fmt;
use std::sync::Arc;

use crate::component::Component;
use crate::flag::ArchitectureFlag;

/// Name of the capability marker the modern runtime installs.
pub const MODERN_RUNTIME_MARKER: &str = "dualvariant.modern-runtime";

/// The two implementation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum VariantId {
    Legacy = 0,
    Modern = 1,
}

impl VariantId {
    pub const ALL: [VariantId; 2] = [VariantId::Legacy, VariantId::Modern];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantId::Legacy => "legacy",
            VariantId::Modern => "modern",
        }
    }

    pub fn from_name(name: &str) -> Option<VariantId> {
        match name {
            "legacy" => Some(VariantId::Legacy),
            "modern" => Some(VariantId::Modern),
            _ => None,
        }
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the runtime capability marker must look like for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRequirement {
    /// No marker (or an inactive one).
    Absent,
    /// The named marker is present and active.
    Present(&'static str),
}

impl MarkerRequirement {
    /// Whether a probe that did (or did not) detect the modern runtime
    /// meets this requirement.
    pub fn satisfied_by(&self, detected: bool) -> bool {
        match self {
            MarkerRequirement::Absent => !detected,
            MarkerRequirement::Present(_) => detected,
        }
    }
}

impl fmt::Display for MarkerRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerRequirement::Absent => f.write_str("no marker"),
            MarkerRequirement::Present(name) => write!(f, "marker {}", name),
        }
    }
}

/// Build-time record of one variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantDescriptor {
    pub id: VariantId,
    /// Holds for exactly the flag values that select this variant.
    pub build_condition: fn(ArchitectureFlag) -> bool,
    /// Source roots, relative to the workspace root.
    pub source_paths: &'static [&'static str],
    pub required_marker: MarkerRequirement,
    /// `--cfg` name emitted when this variant is included.
    pub cfg_name: &'static str,
    /// Cargo feature on the facade crate that compiles this root.
    pub cargo_feature: &'static str,
}

impl VariantDescriptor {
    #[inline]
    pub fn selected_by(&self, flag: ArchitectureFlag) -> bool {
        (self.build_condition)(flag)
    }
}

impl PartialEq for VariantDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VariantDescriptor {}

fn legacy_condition(flag: ArchitectureFlag) -> bool {
    matches!(flag, ArchitectureFlag::Unset | ArchitectureFlag::Legacy)
}

fn modern_condition(flag: ArchitectureFlag) -> bool {
    matches!(flag, ArchitectureFlag::Modern)
}

pub const LEGACY: VariantDescriptor = VariantDescriptor {
    id: VariantId::Legacy,
    build_condition: legacy_condition,
    source_paths: &["crates/dualvariant-legacy/src"],
    required_marker: MarkerRequirement::Absent,
    cfg_name: "dualvariant_legacy",
    cargo_feature: "legacy",
};

pub const MODERN: VariantDescriptor = VariantDescriptor {
    id: VariantId::Modern,
    build_condition: modern_condition,
    source_paths: &["crates/dualvariant-modern/src"],
    required_marker: MarkerRequirement::Present(MODERN_RUNTIME_MARKER),
    cfg_name: "dualvariant_modern",
    cargo_feature: "modern",
};

/// All known variants, in `VariantId` order.
pub static DESCRIPTORS: [VariantDescriptor; 2] = [LEGACY, MODERN];

/// Descriptor for a variant id.
pub fn descriptor(id: VariantId) -> &'static VariantDescriptor {
    &DESCRIPTORS[id as usize]
}

/// What a compiled variant contributes to the runtime registry.
#[derive(Clone, Copy)]
pub struct VariantEntry {
    pub descriptor: &'static VariantDescriptor,
    /// Builds the variant's component. May have process-wide side effects,
    /// so the binder calls it at most once.
    pub construct: fn() -> Arc<dyn Component>,
}

impl VariantEntry {
    pub fn id(&self) -> VariantId {
        self.descriptor.id
    }
}

impl fmt::Debug for VariantEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantEntry")
            .field("variant", &self.descriptor.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_condition_per_flag() {
        for flag in ArchitectureFlag::ALL {
            let selected: Vec<_> = DESCRIPTORS.iter().filter(|d| d.selected_by(flag)).collect();
            assert_eq!(selected.len(), 1, "flag {}", flag);
            assert_eq!(selected[0].id, flag.variant());
        }
    }

    #[test]
    fn test_descriptor_lookup() {
        assert_eq!(descriptor(VariantId::Legacy).id, VariantId::Legacy);
        assert_eq!(descriptor(VariantId::Modern).cfg_name, "dualvariant_modern");
        assert_eq!(
            descriptor(VariantId::Modern).required_marker,
            MarkerRequirement::Present(MODERN_RUNTIME_MARKER)
        );
    }

    #[test]
    fn test_exactly_one_requirement_per_probe_outcome() {
        for detected in [false, true] {
            let met: Vec<_> = DESCRIPTORS
                .iter()
                .filter(|d| d.required_marker.satisfied_by(detected))
                .collect();
            assert_eq!(met.len(), 1, "detected {}", detected);
        }
        assert!(MODERN.required_marker.satisfied_by(true));
        assert!(LEGACY.required_marker.satisfied_by(false));
        assert_eq!(
            MODERN.required_marker.to_string(),
            "marker dualvariant.modern-runtime"
        );
    }

    #[test]
    fn test_source_roots_disjoint() {
        for path in LEGACY.source_paths {
            assert!(!MODERN.source_paths.contains(path));
        }
    }

    #[test]
    fn test_variant_names() {
        for id in VariantId::ALL {
            assert_eq!(VariantId::from_name(id.as_str()), Some(id));
        }
        assert_eq!(VariantId::from_name("paper"), None);
    }
}
