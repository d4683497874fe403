//! Artifact inclusion strategies
//!
//! Both strategies answer the same question: which compiled variant roots
//! end up in the artifact. They differ in who enforces exclusivity.
//!
//! | Strategy                 | Included                 | Exclusivity          |
//! |--------------------------|--------------------------|----------------------|
//! | `conditional`            | selected variant only    | compiler (`--cfg`)   |
//! | `disjoint`               | selected root only       | root selection       |
//! | `disjoint-all`           | every compiled root      | facade binder        |

use dualvariant_core::{VariantDescriptor, VariantId};

use crate::error::{BuildResult, ConfigurationError, MissingVariantError};

/// Environment variable naming the strategy
pub const INCLUSION_ENV: &str = "DUALVARIANT_INCLUSION";

/// Root of the code both variants share, relative to the workspace root
pub const SHARED_ROOT: &str = "crates/dualvariant-shared/src";

/// Outcome of a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    /// Variants compiled into the artifact, in descriptor order
    pub variants: Vec<&'static VariantDescriptor>,
    /// Extra roots the artifact is composed from
    pub shared_roots: Vec<&'static str>,
    /// Surfaced as `cargo:warning`
    pub warnings: Vec<String>,
}

pub trait InclusionStrategy {
    fn name(&self) -> &'static str;

    /// Decide what to include. `compiled` lists the variant roots cargo is
    /// building (feature enabled).
    fn include(
        &self,
        selected: &'static VariantDescriptor,
        descriptors: &'static [VariantDescriptor],
        compiled: &[VariantId],
    ) -> BuildResult<Inclusion>;
}

fn require_compiled(selected: &'static VariantDescriptor, compiled: &[VariantId]) -> BuildResult<()> {
    if compiled.contains(&selected.id) {
        Ok(())
    } else {
        Err(MissingVariantError::NotCompiled {
            variant: selected.id,
            feature: selected.cargo_feature,
        }
        .into())
    }
}

/// Compiler-enforced exclusivity: only the selected variant's cfg is set,
/// so nothing from the other variant is referenced or linked. The shared
/// root is always part of the artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalCompilation;

impl InclusionStrategy for ConditionalCompilation {
    fn name(&self) -> &'static str {
        "conditional"
    }

    fn include(
        &self,
        selected: &'static VariantDescriptor,
        _descriptors: &'static [VariantDescriptor],
        compiled: &[VariantId],
    ) -> BuildResult<Inclusion> {
        require_compiled(selected, compiled)?;
        Ok(Inclusion {
            variants: vec![selected],
            shared_roots: vec![SHARED_ROOT],
            warnings: Vec::new(),
        })
    }
}

/// Three disjoint roots (shared, legacy-only, modern-only) composed by the
/// build system.
///
/// With `exclude_unselected`, only the selected root is included. Without
/// it the toolchain is assumed unable to drop a root, every compiled root
/// is packaged, and exclusivity is left to the runtime binder.
#[derive(Debug, Clone, Copy)]
pub struct DisjointRoots {
    pub exclude_unselected: bool,
}

impl InclusionStrategy for DisjointRoots {
    fn name(&self) -> &'static str {
        if self.exclude_unselected {
            "disjoint"
        } else {
            "disjoint-all"
        }
    }

    fn include(
        &self,
        selected: &'static VariantDescriptor,
        descriptors: &'static [VariantDescriptor],
        compiled: &[VariantId],
    ) -> BuildResult<Inclusion> {
        require_compiled(selected, compiled)?;

        let mut warnings = Vec::new();
        let variants: Vec<&'static VariantDescriptor> = if self.exclude_unselected {
            for d in descriptors.iter().filter(|d| d.id != selected.id && compiled.contains(&d.id)) {
                warnings.push(format!(
                    "{} root is compiled but excluded; disable feature {:?} to skip building it",
                    d.id, d.cargo_feature
                ));
            }
            vec![selected]
        } else {
            descriptors.iter().filter(|d| compiled.contains(&d.id)).collect()
        };

        if variants.len() > 1 {
            warnings.push(format!(
                "{} variant roots packaged; exclusivity deferred to the runtime binder",
                variants.len()
            ));
        }

        Ok(Inclusion {
            variants,
            shared_roots: vec![SHARED_ROOT],
            warnings,
        })
    }
}

/// Strategy for a `DUALVARIANT_INCLUSION` value. Unset means `conditional`.
pub fn strategy_from_name(name: Option<&str>) -> Result<Box<dyn InclusionStrategy>, ConfigurationError> {
    match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("conditional") | Some("cfg") => Ok(Box::new(ConditionalCompilation)),
        Some("disjoint") => Ok(Box::new(DisjointRoots { exclude_unselected: true })),
        Some("disjoint-all") => Ok(Box::new(DisjointRoots { exclude_unselected: false })),
        Some(_) => Err(ConfigurationError::UnknownStrategy(
            name.unwrap_or_default().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualvariant_core::{DESCRIPTORS, LEGACY, MODERN};

    fn ids(inclusion: &Inclusion) -> Vec<VariantId> {
        inclusion.variants.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_conditional_includes_selected_only() {
        let both = [VariantId::Legacy, VariantId::Modern];
        let inc = ConditionalCompilation
            .include(&DESCRIPTORS[1], &DESCRIPTORS, &both)
            .unwrap();
        assert_eq!(ids(&inc), vec![VariantId::Modern]);
        assert_eq!(inc.shared_roots, vec![SHARED_ROOT]);
        assert!(inc.warnings.is_empty());
    }

    #[test]
    fn test_selected_must_be_compiled() {
        let err = ConditionalCompilation
            .include(&DESCRIPTORS[1], &DESCRIPTORS, &[VariantId::Legacy])
            .unwrap_err();
        assert!(err.to_string().contains(MODERN.cargo_feature));

        let err = DisjointRoots { exclude_unselected: false }
            .include(&DESCRIPTORS[0], &DESCRIPTORS, &[VariantId::Modern])
            .unwrap_err();
        assert!(err.to_string().contains(LEGACY.cargo_feature));
    }

    #[test]
    fn test_disjoint_excludes_unselected_root() {
        let both = [VariantId::Legacy, VariantId::Modern];
        let inc = DisjointRoots { exclude_unselected: true }
            .include(&DESCRIPTORS[0], &DESCRIPTORS, &both)
            .unwrap();
        assert_eq!(ids(&inc), vec![VariantId::Legacy]);
        assert_eq!(inc.shared_roots, vec![SHARED_ROOT]);
        assert_eq!(inc.warnings.len(), 1);
    }

    #[test]
    fn test_disjoint_all_packages_every_compiled_root() {
        let both = [VariantId::Modern, VariantId::Legacy];
        let inc = DisjointRoots { exclude_unselected: false }
            .include(&DESCRIPTORS[0], &DESCRIPTORS, &both)
            .unwrap();
        assert_eq!(ids(&inc), vec![VariantId::Legacy, VariantId::Modern]);
        assert!(inc.warnings[0].contains("deferred to the runtime binder"));

        let inc = DisjointRoots { exclude_unselected: false }
            .include(&DESCRIPTORS[0], &DESCRIPTORS, &[VariantId::Legacy])
            .unwrap();
        assert_eq!(ids(&inc), vec![VariantId::Legacy]);
        assert!(inc.warnings.is_empty());
    }

    #[test]
    fn test_strategy_from_name() {
        assert_eq!(strategy_from_name(None).unwrap().name(), "conditional");
        assert_eq!(strategy_from_name(Some("CFG")).unwrap().name(), "conditional");
        assert_eq!(strategy_from_name(Some("disjoint")).unwrap().name(), "disjoint");
        assert_eq!(strategy_from_name(Some("disjoint-all")).unwrap().name(), "disjoint-all");
        assert!(matches!(
            strategy_from_name(Some("both")),
            Err(ConfigurationError::UnknownStrategy(_))
        ));
    }
}
