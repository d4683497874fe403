//! End-to-end dispatch scenarios: build plan, probe, binding.
//!
//! Each scenario resolves a real build plan against this workspace, builds
//! the registry the facade would get from it, and binds through a fixed
//! probe. The process marker slot is never touched here.

use std::path::PathBuf;
use std::sync::Arc;

use dualvariant::{
    ArchitectureFlag, BindError, FacadeBinder, MarkerState, PropertyValue, VariantId,
    VariantRegistry,
};
use dualvariant_build::{
    BuildError, ConditionalCompilation, DisjointRoots, InclusionPlan, InclusionStrategy,
    MissingVariantError, VariantResolver,
};
use dualvariant_core::conformance;
use dualvariant_runtime::{NameRegistry, StaticProbe};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn plan(
    strategy: Box<dyn InclusionStrategy>,
    flag: ArchitectureFlag,
    compiled: &[VariantId],
) -> Result<InclusionPlan, BuildError> {
    VariantResolver::new(workspace_root(), strategy).resolve(flag, compiled)
}

/// The registry the facade's cfg-gated registration produces for `plan`.
fn registry_for(plan: &InclusionPlan) -> VariantRegistry {
    plan.included_variants()
        .into_iter()
        .fold(VariantRegistry::new(), |registry, id| match id {
            VariantId::Legacy => registry.register(dualvariant_legacy::entry()),
            VariantId::Modern => registry.register(dualvariant_modern::entry()),
        })
}

fn binder(plan: &InclusionPlan, probe: StaticProbe) -> FacadeBinder<StaticProbe> {
    FacadeBinder::new(probe, registry_for(plan)).with_names(Arc::new(NameRegistry::new()))
}

#[test]
fn unset_flag_absent_marker_binds_legacy() {
    let plan = plan(
        Box::new(ConditionalCompilation),
        ArchitectureFlag::Unset,
        &[VariantId::Legacy],
    )
    .unwrap();
    assert!(!plan.modern_enabled());

    let b = binder(&plan, StaticProbe::absent());
    let binding = b.resolve().unwrap();
    assert_eq!(binding.active, VariantId::Legacy);
    assert_eq!(binding.commit(), 0);
}

#[test]
fn modern_flag_present_marker_binds_modern() {
    let plan = plan(
        Box::new(ConditionalCompilation),
        ArchitectureFlag::Modern,
        &[VariantId::Modern],
    )
    .unwrap();
    assert!(plan.modern_enabled());

    let b = binder(&plan, StaticProbe::new(MarkerState::Active { revision: 1 }));
    let binding = b.resolve().unwrap();
    assert_eq!(binding.active, VariantId::Modern);

    let id = binding.create("view").unwrap();
    binding.set_property(id, "opacity", PropertyValue::Float(0.5)).unwrap();
    assert_eq!(binding.commit(), 1);
}

#[test]
fn legacy_artifact_on_modern_runtime_is_inconsistent() {
    let plan = plan(
        Box::new(ConditionalCompilation),
        ArchitectureFlag::Legacy,
        &[VariantId::Legacy, VariantId::Modern],
    )
    .unwrap();
    assert_eq!(plan.included_variants(), vec![VariantId::Legacy]);

    let b = binder(&plan, StaticProbe::detected());
    let err = b.resolve().unwrap_err();
    assert_eq!(
        err,
        BindError::InconsistentBinding {
            detected: VariantId::Modern,
            compiled: vec![VariantId::Legacy],
        }
    );
    let message = err.to_string();
    assert!(message.contains("modern") && message.contains("legacy"), "{}", message);

    // cached, not retried
    assert_eq!(b.resolve().unwrap_err(), err);
    assert_eq!(b.constructions(), 0);
}

#[test]
fn malformed_marker_binds_legacy() {
    let plan = plan(
        Box::new(ConditionalCompilation),
        ArchitectureFlag::Unset,
        &[VariantId::Legacy],
    )
    .unwrap();

    let probe = StaticProbe::new(MarkerState::Malformed {
        found: "alloc::string::String".into(),
    });
    let b = binder(&plan, probe);
    assert_eq!(b.resolve().unwrap().active, VariantId::Legacy);
}

#[test]
fn modern_flag_without_modern_feature_fails_build() {
    let err = plan(
        Box::new(ConditionalCompilation),
        ArchitectureFlag::Modern,
        &[VariantId::Legacy],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BuildError::MissingVariant(MissingVariantError::NotCompiled {
            variant: VariantId::Modern,
            ..
        })
    ));
}

#[test]
fn disjoint_all_defers_to_binder() {
    let plan = plan(
        Box::new(DisjointRoots {
            exclude_unselected: false,
        }),
        ArchitectureFlag::Unset,
        &[VariantId::Legacy, VariantId::Modern],
    )
    .unwrap();
    assert_eq!(plan.included_variants(), VariantId::ALL.to_vec());
    assert!(!plan.warnings().is_empty());

    // Both roots packaged; the marker alone decides.
    assert_eq!(
        binder(&plan, StaticProbe::absent()).resolve().unwrap().active,
        VariantId::Legacy
    );
    assert_eq!(
        binder(&plan, StaticProbe::detected()).resolve().unwrap().active,
        VariantId::Modern
    );
}

#[test]
fn both_bindings_pass_conformance() {
    let plan = plan(
        Box::new(DisjointRoots {
            exclude_unselected: false,
        }),
        ArchitectureFlag::Unset,
        &[VariantId::Legacy, VariantId::Modern],
    )
    .unwrap();

    for probe in [StaticProbe::absent(), StaticProbe::detected()] {
        let b = binder(&plan, probe);
        let binding = b.resolve().unwrap();
        if let Err(failure) = conformance::exercise(&**binding) {
            panic!("{} variant: {}", binding.active, failure);
        }
    }
}
