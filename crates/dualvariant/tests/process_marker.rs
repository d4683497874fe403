//! Facade resolution on a modern host runtime.
//!
//! Own test binary: installs the process capability marker.

use std::sync::Once;

use dualvariant::{build_info, install_marker, BindError, MarkerState, ModernRuntimeMarker, VariantId};

fn install() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        install_marker(ModernRuntimeMarker { revision: 2 }).unwrap();
    });
}

#[test]
fn marker_is_detected() {
    install();
    let result = dualvariant::probe();
    assert!(result.detected);
    assert_eq!(result.marker, MarkerState::Active { revision: 2 });
}

#[test]
fn marker_cannot_be_replaced() {
    install();
    assert!(install_marker(false).is_err());
    assert!(dualvariant::probe().detected);
}

#[test]
fn binding_follows_marker() {
    install();
    let modern_compiled = build_info::COMPILED_VARIANTS.contains(&"modern");

    match dualvariant::resolve() {
        Ok(binding) => {
            assert!(modern_compiled);
            assert_eq!(binding.active, VariantId::Modern);
        }
        Err(BindError::InconsistentBinding { detected, compiled }) => {
            assert!(!modern_compiled);
            assert_eq!(detected, VariantId::Modern);
            assert_eq!(compiled, dualvariant::compiled_variants());
            // fails the same way every time
            assert!(matches!(
                dualvariant::resolve(),
                Err(BindError::InconsistentBinding { .. })
            ));
        }
        Err(other) => panic!("unexpected error: {}", other),
    }
}
