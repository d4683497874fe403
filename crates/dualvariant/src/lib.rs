//! # dualvariant
//!
//! One component, two mutually exclusive implementations, one entry point.
//!
//! The build script picks the variant compiled into this artifact from the
//! architecture flag. At process start the capability probe reads the
//! marker the host runtime installed, and `resolve()` binds the facade to
//! the matching variant. A mismatch between the two is an error, never a
//! silent fallback.
//!
//! ```rust,ignore
//! let view = dualvariant::resolve()?;
//! let id = view.create("view")?;
//! view.set_property(id, "opacity", 0.5.into())?;
//! view.commit();
//! ```

use std::sync::OnceLock;

use dualvariant_core::CapabilityProbe;
use dualvariant_runtime::{global_probe, ProcessProbe};

pub use dualvariant_core::{
    ArchitectureFlag, BindError, BindResult, Component, MarkerState, ProbeResult, PropertyError,
    PropertyValue, ResourceId, VariantId,
};
pub use dualvariant_runtime::{
    install_marker, FacadeBinder, FacadeBinding, ModernRuntimeMarker, VariantRegistry,
};

/// Build configuration generated by `build.rs`
pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/dualvariant_build.rs"));
}

cfg_if::cfg_if! {
    if #[cfg(all(dualvariant_legacy, dualvariant_modern))] {
        fn compiled_registry() -> VariantRegistry {
            VariantRegistry::new()
                .register(dualvariant_legacy::entry())
                .register(dualvariant_modern::entry())
        }
    } else if #[cfg(dualvariant_legacy)] {
        fn compiled_registry() -> VariantRegistry {
            VariantRegistry::new().register(dualvariant_legacy::entry())
        }
    } else if #[cfg(dualvariant_modern)] {
        fn compiled_registry() -> VariantRegistry {
            VariantRegistry::new().register(dualvariant_modern::entry())
        }
    } else {
        compile_error!("no dualvariant variant root included; build.rs did not resolve the architecture flag");
    }
}

fn binder() -> &'static FacadeBinder<&'static ProcessProbe> {
    static BINDER: OnceLock<FacadeBinder<&'static ProcessProbe>> = OnceLock::new();
    BINDER.get_or_init(|| FacadeBinder::new(global_probe(), compiled_registry()))
}

/// Architecture flag this artifact was built with.
pub fn build_flag() -> ArchitectureFlag {
    match build_info::FLAG {
        "modern" => ArchitectureFlag::Modern,
        "legacy" => ArchitectureFlag::Legacy,
        _ => ArchitectureFlag::Unset,
    }
}

/// Variants compiled into this artifact.
pub fn compiled_variants() -> Vec<VariantId> {
    binder().registry().ids()
}

/// Probe the live runtime. Inspects the capability marker once per process.
pub fn probe() -> &'static ProbeResult {
    global_probe().probe()
}

/// The facade binding.
///
/// Built on the first call; every later call, from any thread, returns the
/// same binding or the same error.
pub fn resolve() -> BindResult<&'static FacadeBinding> {
    binder().resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_consistent() {
        assert_eq!(build_info::MODERN_ENABLED, build_info::ARCHITECTURE == "modern");
        assert_eq!(build_flag().variant().as_str(), build_info::ARCHITECTURE);
        assert!(build_info::COMPILED_VARIANTS.contains(&build_info::ARCHITECTURE));
    }

    #[test]
    fn test_registry_matches_build_info() {
        let names: Vec<&str> = compiled_variants().iter().map(|id| id.as_str()).collect();
        assert_eq!(names, build_info::COMPILED_VARIANTS);
    }
}
