//! # dualvariant-core
//!
//! Core types and traits for the dual-implementation dispatcher.
//!
//! This crate knows nothing about either variant's implementation. It
//! defines the seams every other crate programs against:
//!
//! ## Modules
//!
//! - `flag` - Build-time architecture flag
//! - `variant` - Variant ids, descriptors and registry entries
//! - `probe` - Capability probe result and the probe/marker traits
//! - `component` - The capability set every variant exposes
//! - `conformance` - Conformance suite run against every variant
//! - `error` - Runtime error types
//! - `kprint` - Leveled stderr logging macros
//! - `env` - Environment variable utilities

pub mod flag;
pub mod variant;
pub mod probe;
pub mod component;
pub mod conformance;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use flag::ArchitectureFlag;
pub use variant::{
    descriptor, MarkerRequirement, VariantDescriptor, VariantEntry, VariantId, DESCRIPTORS,
    LEGACY, MODERN, MODERN_RUNTIME_MARKER,
};
pub use probe::{CapabilityProbe, MarkerSource, MarkerState, ProbeResult};
pub use component::Component;
pub use error::{BindError, BindResult, MarkerError};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};

// Shared library types that appear in the capability set
pub use dualvariant_shared::{PropertyError, PropertyValue, ResourceId, COMPONENT_NAME};
