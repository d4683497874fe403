//! # dualvariant-shared
//!
//! Implementation-agnostic logic used identically by both the legacy and
//! the modern variant. This crate is a leaf: it has no dependency on either
//! variant's types, and no behavior in here may differ between them.
//!
//! Variant-specific behavior belongs in the adapter crates
//! (`dualvariant-legacy`, `dualvariant-modern`), never here.
//!
//! ## Modules
//!
//! - `id` - Resource identifiers and allocator
//! - `property` - Property values and name validation
//! - `resource` - Resource construction and property application
//! - `error` - Error types

pub mod id;
pub mod property;
pub mod resource;
pub mod error;

/// Global name both variants register the component under.
pub const COMPONENT_NAME: &str = "DualView";

pub use id::{IdAllocator, ResourceId};
pub use property::{validate_property_name, PropertyValue};
pub use resource::{apply_property, check_property, construct_resource, Resource};
pub use error::{PropertyError, SharedResult};
