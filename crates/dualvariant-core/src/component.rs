//! The capability set exposed through the facade
//!
//! Both variants implement `Component`. Callers hold a `&dyn Component` and
//! never branch on which variant is behind it.

use dualvariant_shared::{PropertyError, PropertyValue, ResourceId};

/// Operations every variant provides, with identical argument shapes.
pub trait Component: Send + Sync {
    /// Name the component registers under (same for both variants).
    fn name(&self) -> &'static str;

    /// Construct a resource of `kind`.
    fn create(&self, kind: &str) -> Result<ResourceId, PropertyError>;

    /// Apply a named property. The update may become visible to the
    /// underlying platform only on `commit`, but `property` always observes it.
    fn set_property(
        &self,
        id: ResourceId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), PropertyError>;

    /// Latest value of a property.
    fn property(&self, id: ResourceId, name: &str) -> Option<PropertyValue>;

    /// Flush pending updates to the platform. Returns how many were applied.
    fn commit(&self) -> usize;

    /// Drop a resource. Returns false if it was not known.
    fn destroy(&self, id: ResourceId) -> bool;

    /// Number of live resources.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
