//! # dualvariant-legacy
//!
//! Legacy implementation of the component. Property updates go straight to
//! the underlying resource; there is nothing to flush on `commit`.
//!
//! Only compiled into the facade when the build resolver selects the legacy
//! root.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dualvariant_core::{descriptor, dv_debug, Component, VariantEntry, VariantId};
use dualvariant_shared::{
    apply_property, construct_resource, IdAllocator, PropertyError, PropertyValue, Resource,
    ResourceId, COMPONENT_NAME,
};

/// Immediate-mode component.
#[derive(Debug, Default)]
pub struct LegacyComponent {
    ids: IdAllocator,
    resources: Mutex<HashMap<ResourceId, Resource>>,
}

impl LegacyComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn resources(&self) -> MutexGuard<'_, HashMap<ResourceId, Resource>> {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Component for LegacyComponent {
    fn name(&self) -> &'static str {
        COMPONENT_NAME
    }

    fn create(&self, kind: &str) -> Result<ResourceId, PropertyError> {
        let resource = construct_resource(kind)?;
        let id = self.ids.allocate();
        self.resources().insert(id, resource);
        Ok(id)
    }

    fn set_property(
        &self,
        id: ResourceId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        let mut resources = self.resources();
        let resource = resources
            .get_mut(&id)
            .ok_or(PropertyError::UnknownResource(id.as_u64()))?;
        apply_property(resource, name, value)?;
        Ok(())
    }

    fn property(&self, id: ResourceId, name: &str) -> Option<PropertyValue> {
        self.resources().get(&id)?.get(name).cloned()
    }

    fn commit(&self) -> usize {
        0
    }

    fn destroy(&self, id: ResourceId) -> bool {
        self.resources().remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.resources().len()
    }
}

fn construct() -> Arc<dyn Component> {
    dv_debug!("constructing legacy {}", COMPONENT_NAME);
    Arc::new(LegacyComponent::new())
}

/// Registry entry for the facade binder.
pub fn entry() -> VariantEntry {
    VariantEntry {
        descriptor: descriptor(VariantId::Legacy),
        construct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualvariant_core::conformance;

    #[test]
    fn test_conformance() {
        let component = LegacyComponent::new();
        conformance::exercise(&component).unwrap();
    }

    #[test]
    fn test_updates_apply_immediately() {
        let c = LegacyComponent::new();
        let id = c.create("view").unwrap();
        c.set_property(id, "opacity", PropertyValue::Float(0.3)).unwrap();
        assert_eq!(c.property(id, "opacity"), Some(PropertyValue::Float(0.3)));
        assert_eq!(c.commit(), 0);
    }

    #[test]
    fn test_entry_is_legacy() {
        let e = entry();
        assert_eq!(e.id(), VariantId::Legacy);
        let handle = (e.construct)();
        assert_eq!(handle.name(), COMPONENT_NAME);
        assert!(handle.is_empty());
    }
}
