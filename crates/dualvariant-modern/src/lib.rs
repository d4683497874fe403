//! # dualvariant-modern
//!
//! Modern implementation of the component. Updates are validated when they
//! are set, staged in a pending batch and handed to the resource in one
//! pass on `commit`. Reads always see the latest staged value, so callers
//! observe the same state as with the legacy variant.
//!
//! Only compiled into the facade when the build resolver selects the modern
//! root.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dualvariant_core::{descriptor, dv_debug, dv_warn, Component, VariantEntry, VariantId};
use dualvariant_shared::{
    apply_property, check_property, construct_resource, IdAllocator, PropertyError,
    PropertyValue, Resource, ResourceId, COMPONENT_NAME,
};

#[derive(Debug)]
struct PendingUpdate {
    id: ResourceId,
    name: String,
    value: PropertyValue,
}

#[derive(Debug, Default)]
struct State {
    committed: HashMap<ResourceId, Resource>,
    pending: Vec<PendingUpdate>,
}

impl State {
    /// Latest staged value for `(id, name)`.
    fn staged(&self, id: ResourceId, name: &str) -> Option<&PropertyValue> {
        self.pending
            .iter()
            .rev()
            .find(|u| u.id == id && u.name == name)
            .map(|u| &u.value)
    }
}

/// Batched component.
#[derive(Debug, Default)]
pub struct ModernComponent {
    ids: IdAllocator,
    state: Mutex<State>,
}

impl ModernComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Updates waiting for the next `commit`.
    pub fn pending(&self) -> usize {
        self.state().pending.len()
    }
}

impl Component for ModernComponent {
    fn name(&self) -> &'static str {
        COMPONENT_NAME
    }

    fn create(&self, kind: &str) -> Result<ResourceId, PropertyError> {
        let resource = construct_resource(kind)?;
        let id = self.ids.allocate();
        self.state().committed.insert(id, resource);
        Ok(id)
    }

    fn set_property(
        &self,
        id: ResourceId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        let mut state = self.state();
        let resource = state
            .committed
            .get(&id)
            .ok_or(PropertyError::UnknownResource(id.as_u64()))?;
        check_property(resource, name, &value)?;

        // A staged value fixes the type just like a committed one.
        if let Some(staged) = state.staged(id, name) {
            if !staged.same_type(&value) {
                return Err(PropertyError::TypeMismatch {
                    name: name.to_string(),
                    expected: staged.type_name(),
                    found: value.type_name(),
                });
            }
        }

        state.pending.push(PendingUpdate {
            id,
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn property(&self, id: ResourceId, name: &str) -> Option<PropertyValue> {
        let state = self.state();
        let resource = state.committed.get(&id)?;
        state.staged(id, name).or_else(|| resource.get(name)).cloned()
    }

    fn commit(&self) -> usize {
        let mut state = self.state();
        let batch = std::mem::take(&mut state.pending);
        let mut applied = 0;
        for update in batch {
            let Some(resource) = state.committed.get_mut(&update.id) else {
                continue;
            };
            match apply_property(resource, &update.name, update.value) {
                Ok(_) => applied += 1,
                Err(e) => dv_warn!("dropping staged update on {}: {}", update.id, e),
            }
        }
        applied
    }

    fn destroy(&self, id: ResourceId) -> bool {
        let mut state = self.state();
        state.pending.retain(|u| u.id != id);
        state.committed.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.state().committed.len()
    }
}

fn construct() -> Arc<dyn Component> {
    dv_debug!("constructing modern {}", COMPONENT_NAME);
    Arc::new(ModernComponent::new())
}

/// Registry entry for the facade binder.
pub fn entry() -> VariantEntry {
    VariantEntry {
        descriptor: descriptor(VariantId::Modern),
        construct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualvariant_core::conformance;

    #[test]
    fn test_conformance() {
        let component = ModernComponent::new();
        conformance::exercise(&component).unwrap();
    }

    #[test]
    fn test_updates_batched_until_commit() {
        let c = ModernComponent::new();
        let id = c.create("view").unwrap();
        c.set_property(id, "opacity", PropertyValue::Float(0.3)).unwrap();
        c.set_property(id, "opacity", PropertyValue::Float(0.6)).unwrap();
        assert_eq!(c.pending(), 2);
        assert_eq!(c.property(id, "opacity"), Some(PropertyValue::Float(0.6)));

        assert_eq!(c.commit(), 2);
        assert_eq!(c.pending(), 0);
        assert_eq!(c.property(id, "opacity"), Some(PropertyValue::Float(0.6)));
    }

    #[test]
    fn test_staged_value_fixes_type() {
        let c = ModernComponent::new();
        let id = c.create("view").unwrap();
        c.set_property(id, "hidden", PropertyValue::Bool(true)).unwrap();
        let err = c.set_property(id, "hidden", PropertyValue::Int(1)).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { expected: "bool", .. }));
        assert_eq!(c.pending(), 1);
    }

    #[test]
    fn test_destroy_discards_pending() {
        let c = ModernComponent::new();
        let id = c.create("view").unwrap();
        c.set_property(id, "label", "x".into()).unwrap();
        assert!(c.destroy(id));
        assert_eq!(c.pending(), 0);
        assert_eq!(c.commit(), 0);
    }

    #[test]
    fn test_entry_is_modern() {
        let e = entry();
        assert_eq!(e.id(), VariantId::Modern);
        assert_eq!((e.construct)().name(), COMPONENT_NAME);
    }
}
