//! Facade binder
//!
//! Turns a probe result into the one variant handle the process uses.
//!
//! ```text
//!   probe() ──► required_marker ──► VariantRegistry::get ──► construct ──► NameRegistry
//!                 │                  │ (missing)            (once)         │ (taken)
//!                 ▼                  ▼                                     ▼
//!           modern / legacy   InconsistentBinding                    NameConflict
//! ```
//!
//! The outcome, success or failure, is computed once per binder and cached.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use dualvariant_core::{
    dv_debug, dv_error, dv_info, BindError, BindResult, CapabilityProbe, Component, ProbeResult,
    VariantDescriptor, VariantEntry, VariantId, DESCRIPTORS,
};

/// Entries of the variants compiled into this artifact.
#[derive(Debug, Clone, Default)]
pub struct VariantRegistry {
    entries: Vec<VariantEntry>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry`, replacing any earlier entry for the same variant.
    pub fn register(mut self, entry: VariantEntry) -> Self {
        self.entries.retain(|e| e.id() != entry.id());
        self.entries.push(entry);
        self.entries.sort_by_key(|e| e.id());
        self
    }

    pub fn get(&self, id: VariantId) -> Option<&VariantEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Compiled variants, in `VariantId` order.
    pub fn ids(&self) -> Vec<VariantId> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Global component names and the variant that claimed each one.
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: Mutex<HashMap<&'static str, VariantId>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry binders use unless given another.
    pub fn global() -> Arc<NameRegistry> {
        static GLOBAL: OnceLock<Arc<NameRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(NameRegistry::new())))
    }

    /// Claim `name` for `variant`. Claiming again for the same variant is
    /// a no-op.
    pub fn register(&self, name: &'static str, variant: VariantId) -> BindResult<()> {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        match names.get(name) {
            Some(&existing) if existing != variant => Err(BindError::NameConflict {
                name,
                existing,
                requested: variant,
            }),
            Some(_) => Ok(()),
            None => {
                names.insert(name, variant);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<VariantId> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }
}

/// The resolved, variant-agnostic handle.
///
/// Derefs to `dyn Component`, so callers use the capability set directly.
#[derive(Clone)]
pub struct FacadeBinding {
    pub active: VariantId,
    pub descriptor: &'static VariantDescriptor,
    handle: Arc<dyn Component>,
}

impl FacadeBinding {
    pub fn handle(&self) -> &Arc<dyn Component> {
        &self.handle
    }
}

impl Deref for FacadeBinding {
    type Target = dyn Component;

    fn deref(&self) -> &Self::Target {
        self.handle.as_ref()
    }
}

impl fmt::Debug for FacadeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacadeBinding")
            .field("active", &self.active)
            .field("component", &self.handle.name())
            .finish()
    }
}

/// Binds the facade to the variant the probe asks for, once.
pub struct FacadeBinder<P> {
    probe: P,
    registry: VariantRegistry,
    names: Arc<NameRegistry>,
    descriptors: &'static [VariantDescriptor],
    binding: OnceLock<BindResult<FacadeBinding>>,
    constructions: AtomicUsize,
}

impl<P: CapabilityProbe> FacadeBinder<P> {
    /// Binder over the process-wide name registry.
    pub fn new(probe: P, registry: VariantRegistry) -> Self {
        Self {
            probe,
            registry,
            names: NameRegistry::global(),
            descriptors: &DESCRIPTORS,
            binding: OnceLock::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    pub fn with_names(mut self, names: Arc<NameRegistry>) -> Self {
        self.names = names;
        self
    }

    /// Descriptor table consulted for marker requirements.
    pub fn with_descriptors(mut self, descriptors: &'static [VariantDescriptor]) -> Self {
        self.descriptors = descriptors;
        self
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    /// Resolve the binding.
    ///
    /// The first call probes, constructs and registers; concurrent first
    /// callers wait for it. Every later call returns the cached outcome,
    /// including a constructor panic, which is caught and cached as
    /// `ConstructionPanicked`.
    pub fn resolve(&self) -> BindResult<&FacadeBinding> {
        self.binding
            .get_or_init(|| self.bind())
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn is_resolved(&self) -> bool {
        self.binding.get().is_some()
    }

    /// Number of variant constructions so far. At most 1.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Acquire)
    }

    /// The one descriptor whose marker requirement the probe result meets.
    fn select(&self, result: &ProbeResult) -> BindResult<&'static VariantDescriptor> {
        let descriptors = self.descriptors;
        let met: Vec<&'static VariantDescriptor> = descriptors
            .iter()
            .filter(|d| d.required_marker.satisfied_by(result.detected))
            .collect();
        match met[..] {
            [descriptor] => Ok(descriptor),
            _ => Err(BindError::NoUniqueVariant {
                detected: result.detected,
                matches: met.len(),
            }),
        }
    }

    fn bind(&self) -> BindResult<FacadeBinding> {
        let result = self.probe.probe();
        let descriptor = self.select(result).inspect_err(|err| dv_error!("{}", err))?;
        let wanted = descriptor.id;

        let Some(entry) = self.registry.get(wanted) else {
            let err = BindError::InconsistentBinding {
                detected: wanted,
                compiled: self.registry.ids(),
            };
            dv_error!("{}", err);
            return Err(err);
        };

        dv_debug!("binder: constructing {} variant ({})", wanted, descriptor.required_marker);
        self.constructions.fetch_add(1, Ordering::AcqRel);
        let handle = match panic::catch_unwind(entry.construct) {
            Ok(handle) => handle,
            Err(payload) => {
                let err = BindError::ConstructionPanicked {
                    variant: wanted,
                    message: panic_message(payload.as_ref()),
                };
                dv_error!("{}", err);
                return Err(err);
            }
        };

        if let Err(err) = self.names.register(handle.name(), wanted) {
            dv_error!("{}", err);
            return Err(err);
        }

        dv_info!("bound {} to the {} variant (marker {})", handle.name(), wanted, result.marker);
        Ok(FacadeBinding {
            active: wanted,
            descriptor,
            handle,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl<P: CapabilityProbe + fmt::Debug> fmt::Debug for FacadeBinder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacadeBinder")
            .field("probe", &self.probe)
            .field("compiled", &self.registry.ids())
            .field("binding", &self.binding.get())
            .finish()
    }
}
