//! # dualvariant-runtime
//!
//! Process-start half of the dispatcher.
//!
//! - `marker` - The process-global capability marker and the sources that
//!   read it
//! - `probe` - Memoized capability probe
//! - `binder` - Variant registry and the one-time facade binding
//! - `config` - Which marker source the process probe reads

pub mod marker;
pub mod probe;
pub mod binder;
pub mod config;

pub use marker::{
    install_marker, process_slot, EnvMarker, MarkerSlot, ModernRuntimeMarker, ProcessMarker,
    DEFAULT_MARKER_ENV,
};
pub use probe::{CachedProbe, StaticProbe};
pub use binder::{FacadeBinder, FacadeBinding, NameRegistry, VariantRegistry};
pub use config::{
    global_probe, DispatchConfig, MarkerSourceKind, ProcessProbe, MARKER_ENV_KEY_ENV,
    MARKER_SOURCE_ENV,
};
