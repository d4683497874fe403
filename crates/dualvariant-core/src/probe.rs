//! Capability probe abstraction
//!
//! The capability marker is ambient process-global state set by the host
//! runtime. Everything above this module sees it only through
//! `CapabilityProbe`, and only a `MarkerSource` knows what the marker looks
//! like. A change in the marker's representation touches one source impl.

use core::fmt;

use crate::variant::{VariantId, DESCRIPTORS};

/// What a marker source found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerState {
    /// No marker installed.
    Absent,
    /// Marker present and active.
    Active { revision: u32 },
    /// Marker present but explicitly off.
    Inactive,
    /// Marker present with an unexpected shape. Treated as absent.
    Malformed { found: String },
}

impl MarkerState {
    pub fn is_active(&self) -> bool {
        matches!(self, MarkerState::Active { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, MarkerState::Malformed { .. })
    }
}

impl fmt::Display for MarkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerState::Absent => write!(f, "absent"),
            MarkerState::Active { revision } => write!(f, "active (revision {})", revision),
            MarkerState::Inactive => write!(f, "inactive"),
            MarkerState::Malformed { found } => write!(f, "malformed ({})", found),
        }
    }
}

/// Result of probing the live runtime. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub detected: bool,
    pub marker: MarkerState,
}

impl ProbeResult {
    /// Only an active marker counts as detected.
    pub fn from_marker(marker: MarkerState) -> Self {
        Self {
            detected: marker.is_active(),
            marker,
        }
    }

    pub fn absent() -> Self {
        Self::from_marker(MarkerState::Absent)
    }

    /// Variant whose marker requirement this result meets, per `DESCRIPTORS`.
    pub fn variant(&self) -> VariantId {
        DESCRIPTORS
            .iter()
            .find(|d| d.required_marker.satisfied_by(self.detected))
            .map_or(VariantId::Legacy, |d| d.id)
    }
}

/// Reads the raw capability marker. Must be side-effect-free and must not
/// load either variant.
pub trait MarkerSource: Send + Sync {
    /// Short name for diagnostics ("process", "env", ...)
    fn name(&self) -> &'static str;

    /// Inspect the marker. Never fails: an unexpected shape is reported as
    /// `MarkerState::Malformed`.
    fn inspect(&self) -> MarkerState;
}

impl<S: MarkerSource + ?Sized> MarkerSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn inspect(&self) -> MarkerState {
        (**self).inspect()
    }
}

/// Memoized view of the capability marker.
///
/// Implementations compute the result at most once per instance; every
/// call returns the same value.
pub trait CapabilityProbe: Send + Sync {
    fn probe(&self) -> &ProbeResult;
}

impl<P: CapabilityProbe + ?Sized> CapabilityProbe for &P {
    fn probe(&self) -> &ProbeResult {
        (**self).probe()
    }
}
