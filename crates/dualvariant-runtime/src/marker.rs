//! Capability marker
//!
//! The host runtime announces the variant family it provides by installing
//! a value in the process marker slot before any application code runs.
//! The slot is written once and never cleared.
//!
//! Two sources read a marker:
//! - `ProcessMarker` - the in-process slot (`install_marker`)
//! - `EnvMarker` - an environment variable, for hosts that cannot link
//!   against this crate

use std::any::{type_name, Any};
use std::fmt;
use std::sync::OnceLock;

use dualvariant_core::{env_get_opt, MarkerError, MarkerSource, MarkerState};

/// Default variable read by `EnvMarker`
pub const DEFAULT_MARKER_ENV: &str = "DUALVARIANT_RUNTIME_MARKER";

/// The value a modern host installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModernRuntimeMarker {
    pub revision: u32,
}

struct Installed {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// Write-once, type-erased marker storage.
pub struct MarkerSlot {
    cell: OnceLock<Installed>,
}

impl MarkerSlot {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Install `value`. Fails if anything was installed before, whatever its
    /// type.
    pub fn install<T: Any + Send + Sync>(&self, value: T) -> Result<(), MarkerError> {
        self.cell
            .set(Installed {
                value: Box::new(value),
                type_name: type_name::<T>(),
            })
            .map_err(|_| MarkerError::AlreadyInstalled)
    }

    pub fn is_installed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Interpret the installed value.
    pub fn state(&self) -> MarkerState {
        let Some(installed) = self.cell.get() else {
            return MarkerState::Absent;
        };
        let value = installed.value.as_ref();
        if let Some(marker) = value.downcast_ref::<ModernRuntimeMarker>() {
            MarkerState::Active {
                revision: marker.revision,
            }
        } else if let Some(&on) = value.downcast_ref::<bool>() {
            if on {
                MarkerState::Active { revision: 0 }
            } else {
                MarkerState::Inactive
            }
        } else {
            MarkerState::Malformed {
                found: installed.type_name.to_string(),
            }
        }
    }
}

impl Default for MarkerSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarkerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerSlot")
            .field("installed", &self.cell.get().map(|i| i.type_name))
            .finish()
    }
}

static PROCESS_SLOT: MarkerSlot = MarkerSlot::new();

/// The slot `ProcessMarker::new()` reads.
pub fn process_slot() -> &'static MarkerSlot {
    &PROCESS_SLOT
}

/// Install the process capability marker.
///
/// Called by the host runtime before application code. A modern host
/// installs `ModernRuntimeMarker`; `true`/`false` are accepted as the
/// revision-less form.
pub fn install_marker<T: Any + Send + Sync>(value: T) -> Result<(), MarkerError> {
    PROCESS_SLOT.install(value)
}

/// Reads a `MarkerSlot`.
#[derive(Debug, Clone, Copy)]
pub struct ProcessMarker {
    slot: &'static MarkerSlot,
}

impl ProcessMarker {
    /// Source over the process slot.
    pub fn new() -> Self {
        Self::with_slot(&PROCESS_SLOT)
    }

    pub fn with_slot(slot: &'static MarkerSlot) -> Self {
        Self { slot }
    }
}

impl Default for ProcessMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerSource for ProcessMarker {
    fn name(&self) -> &'static str {
        "process"
    }

    fn inspect(&self) -> MarkerState {
        self.slot.state()
    }
}

/// Reads the marker from an environment variable.
///
/// `true|yes|on` is active at revision 0, a positive integer is active at
/// that revision, `false|no|off` or any spelling of zero is inactive.
/// Unset or empty is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvMarker {
    key: String,
}

impl EnvMarker {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for EnvMarker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_ENV)
    }
}

pub(crate) fn interpret_env_value(raw: Option<&str>) -> MarkerState {
    let Some(raw) = raw else {
        return MarkerState::Absent;
    };
    let value = raw.trim().to_ascii_lowercase();
    match value.as_str() {
        "" => MarkerState::Absent,
        "true" | "yes" | "on" => MarkerState::Active { revision: 0 },
        "0" | "false" | "no" | "off" => MarkerState::Inactive,
        _ => match value.parse::<u32>() {
            // "00", "+0": zero spelled differently is still off
            Ok(0) => MarkerState::Inactive,
            Ok(revision) => MarkerState::Active { revision },
            Err(_) => MarkerState::Malformed {
                found: format!("{:?}", raw),
            },
        },
    }
}

impl MarkerSource for EnvMarker {
    fn name(&self) -> &'static str {
        "env"
    }

    fn inspect(&self) -> MarkerState {
        interpret_env_value(env_get_opt::<String>(&self.key).as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_is_absent() {
        static SLOT: MarkerSlot = MarkerSlot::new();
        assert!(!SLOT.is_installed());
        assert_eq!(ProcessMarker::with_slot(&SLOT).inspect(), MarkerState::Absent);
    }

    #[test]
    fn test_modern_marker_is_active() {
        static SLOT: MarkerSlot = MarkerSlot::new();
        SLOT.install(ModernRuntimeMarker { revision: 3 }).unwrap();
        assert_eq!(
            ProcessMarker::with_slot(&SLOT).inspect(),
            MarkerState::Active { revision: 3 }
        );
    }

    #[test]
    fn test_bool_marker() {
        static ON: MarkerSlot = MarkerSlot::new();
        static OFF: MarkerSlot = MarkerSlot::new();
        ON.install(true).unwrap();
        OFF.install(false).unwrap();
        assert_eq!(ON.state(), MarkerState::Active { revision: 0 });
        assert_eq!(OFF.state(), MarkerState::Inactive);
    }

    #[test]
    fn test_unexpected_type_is_malformed() {
        static SLOT: MarkerSlot = MarkerSlot::new();
        SLOT.install("modern").unwrap();
        match SLOT.state() {
            MarkerState::Malformed { found } => assert!(found.contains("str"), "{}", found),
            other => panic!("unexpected state: {}", other),
        }
    }

    #[test]
    fn test_second_install_rejected() {
        static SLOT: MarkerSlot = MarkerSlot::new();
        SLOT.install(ModernRuntimeMarker { revision: 1 }).unwrap();
        assert_eq!(SLOT.install(false), Err(MarkerError::AlreadyInstalled));
        assert_eq!(SLOT.state(), MarkerState::Active { revision: 1 });
    }

    #[test]
    fn test_env_values() {
        assert_eq!(interpret_env_value(None), MarkerState::Absent);
        assert_eq!(interpret_env_value(Some(" ")), MarkerState::Absent);
        assert_eq!(interpret_env_value(Some("on")), MarkerState::Active { revision: 0 });
        assert_eq!(interpret_env_value(Some("7")), MarkerState::Active { revision: 7 });
        assert_eq!(interpret_env_value(Some("OFF")), MarkerState::Inactive);
        assert_eq!(interpret_env_value(Some("0")), MarkerState::Inactive);
        assert_eq!(interpret_env_value(Some("00")), MarkerState::Inactive);
        assert_eq!(interpret_env_value(Some("+0")), MarkerState::Inactive);
        assert_eq!(interpret_env_value(Some("+5")), MarkerState::Active { revision: 5 });
        assert!(interpret_env_value(Some("modern-ish")).is_malformed());
    }

    #[test]
    fn test_env_marker_reads_variable() {
        let key = "__DV_TEST_RUNTIME_MARKER__";
        let source = EnvMarker::new(key);
        assert_eq!(source.inspect(), MarkerState::Absent);
        std::env::set_var(key, "yes");
        assert_eq!(source.inspect(), MarkerState::Active { revision: 0 });
        std::env::remove_var(key);
        assert_eq!(source.name(), "env");
    }
}
