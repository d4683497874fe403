//! Memoized capability probe

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use dualvariant_core::{dv_debug, dv_warn, CapabilityProbe, MarkerSource, MarkerState, ProbeResult};

/// Inspects its marker source on the first `probe()` and caches the
/// result. Concurrent first callers block until the single inspection
/// finishes; later calls are plain reads.
pub struct CachedProbe<S> {
    source: S,
    result: OnceLock<ProbeResult>,
    inspections: AtomicUsize,
}

impl<S: MarkerSource> CachedProbe<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            result: OnceLock::new(),
            inspections: AtomicUsize::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// How many times the source was inspected. At most 1.
    pub fn inspections(&self) -> usize {
        self.inspections.load(Ordering::Acquire)
    }

    pub fn is_probed(&self) -> bool {
        self.result.get().is_some()
    }

    fn inspect(&self) -> ProbeResult {
        self.inspections.fetch_add(1, Ordering::AcqRel);
        let marker = self.source.inspect();
        if let MarkerState::Malformed { found } = &marker {
            dv_warn!(
                "{} capability marker has unexpected shape {}, treating as absent",
                self.source.name(),
                found
            );
        }
        let result = ProbeResult::from_marker(marker);
        dv_debug!(
            "probe: {} marker {} -> {} variant",
            self.source.name(),
            result.marker,
            result.variant()
        );
        result
    }
}

impl<S: MarkerSource> CapabilityProbe for CachedProbe<S> {
    fn probe(&self) -> &ProbeResult {
        self.result.get_or_init(|| self.inspect())
    }
}

impl<S: MarkerSource> std::fmt::Debug for CachedProbe<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedProbe")
            .field("source", &self.source.name())
            .field("result", &self.result.get())
            .finish()
    }
}

/// Fixed probe result, for tests and hosts that already know the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProbe {
    result: ProbeResult,
}

impl StaticProbe {
    pub fn new(marker: MarkerState) -> Self {
        Self {
            result: ProbeResult::from_marker(marker),
        }
    }

    pub fn absent() -> Self {
        Self::new(MarkerState::Absent)
    }

    /// Modern runtime detected.
    pub fn detected() -> Self {
        Self::new(MarkerState::Active { revision: 0 })
    }
}

impl CapabilityProbe for StaticProbe {
    fn probe(&self) -> &ProbeResult {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Counts its own inspections independently of the probe.
    struct CountingSource {
        state: MarkerState,
        calls: Arc<AtomicUsize>,
    }

    impl MarkerSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn inspect(&self) -> MarkerState {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.state.clone()
        }
    }

    fn counting(state: MarkerState) -> (CachedProbe<CountingSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = CachedProbe::new(CountingSource {
            state,
            calls: Arc::clone(&calls),
        });
        (probe, calls)
    }

    #[test]
    fn test_probe_is_idempotent() {
        let (probe, calls) = counting(MarkerState::Active { revision: 2 });
        assert!(!probe.is_probed());

        let first = probe.probe().clone();
        for _ in 0..100 {
            assert_eq!(probe.probe(), &first);
        }
        assert!(first.detected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(probe.inspections(), 1);
    }

    #[test]
    fn test_concurrent_first_probe_inspects_once() {
        let (probe, calls) = counting(MarkerState::Inactive);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..50 {
                        assert!(!probe.probe().detected);
                    }
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_malformed_is_not_detected() {
        let (probe, _) = counting(MarkerState::Malformed {
            found: "u64".into(),
        });
        let result = probe.probe();
        assert!(!result.detected);
        assert!(result.marker.is_malformed());
    }

    #[test]
    fn test_static_probe() {
        assert!(StaticProbe::detected().probe().detected);
        assert!(!StaticProbe::absent().probe().detected);
        assert!(!StaticProbe::new(MarkerState::Inactive).probe().detected);
    }
}
