//! Feeder phase machine and shared feeder status.
//!
//! Valid phase transitions:
//! - Idle -> Checking (a cycle begins)
//! - Checking -> Feeding (the bowl is empty, actuation starts)
//! - Idle -> Feeding (manual feed, gates bypassed)
//! - Checking -> Idle (no feed this cycle)
//! - Feeding -> Idle (actuation finished)
//!
//! All mutable feeder state (`last_fed`, the bowl snapshot) lives behind
//! the `StatusBoard`, whose only writer is the feeder engine.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use hopper_core::{BowlSnapshot, Classification, HopperError, Result};

/// Operational phase of the feeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeederPhase {
    /// Waiting for the next tick or command.
    Idle,
    /// Querying the classifier and deciding.
    Checking,
    /// Driving the dispenser motor.
    Feeding,
}

impl fmt::Display for FeederPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeederPhase::Idle => write!(f, "Idle"),
            FeederPhase::Checking => write!(f, "Checking"),
            FeederPhase::Feeding => write!(f, "Feeding"),
        }
    }
}

impl FeederPhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &FeederPhase) -> bool {
        matches!(
            (self, target),
            (FeederPhase::Idle, FeederPhase::Checking)
                | (FeederPhase::Checking, FeederPhase::Feeding)
                | (FeederPhase::Idle, FeederPhase::Feeding)
                | (FeederPhase::Checking, FeederPhase::Idle)
                | (FeederPhase::Feeding, FeederPhase::Idle)
        )
    }
}

/// Thread-safe phase machine for the feeder lifecycle.
///
/// Transitions are validated before being applied; an invalid transition
/// leaves the current phase untouched and returns an error.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Arc<Mutex<FeederPhase>>,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    /// Create a new phase machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            phase: Arc::new(Mutex::new(FeederPhase::Idle)),
        }
    }

    /// Returns the current phase.
    pub fn current(&self) -> FeederPhase {
        *self.phase.lock().expect("phase mutex poisoned")
    }

    /// Attempt to transition to the target phase.
    pub fn transition(&self, target: FeederPhase) -> Result<()> {
        let mut phase = self.phase.lock().expect("phase mutex poisoned");
        if phase.can_transition_to(&target) {
            tracing::debug!("Feeder phase: {} -> {}", *phase, target);
            *phase = target;
            Ok(())
        } else {
            Err(HopperError::State(format!(
                "invalid phase transition: {} -> {}",
                *phase, target
            )))
        }
    }

    /// Force the phase machine back to Idle (used for error recovery).
    pub fn reset(&self) {
        let mut phase = self.phase.lock().expect("phase mutex poisoned");
        if *phase != FeederPhase::Idle {
            tracing::warn!("Feeder phase reset to Idle from {}", *phase);
        }
        *phase = FeederPhase::Idle;
    }
}

/// Mutex-guarded owner of `last_fed` and the diagnostic bowl snapshot.
///
/// Writes come only from the feeder engine's serialized check/feed path;
/// readers get clones. The snapshot is replaced wholesale at the start of
/// each check.
#[derive(Debug)]
pub struct StatusBoard {
    inner: Mutex<StatusInner>,
}

#[derive(Debug)]
struct StatusInner {
    last_fed: Option<DateTime<Utc>>,
    snapshot: Option<BowlSnapshot>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StatusInner {
                last_fed: None,
                snapshot: None,
            }),
        }
    }

    /// When the feeder last began a successful actuation, if ever.
    pub fn last_fed(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().expect("status mutex poisoned").last_fed
    }

    /// Record that an actuation has begun.
    pub fn mark_fed(&self, now: DateTime<Utc>) {
        self.inner.lock().expect("status mutex poisoned").last_fed = Some(now);
    }

    /// Start a fresh snapshot for a new check cycle, discarding the old one.
    pub fn begin_check(&self, now: DateTime<Utc>) {
        self.inner.lock().expect("status mutex poisoned").snapshot =
            Some(BowlSnapshot::begin(now));
    }

    /// Record the raw classifier results for the current check.
    pub fn record_classifications(&self, results: Vec<Classification>) {
        if let Some(snap) = &mut self.inner.lock().expect("status mutex poisoned").snapshot {
            snap.classifications = Some(results);
        }
    }

    /// Record the feed decision for the current check.
    pub fn record_fed(&self, fed: bool) {
        if let Some(snap) = &mut self.inner.lock().expect("status mutex poisoned").snapshot {
            snap.fed = Some(fed);
        }
    }

    /// Record an error encountered during the current check.
    pub fn record_error(&self, err: &HopperError) {
        if let Some(snap) = &mut self.inner.lock().expect("status mutex poisoned").snapshot {
            snap.err = Some(err.to_string());
        }
    }

    /// A read-only copy of the latest snapshot, if any check has run.
    pub fn snapshot(&self) -> Option<BowlSnapshot> {
        self.inner
            .lock()
            .expect("status mutex poisoned")
            .snapshot
            .clone()
    }

    /// The latest snapshot as a JSON object; empty before the first check.
    pub fn snapshot_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.snapshot()
            .map(|s| s.to_map())
            .unwrap_or_default()
    }
}
