//! The feeder engine: gate checks, bowl checks, feeds, and the host-facing
//! command surface.
//!
//! One `Feeder` owns the validated config and all mutable feeder state; the
//! motor and classifier are injected and remain host-owned. The background
//! loop (`scheduler`) and concurrent host commands both funnel through the
//! engine's cycle lock, so actuation sequences never overlap and snapshot
//! writes never tear.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, Timelike, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use hopper_core::{BowlSnapshot, FeederConfig, HopperError, Result};

use crate::actuator::Actuator;
use crate::capability::{Classifier, Motor};
use crate::decision;
use crate::state::{FeederPhase, PhaseMachine, StatusBoard};

/// Autonomous feeding controller for one motor/classifier pair.
pub struct Feeder {
    id: Uuid,
    config: FeederConfig,
    motor: Arc<dyn Motor>,
    classifier: Arc<dyn Classifier>,
    actuator: Actuator,
    phase: PhaseMachine,
    status: Arc<StatusBoard>,
    // Serializes whole check/feed cycles across the background loop and
    // concurrent host commands. The motor and the snapshot are only touched
    // while this is held.
    cycle: Mutex<()>,
}

impl std::fmt::Debug for Feeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feeder")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Feeder {
    /// Build a feeder from its config and injected capabilities.
    ///
    /// Fails entirely on config errors (missing reference fields); numeric
    /// fields are defaulted once here and the config is immutable afterward.
    pub fn new(
        mut config: FeederConfig,
        motor: Arc<dyn Motor>,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self> {
        config.validate()?;
        config.fix();

        let id = Uuid::new_v4();
        let status = Arc::new(StatusBoard::new());
        let actuator = Actuator::new(
            Arc::clone(&motor),
            Arc::clone(&status),
            config.seconds_to_feed,
        );

        info!(
            feeder = %id,
            motor = %config.motor,
            camera = %config.camera,
            vision = %config.vision,
            "feeder created"
        );

        Ok(Self {
            id,
            config,
            motor,
            classifier,
            actuator,
            phase: PhaseMachine::new(),
            status: Arc::clone(&status),
            cycle: Mutex::new(()),
        })
    }

    /// Instance id, carried as a structured field on every log event.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current phase of the feeder lifecycle.
    pub fn phase(&self) -> FeederPhase {
        self.phase.current()
    }

    /// Read-only copy of the latest check diagnostics, if any check has run.
    pub fn snapshot(&self) -> Option<BowlSnapshot> {
        self.status.snapshot()
    }

    /// One gated cycle of the background loop: debounce, time window, then
    /// a bowl check.
    pub async fn run_cycle(&self) -> Result<()> {
        self.run_cycle_at(Local::now()).await
    }

    pub(crate) async fn run_cycle_at(&self, now: DateTime<Local>) -> Result<()> {
        debug!(feeder = %self.id, "feeder cycle");

        if let Some(last_fed) = self.status.last_fed() {
            let interval = Duration::minutes(self.config.minutes_between_feeds);
            if now.with_timezone(&Utc) - last_fed < interval {
                info!(feeder = %self.id, last_fed = %last_fed, "not feeding: fed recently");
                return Ok(());
            }
        }

        let hour = now.hour();
        if hour < self.config.start_hour || hour >= self.config.end_hour {
            info!(
                feeder = %self.id,
                hour,
                start_hour = self.config.start_hour,
                end_hour = self.config.end_hour,
                "not feeding: outside feeding window"
            );
            return Ok(());
        }

        info!(feeder = %self.id, "checking bowl");
        self.check().await.map(|_| ())
    }

    /// Query the classifier once and feed if the bowl is empty.
    ///
    /// Bypasses the debounce and time-window gates but still applies the
    /// classification policy. Returns whether it fed. Every invocation
    /// replaces the diagnostic snapshot; errors are recorded there before
    /// being returned.
    pub async fn check(&self) -> Result<bool> {
        let _cycle = self.cycle.lock().await;
        self.phase.transition(FeederPhase::Checking)?;

        let result = self.run_check().await;
        match &result {
            Ok(_) => {
                self.phase.transition(FeederPhase::Idle)?;
            }
            Err(e) => {
                self.status.record_error(e);
                self.phase.reset();
            }
        }
        result
    }

    async fn run_check(&self) -> Result<bool> {
        self.status.begin_check(Utc::now());

        let results = self
            .classifier
            .classify_from_source(&self.config.camera, 1)
            .await?;
        self.status.record_classifications(results.clone());

        let verdict = match decision::evaluate(&results) {
            Ok(v) => v,
            Err(e) => {
                self.status.record_fed(false);
                return Err(e);
            }
        };

        info!(
            feeder = %self.id,
            label = %verdict.classification.label,
            score = verdict.classification.score,
            "classification result"
        );

        if !verdict.feed {
            self.status.record_fed(false);
            return Ok(false);
        }

        info!(feeder = %self.id, "feeding");
        self.status.record_fed(true);
        self.phase.transition(FeederPhase::Feeding)?;
        self.actuator.dispense().await?;
        Ok(true)
    }

    /// Unconditional feed, bypassing every gate and the classifier.
    ///
    /// The motor is always left stopped afterward; a failing stop command
    /// still surfaces as an error to the caller.
    pub async fn feed(&self) -> Result<()> {
        let _cycle = self.cycle.lock().await;
        self.phase.transition(FeederPhase::Feeding)?;

        info!(feeder = %self.id, "manual feed");
        let result = self.actuator.dispense().await;
        match &result {
            Ok(()) => {
                self.phase.transition(FeederPhase::Idle)?;
            }
            Err(_) => {
                self.phase.reset();
            }
        }
        result
    }

    /// Generic host command entry point.
    ///
    /// Dispatches on the `"cmd"` key: `"feed"` feeds unconditionally and
    /// returns an empty map, `"check"` runs a classifier-gated check and
    /// returns `{"fed": bool}`, `"status"` (or an absent/non-string `"cmd"`)
    /// returns the diagnostic snapshot. Any other command name is an
    /// `UnknownCommand` error.
    pub async fn do_command(&self, cmd: &Map<String, Value>) -> Result<Map<String, Value>> {
        match cmd.get("cmd").and_then(Value::as_str) {
            Some("feed") => {
                self.feed().await?;
                Ok(Map::new())
            }
            Some("check") => {
                let fed = self.check().await?;
                let mut out = Map::new();
                out.insert("fed".to_string(), Value::Bool(fed));
                Ok(out)
            }
            Some("status") | None => Ok(self.status.snapshot_map()),
            Some(other) => Err(HopperError::UnknownCommand(other.to_string())),
        }
    }

    /// Force-stop the motor on host shutdown.
    ///
    /// Stop errors propagate: the host needs to know the device may be left
    /// in an unsafe state. No timeout is applied to the stop call, so a
    /// hung motor capability hangs close.
    pub async fn close(&self) -> Result<()> {
        info!(feeder = %self.id, "closing feeder: force-stopping motor");
        self.motor.stop().await
    }
}
