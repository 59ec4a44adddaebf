//! Actuation controller: drives the dispenser motor for a bounded duration.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use hopper_core::Result;

use crate::capability::Motor;
use crate::state::StatusBoard;

/// Fixed motor power for a feed: half of maximum forward, no ramp profile.
pub const FEED_POWER: f64 = 0.5;

/// Owns the power-on / hold / stop sequence for one feeder's motor.
pub struct Actuator {
    motor: Arc<dyn Motor>,
    status: Arc<StatusBoard>,
    feed_duration: Duration,
}

impl Actuator {
    pub fn new(motor: Arc<dyn Motor>, status: Arc<StatusBoard>, seconds_to_feed: f64) -> Self {
        Self {
            motor,
            status,
            feed_duration: Duration::from_secs_f64(seconds_to_feed),
        }
    }

    /// Run one feed: power on, hold, stop.
    ///
    /// `last_fed` is marked as soon as the motor is running, before the
    /// hold, so a failure later in the sequence still counts as a feed for
    /// debounce purposes. The hold is not interruptible: a feed, once
    /// started, always runs to completion. If powering on fails, nothing
    /// else happens (no hold, no stop, no timestamp). If the final stop
    /// fails, the error propagates but the feed has still happened.
    ///
    /// Callers serialize dispense invocations; two actuation sequences must
    /// never overlap on the shared motor.
    pub async fn dispense(&self) -> Result<()> {
        self.motor.set_power(FEED_POWER).await?;
        self.status.mark_fed(Utc::now());

        tracing::debug!(hold_secs = self.feed_duration.as_secs_f64(), "holding feed power");
        tokio::time::sleep(self.feed_duration).await;

        self.motor.stop().await
    }
}
