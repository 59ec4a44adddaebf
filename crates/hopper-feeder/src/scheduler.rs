//! Background loop that periodically runs the gated feed cycle.
//!
//! One dedicated task per feeder instance. The loop runs a cycle
//! immediately, then once per tick, and observes shutdown at the tick wait.
//! A feed in progress is never interrupted: the feed hold happens inside
//! the cycle, outside the select.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{error, info};

use hopper_core::Result;

use crate::feeder::Feeder;

/// Default interval between feed-cycle ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Drives one feeder's periodic check-and-maybe-feed cycle.
pub struct Scheduler {
    feeder: Arc<Feeder>,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl Scheduler {
    /// Create a scheduler with the default 10-minute tick.
    pub fn new(feeder: Arc<Feeder>) -> Self {
        Self::with_interval(feeder, TICK_INTERVAL)
    }

    /// Create a scheduler with a custom tick interval.
    pub fn with_interval(feeder: Arc<Feeder>, interval: Duration) -> Self {
        Self {
            feeder,
            interval,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run the background loop until shutdown.
    ///
    /// Cycle errors are logged and recorded in the feeder's diagnostics;
    /// they never end the loop.
    pub async fn run(&self) {
        loop {
            if let Err(e) = self.feeder.run_cycle().await {
                error!(feeder = %self.feeder.id(), error = %e, "feeder cycle failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.notified() => {
                    info!(feeder = %self.feeder.id(), "stopping feeder loop");
                    return;
                }
            }
        }
    }

    /// Signal the loop to exit at its next wait boundary.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Host shutdown: cancel the loop and force-stop the motor.
    ///
    /// Stop errors propagate so the host knows the device may be left in an
    /// unsafe state.
    pub async fn close(&self) -> Result<()> {
        self.shutdown();
        self.feeder.close().await
    }
}
