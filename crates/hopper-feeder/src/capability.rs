//! Capability traits for the externally-owned motor and classifier.
//!
//! Both devices are owned by the host and injected at construction time;
//! the feeder drives them but never constructs, reconfigures, or closes
//! them.

use async_trait::async_trait;

use hopper_core::{Classification, Result};

/// The dispenser motor.
#[async_trait]
pub trait Motor: Send + Sync {
    /// Set motor power as a fraction of maximum, in `[-1.0, 1.0]`.
    /// Positive values run the dispenser forward.
    async fn set_power(&self, power: f64) -> Result<()>;

    /// Stop the motor.
    async fn stop(&self) -> Result<()>;
}

/// The image classifier service.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Return up to `max_results` labeled, scored classifications for the
    /// named image source.
    async fn classify_from_source(
        &self,
        source: &str,
        max_results: usize,
    ) -> Result<Vec<Classification>>;
}
