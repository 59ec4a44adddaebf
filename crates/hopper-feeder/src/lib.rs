//! Autonomous feeding control core.
//!
//! A `Feeder` periodically classifies a bowl camera image, decides whether
//! the bowl is empty, and drives a dispenser motor for a bounded duration,
//! subject to a feed debounce and an hour-of-day window. The motor and
//! classifier are injected as capability traits; the host owns their
//! lifecycle and reaches the feeder through `Feeder::do_command` and the
//! background `Scheduler`.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use hopper_core::FeederConfig;
//! # use hopper_feeder::{Classifier, Feeder, Motor, Scheduler};
//! # async fn wire(motor: Arc<dyn Motor>, classifier: Arc<dyn Classifier>) -> hopper_core::Result<()> {
//! let config = FeederConfig::load(std::path::Path::new("feeder.toml"))?;
//! let feeder = Arc::new(Feeder::new(config, motor, classifier)?);
//! let scheduler = Arc::new(Scheduler::new(Arc::clone(&feeder)));
//!
//! let loop_task = tokio::spawn({
//!     let scheduler = Arc::clone(&scheduler);
//!     async move { scheduler.run().await }
//! });
//!
//! // ... on host shutdown:
//! scheduler.close().await?;
//! loop_task.await.expect("feeder loop panicked");
//! # Ok(())
//! # }
//! ```

pub mod actuator;
pub mod capability;
pub mod decision;
pub mod feeder;
pub mod scheduler;
pub mod state;

#[cfg(test)]
pub(crate) mod testkit;

pub use actuator::{Actuator, FEED_POWER};
pub use capability::{Classifier, Motor};
pub use decision::{Verdict, EMPTY_LABEL, EMPTY_SCORE_THRESHOLD};
pub use feeder::Feeder;
pub use scheduler::{Scheduler, TICK_INTERVAL};
pub use state::{FeederPhase, PhaseMachine, StatusBoard};
