pub mod config;
pub mod error;
pub mod types;

pub use config::FeederConfig;
pub use error::{HopperError, Result};
pub use types::{BowlSnapshot, Classification};
