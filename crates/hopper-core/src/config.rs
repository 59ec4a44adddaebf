use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HopperError, Result};

/// Default actuation duration in seconds.
pub const DEFAULT_SECONDS_TO_FEED: f64 = 3.0;
/// Default minimum interval between feeds in minutes.
pub const DEFAULT_MINUTES_BETWEEN_FEEDS: i64 = 60;
/// Default first hour of the feeding window.
pub const DEFAULT_START_HOUR: u32 = 7;
/// Default end hour of the feeding window. 25 is past any clock hour, so the
/// window has no evening cutoff unless one is configured.
pub const DEFAULT_END_HOUR: u32 = 25;

/// Configuration for one feeder instance.
///
/// `motor`, `camera` and `vision` are reference names resolved by the host;
/// the feeder never constructs or closes those resources. Numeric fields
/// take defaults when absent or non-positive (`fix`), and the config is
/// treated as immutable once a feeder has been built from it — a config
/// change is a full rebuild by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeederConfig {
    /// Reference name of the dispenser motor.
    pub motor: String,
    /// Source name the classifier reads images from.
    pub camera: String,
    /// Reference name of the classifier service.
    pub vision: String,
    /// How long to run the motor per feed, in seconds.
    pub seconds_to_feed: f64,
    /// Minimum interval between feeds, in minutes.
    pub minutes_between_feeds: i64,
    /// First hour of the day (local time) at which feeding is allowed.
    pub start_hour: u32,
    /// Hour of the day at which feeding stops being allowed (exclusive).
    pub end_hour: u32,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            motor: String::new(),
            camera: String::new(),
            vision: String::new(),
            seconds_to_feed: DEFAULT_SECONDS_TO_FEED,
            minutes_between_feeds: DEFAULT_MINUTES_BETWEEN_FEEDS,
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

impl FeederConfig {
    /// Substitute defaults for absent or out-of-range numeric fields.
    ///
    /// Performed once before a feeder is built; an hour of 0 is treated as
    /// unset, matching the defaulting of the other numeric fields.
    pub fn fix(&mut self) {
        if self.seconds_to_feed <= 0.0 {
            self.seconds_to_feed = DEFAULT_SECONDS_TO_FEED;
        }
        if self.minutes_between_feeds <= 0 {
            self.minutes_between_feeds = DEFAULT_MINUTES_BETWEEN_FEEDS;
        }
        if self.start_hour == 0 {
            self.start_hour = DEFAULT_START_HOUR;
        }
        if self.end_hour == 0 {
            self.end_hour = DEFAULT_END_HOUR;
        }
    }

    /// Check that all required reference fields are present.
    ///
    /// Fails with a `Config` error naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.motor.is_empty() {
            return Err(HopperError::required_field("motor"));
        }
        if self.camera.is_empty() {
            return Err(HopperError::required_field("camera"));
        }
        if self.vision.is_empty() {
            return Err(HopperError::required_field("vision"));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FeederConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    ///
    /// The fallback still fails validation later (no motor reference), so a
    /// missing file cannot silently produce a working feeder.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}
