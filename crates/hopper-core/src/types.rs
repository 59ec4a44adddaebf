use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One labeled, scored result from the classifier.
///
/// Ephemeral: produced per query, recorded in the bowl snapshot, never
/// persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Class label, e.g. `"empty"`.
    pub label: String,
    /// Confidence score in `[0.0, 1.0]`.
    pub score: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Diagnostic snapshot of the most recent check cycle.
///
/// Overwritten wholesale at the start of each check; the remaining fields
/// fill in as the cycle progresses. External callers only ever see a
/// read-only copy, rendered as a JSON map by the command interface.
#[derive(Clone, Debug, Serialize)]
pub struct BowlSnapshot {
    /// When the check started.
    pub last_check: DateTime<Utc>,
    /// Raw classifier results, if the query succeeded.
    #[serde(rename = "classification", skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Vec<Classification>>,
    /// Whether this check decided to feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fed: Option<bool>,
    /// The last error encountered during the cycle, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl BowlSnapshot {
    /// A fresh snapshot carrying only the check timestamp.
    pub fn begin(now: DateTime<Utc>) -> Self {
        Self {
            last_check: now,
            classifications: None,
            fed: None,
            err: None,
        }
    }

    /// Render the snapshot as a JSON object for the command interface.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // Serialize is derived over plain fields; anything else is
            // unreachable in practice.
            _ => serde_json::Map::new(),
        }
    }
}
