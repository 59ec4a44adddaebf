//! Bowl-empty decision policy.
//!
//! The label and threshold are fixed domain constants; the feeder only
//! distinguishes "empty" from "not empty".

use hopper_core::{Classification, HopperError, Result};

/// Label the classifier produces for an empty bowl.
pub const EMPTY_LABEL: &str = "empty";

/// Minimum confidence at which an "empty" classification is trusted enough
/// to trigger a feed.
pub const EMPTY_SCORE_THRESHOLD: f64 = 0.25;

/// Outcome of evaluating one classifier query.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    /// Whether the bowl is empty enough to feed.
    pub feed: bool,
    /// The classification the verdict was based on.
    pub classification: Classification,
}

/// Decide whether to feed from one classifier query.
///
/// The classifier is asked for exactly one result; any other count is a
/// contract violation by the classifier collaborator and an error, never a
/// "bowl not empty" outcome. A wrong label or a sub-threshold score is a
/// valid no-feed verdict.
pub fn evaluate(results: &[Classification]) -> Result<Verdict> {
    if results.len() != 1 {
        return Err(HopperError::Classification(format!(
            "wrong number of classifications: {}",
            results.len()
        )));
    }

    let classification = results[0].clone();
    let feed =
        classification.label == EMPTY_LABEL && classification.score >= EMPTY_SCORE_THRESHOLD;

    Ok(Verdict {
        feed,
        classification,
    })
}
