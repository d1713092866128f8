use crate::classifier::ClassificationResponse;

/// Tag the detector looks for (compared after lowercasing)
pub const TARGET_TAG: &str = "honey-badger";

/// Probability that must be strictly exceeded for a detection
pub const DETECTION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub detected: bool,
    pub confidence: f64,
}

/// Applies the decision rule to a classification.
///
/// Confidence is the probability of the first prediction tagged
/// [`TARGET_TAG`], or 0 when there is none.
pub fn evaluate(response: &ClassificationResponse) -> Verdict {
    let confidence = response
        .predictions
        .iter()
        .find(|p| p.tag_name.to_lowercase() == TARGET_TAG)
        .map(|p| p.probability)
        .unwrap_or(0.0);

    Verdict {
        detected: confidence > DETECTION_THRESHOLD,
        confidence,
    }
}
