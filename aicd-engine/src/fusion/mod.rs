// Fusion Module - combines external classifier and heuristic verdicts
//
// Weighted blend: fused = 0.7 * external + 0.3 * heuristic, decided at > 0.45.
// A missing source is never fatal; whichever verdict exists passes through.

use crate::types::{DetectionResult, Method};
use tracing::debug;

/// Weight of the external classifier confidence
pub const EXTERNAL_WEIGHT: f64 = 0.7;

/// Weight of the heuristic confidence
pub const HEURISTIC_WEIGHT: f64 = 0.3;

/// Decision threshold for fused confidences
pub const FUSION_THRESHOLD: f64 = 0.45;

/// Fuse whichever verdicts are available
///
/// - Both present → weighted blend tagged `hybrid`
/// - One present → passed through unchanged
/// - Neither → `None`
pub fn fuse(
    external: Option<DetectionResult>,
    heuristic: Option<DetectionResult>,
) -> Option<DetectionResult> {
    match (external, heuristic) {
        (Some(external), Some(heuristic)) => {
            let fused =
                EXTERNAL_WEIGHT * external.confidence + HEURISTIC_WEIGHT * heuristic.confidence;
            debug!(
                external = external.confidence,
                heuristic = heuristic.confidence,
                fused = fused,
                "Fused classifier and heuristic confidences"
            );
            Some(DetectionResult::from_confidence(
                fused,
                FUSION_THRESHOLD,
                Method::Hybrid,
            ))
        }
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// Image fusion: the heuristic verdict is always available
pub fn fuse_image(external: Option<DetectionResult>, heuristic: DetectionResult) -> DetectionResult {
    fuse(external, Some(heuristic)).unwrap_or(heuristic)
}

/// Audio has no external source; the heuristic verdict is final
pub fn fuse_audio(heuristic: DetectionResult) -> DetectionResult {
    heuristic
}
