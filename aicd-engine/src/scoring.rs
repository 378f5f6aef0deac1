//! Heuristic Scorer
//!
//! Thin orchestrator per modality: run the matching extractor, sum the point
//! contributions, clamp to [0, 100], normalize to a confidence in [0, 1] and
//! apply the modality's strict decision threshold.
//!
//! | Modality | Threshold | Method               |
//! |----------|-----------|----------------------|
//! | Image    | `> 0.5`   | `advanced-heuristic` |
//! | Audio    | `> 0.6`   | `heuristic`          |

use crate::extractors::{AudioFeatureExtractor, FeatureExtractor, PixelFeatureExtractor};
use crate::types::{DetectionResult, FeatureSet, Method};
use tracing::debug;

/// Decision settings shared by both scorer configurations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerProfile {
    pub threshold: f64,
    pub method: Method,
}

impl ScorerProfile {
    pub const IMAGE: ScorerProfile = ScorerProfile {
        threshold: 0.5,
        method: Method::AdvancedHeuristic,
    };

    pub const AUDIO: ScorerProfile = ScorerProfile {
        threshold: 0.6,
        method: Method::Heuristic,
    };

    /// Verdict for an already-normalized confidence
    pub fn decide(&self, confidence: f64) -> DetectionResult {
        DetectionResult::from_confidence(confidence, self.threshold, self.method)
    }
}

/// Clamp raw points to [0, 100] and scale to [0, 1]
pub fn normalize_points(points: f64) -> f64 {
    points.clamp(0.0, 100.0) / 100.0
}

/// Features plus the verdict derived from them
#[derive(Debug, Clone)]
pub struct HeuristicReport<F> {
    pub features: F,
    pub result: DetectionResult,
}

/// Heuristic Scorer
///
/// Stateless apart from its fixed profile; `Send + Sync` and safe to call
/// concurrently for independent inputs.
#[derive(Debug, Clone)]
pub struct HeuristicScorer<E> {
    extractor: E,
    profile: ScorerProfile,
}

impl HeuristicScorer<PixelFeatureExtractor> {
    /// Image configuration
    pub fn image() -> Self {
        Self {
            extractor: PixelFeatureExtractor,
            profile: ScorerProfile::IMAGE,
        }
    }
}

impl HeuristicScorer<AudioFeatureExtractor> {
    /// Audio configuration
    pub fn audio() -> Self {
        Self {
            extractor: AudioFeatureExtractor,
            profile: ScorerProfile::AUDIO,
        }
    }
}

impl<E: FeatureExtractor> HeuristicScorer<E> {
    pub fn profile(&self) -> ScorerProfile {
        self.profile
    }

    /// Extract, sum, normalize and decide
    pub fn score(&self, input: &E::Input) -> HeuristicReport<E::Output> {
        let features = self.extractor.extract(input);
        let points = features.total_points();
        let result = self.profile.decide(normalize_points(points));

        debug!(
            extractor = self.extractor.name(),
            points = points,
            confidence = result.confidence,
            is_ai = result.is_ai,
            "Heuristic scoring complete"
        );

        HeuristicReport { features, result }
    }
}
