//! Heuristic feature extractors
//!
//! Each extractor is a pure, deterministic function of its input buffer and
//! turns raw measurements into point contributions toward an AI score.
//! No extractor holds state between calls, so they are safe to run
//! concurrently on independent inputs.
//!
//! - [`PixelFeatureExtractor`]: seven features over an RGBA raster
//! - [`AudioFeatureExtractor`]: four features over mono samples

pub mod audio_features;
pub mod pixel_features;

pub use audio_features::{AudioFeatureExtractor, AudioFeatureSet};
pub use pixel_features::{ImageFeatureSet, PixelFeatureExtractor};

use crate::types::FeatureSet;

/// Uniform interface over the modality-specific extractors
pub trait FeatureExtractor: Send + Sync {
    /// Decoded media the extractor reads
    type Input;

    /// Named contributions it produces
    type Output: FeatureSet;

    /// Extractor name for logging
    fn name(&self) -> &'static str;

    /// Measure the input and map each measurement to points
    fn extract(&self, input: &Self::Input) -> Self::Output;
}

/// Points for a measurement strictly below a cutoff, NaN never qualifies
pub(crate) fn points_below(measurement: f64, cutoff: f64, points: f64) -> f64 {
    if measurement < cutoff {
        points
    } else {
        0.0
    }
}

/// Points for a measurement strictly above a cutoff, NaN never qualifies
pub(crate) fn points_above(measurement: f64, cutoff: f64, points: f64) -> f64 {
    if measurement > cutoff {
        points
    } else {
        0.0
    }
}
