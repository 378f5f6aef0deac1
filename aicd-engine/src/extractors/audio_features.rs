//! Audio Feature Extractor
//!
//! Four whole-buffer measurements over channel 0, each thresholded into
//! points toward the AI score.
//!
//! # Extracted Features
//! - Dynamic Range (peak-to-peak span, both extremes anchored at zero)
//! - Zero-Crossing Rate (sign changes per sample)
//! - Self-Similarity (first second compared against itself, half to half)
//! - Energy (mean squared amplitude)
//!
//! Accumulation is done in f64 so long buffers do not drift.

use super::{points_below, FeatureExtractor};
use crate::types::{AudioSamples, FeatureContribution, FeatureSet};
use tracing::debug;

/// Self-similarity window (one second at 44.1 kHz, regardless of source rate)
const SIMILARITY_WINDOW: usize = 44_100;

/// Contributions from the four audio features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFeatureSet {
    pub dynamic_range: FeatureContribution,
    pub zero_crossing: FeatureContribution,
    pub self_similarity: FeatureContribution,
    pub energy: FeatureContribution,
}

impl FeatureSet for AudioFeatureSet {
    fn contributions(&self) -> Vec<FeatureContribution> {
        vec![
            self.dynamic_range,
            self.zero_crossing,
            self.self_similarity,
            self.energy,
        ]
    }
}

/// Audio Feature Extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioFeatureExtractor;

impl AudioFeatureExtractor {
    /// `max - min`, with both starting from zero
    fn compute_dynamic_range(&self, samples: &[f32]) -> f64 {
        let (max, min) = samples
            .iter()
            .fold((0.0f32, 0.0f32), |(max, min), &s| (max.max(s), min.min(s)));
        f64::from(max) - f64::from(min)
    }

    /// Sign changes between adjacent samples, divided by the sample count
    fn compute_zero_crossing_rate(&self, samples: &[f32]) -> f64 {
        let crossings = samples
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        crossings as f64 / samples.len() as f64
    }

    /// Mean absolute difference between the two halves of the leading window
    ///
    /// An odd-length window has no whole-sample midpoint and is unmeasurable
    /// (NaN), as is an empty one.
    fn compute_self_similarity(&self, samples: &[f32]) -> f64 {
        let window = samples.len().min(SIMILARITY_WINDOW);
        if window % 2 != 0 {
            return f64::NAN;
        }
        let half = window / 2;
        let total: f64 = samples[..half]
            .iter()
            .zip(&samples[half..2 * half])
            .map(|(&a, &b)| (f64::from(a) - f64::from(b)).abs())
            .sum();
        total / half as f64
    }

    /// Mean of squared samples
    fn compute_energy(&self, samples: &[f32]) -> f64 {
        let total: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        total / samples.len() as f64
    }
}

impl FeatureExtractor for AudioFeatureExtractor {
    type Input = AudioSamples;
    type Output = AudioFeatureSet;

    fn name(&self) -> &'static str {
        "AudioFeatures"
    }

    fn extract(&self, audio: &AudioSamples) -> AudioFeatureSet {
        let samples = audio.samples();

        let dynamic_range = self.compute_dynamic_range(samples);
        let zcr = self.compute_zero_crossing_rate(samples);
        let similarity = self.compute_self_similarity(samples);
        let energy = self.compute_energy(samples);

        let features = AudioFeatureSet {
            dynamic_range: FeatureContribution::new(
                "dynamic_range",
                dynamic_range,
                points_below(dynamic_range, 1.5, 25.0),
            ),
            zero_crossing: FeatureContribution::new(
                "zero_crossing",
                zcr,
                points_below(zcr, 0.05, 20.0),
            ),
            self_similarity: FeatureContribution::new(
                "self_similarity",
                similarity,
                points_below(similarity, 0.3, 30.0),
            ),
            energy: FeatureContribution::new("energy", energy, points_below(energy, 0.05, 25.0)),
        };

        debug!(
            sample_count = samples.len(),
            sample_rate = audio.sample_rate(),
            dynamic_range = dynamic_range,
            zero_crossing_rate = zcr,
            similarity = similarity,
            energy = energy,
            points = features.total_points(),
            "Audio feature extraction complete"
        );

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sine(freq: f32, amplitude: f32, seconds: f32, sample_rate: u32) -> AudioSamples {
        let count = (seconds * sample_rate as f32) as usize;
        let samples = (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect();
        AudioSamples::new(samples, sample_rate)
    }

    #[test]
    fn test_silence_triggers_every_feature() {
        let features = AudioFeatureExtractor.extract(&AudioSamples::new(vec![0.0; 44_100], 44_100));

        assert_eq!(features.dynamic_range.measurement, 0.0);
        assert_eq!(features.zero_crossing.measurement, 0.0);
        assert_eq!(features.self_similarity.measurement, 0.0);
        assert_eq!(features.energy.measurement, 0.0);
        assert_eq!(features.total_points(), 100.0);
    }

    #[test]
    fn test_white_noise_triggers_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let samples = (0..88_200).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        let features = AudioFeatureExtractor.extract(&AudioSamples::new(samples, 44_100));

        assert!(features.dynamic_range.measurement > 1.5);
        assert!(features.zero_crossing.measurement > 0.05);
        assert!(features.self_similarity.measurement > 0.3);
        assert!(features.energy.measurement > 0.05);
        assert_eq!(features.total_points(), 0.0);
    }

    #[test]
    fn test_loud_repeating_tone() {
        // 440 Hz repeats exactly across the half-second split
        let features = AudioFeatureExtractor.extract(&sine(440.0, 0.9, 2.0, 44_100));

        assert_eq!(features.dynamic_range.points, 0.0);
        assert_eq!(features.zero_crossing.points, 20.0);
        assert!(features.self_similarity.measurement < 0.01);
        assert_eq!(features.self_similarity.points, 30.0);
        assert_eq!(features.energy.points, 0.0);
        assert_eq!(features.total_points(), 50.0);
    }

    #[test]
    fn test_dynamic_range_anchored_at_zero() {
        // All-positive signal: min stays at 0
        let features = AudioFeatureExtractor.extract(&AudioSamples::new(vec![0.2, 0.4, 0.3], 8_000));
        assert!((features.dynamic_range.measurement - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_zero_crossing_counts_both_directions() {
        let samples = vec![0.5, -0.5, 0.5, 0.0, -0.1];
        let features = AudioFeatureExtractor.extract(&AudioSamples::new(samples, 8_000));
        // +→-, -→+, 0→- (0 counts as non-negative)
        assert!((features.zero_crossing.measurement - 3.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_short_window_splits_in_half() {
        let samples = vec![0.1, 0.2, 0.1, 0.2];
        let features = AudioFeatureExtractor.extract(&AudioSamples::new(samples, 8_000));
        assert_eq!(features.self_similarity.measurement, 0.0);
        assert_eq!(features.self_similarity.points, 30.0);
    }

    #[test]
    fn test_odd_short_window_never_scores_similarity() {
        // 4411 samples: shorter than one second and odd
        let audio = sine(441.0, 0.7, 1.0, 4_411);
        assert_eq!(audio.samples().len(), 4_411);
        let features = AudioFeatureExtractor.extract(&audio);

        assert!(features.self_similarity.measurement.is_nan());
        assert_eq!(features.self_similarity.points, 0.0);
    }

    #[test]
    fn test_odd_length_beyond_window_still_measured() {
        // The window is capped at an even 44100 samples
        let features = AudioFeatureExtractor.extract(&AudioSamples::new(vec![0.0; 44_101], 44_100));
        assert_eq!(features.self_similarity.measurement, 0.0);
        assert_eq!(features.self_similarity.points, 30.0);
    }

    #[test]
    fn test_empty_buffer_only_scores_dynamic_range() {
        let features = AudioFeatureExtractor.extract(&AudioSamples::new(Vec::new(), 44_100));

        assert!(features.zero_crossing.measurement.is_nan());
        assert!(features.self_similarity.measurement.is_nan());
        assert!(features.energy.measurement.is_nan());
        assert_eq!(features.total_points(), 25.0);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let audio = sine(123.0, 0.4, 1.0, 22_050);
        let first = AudioFeatureExtractor.extract(&audio);
        let second = AudioFeatureExtractor.extract(&audio);
        assert_eq!(first, second);
    }
}
