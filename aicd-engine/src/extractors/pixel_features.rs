//! Pixel Feature Extractor
//!
//! Seven independent measurements over an RGBA raster, each thresholded into
//! points toward the AI score. Generative models tend to produce images that
//! are smoother, use fewer colours and carry less sensor noise than camera
//! output; every feature below probes one of those tendencies.
//!
//! # Extracted Features
//! - Smoothness (neighbour colour difference in scan order)
//! - Palette size (distinct 16-level quantized colours)
//! - Luminance variance (red channel)
//! - Vertical edge strength (scanline-to-scanline red difference)
//! - Noise uniformity (local red deviation over a sparse sample)
//! - Saturation (share of strongly saturated samples)
//! - Row pattern (short runs repeated on the next scanline)
//!
//! The arithmetic intentionally reproduces the calibrated reference
//! behaviour, including two quirks the thresholds depend on: the edge
//! strength is averaged over the whole buffer length rather than over the
//! compared pairs, and the noise ratio is scaled by 40 (it can exceed 1.0).

use super::{points_above, points_below, FeatureExtractor};
use crate::types::{FeatureContribution, FeatureSet, RasterImage};
use std::collections::HashSet;
use tracing::debug;

/// Noise sampling looks at no more than this many leading bytes
const NOISE_SCAN_BYTES: usize = 10_000;

/// Byte step between sparse samples (every 10th pixel)
const SPARSE_STEP: usize = 40;

/// Upper bound on row-pattern starting offsets
const PATTERN_MAX_OFFSETS: usize = 1000;

/// Bytes compared per row-pattern run (25 samples at a 4-byte stride)
const PATTERN_RUN_BYTES: usize = 100;

/// Contributions from the seven pixel features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFeatureSet {
    pub smoothness: FeatureContribution,
    pub palette: FeatureContribution,
    pub luminance_variance: FeatureContribution,
    pub edge_strength: FeatureContribution,
    pub noise_uniformity: FeatureContribution,
    pub saturation: FeatureContribution,
    pub row_pattern: FeatureContribution,
}

impl FeatureSet for ImageFeatureSet {
    fn contributions(&self) -> Vec<FeatureContribution> {
        vec![
            self.smoothness,
            self.palette,
            self.luminance_variance,
            self.edge_strength,
            self.noise_uniformity,
            self.saturation,
            self.row_pattern,
        ]
    }
}

/// Pixel Feature Extractor
///
/// Stateless; one instance can serve any number of images.
///
/// # Example
/// ```rust
/// use aicd_engine::extractors::{FeatureExtractor, PixelFeatureExtractor};
/// use aicd_engine::types::{FeatureSet, RasterImage};
///
/// let image = RasterImage::from_rgba(8, 8, vec![128; 8 * 8 * 4]).unwrap();
/// let features = PixelFeatureExtractor.extract(&image);
/// assert!(features.total_points() > 50.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelFeatureExtractor;

impl PixelFeatureExtractor {
    /// Mean summed RGB difference between consecutive pixels, per pixel
    fn compute_smoothness(&self, data: &[u8]) -> f64 {
        let total: u64 = data
            .chunks_exact(4)
            .zip(data.chunks_exact(4).skip(1))
            .map(|(a, b)| {
                u64::from(a[0].abs_diff(b[0]))
                    + u64::from(a[1].abs_diff(b[1]))
                    + u64::from(a[2].abs_diff(b[2]))
            })
            .sum();
        total as f64 / (data.len() as f64 / 4.0)
    }

    /// Distinct colours after quantizing each channel to 16 levels
    fn compute_palette_size(&self, data: &[u8]) -> usize {
        data.chunks_exact(4)
            .map(|px| (px[0] >> 4 << 4, px[1] >> 4 << 4, px[2] >> 4 << 4))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Population variance of the red channel
    fn compute_luminance_variance(&self, data: &[u8]) -> f64 {
        let pixel_count = data.len() as f64 / 4.0;
        let sum: f64 = data.iter().step_by(4).map(|&r| f64::from(r)).sum();
        let mean = sum / pixel_count;
        data.iter()
            .step_by(4)
            .map(|&r| {
                let diff = f64::from(r) - mean;
                diff * diff
            })
            .sum::<f64>()
            / pixel_count
    }

    /// Red difference to the pixel one scanline below, averaged over the buffer length
    fn compute_edge_strength(&self, data: &[u8], stride: usize) -> f64 {
        let end = data.len().saturating_sub(stride);
        let total: u64 = (stride..end)
            .step_by(4)
            .map(|i| u64::from(data[i].abs_diff(data[i + stride])))
            .sum();
        total as f64 / data.len() as f64
    }

    /// Scaled share of sparse samples whose red value matches its local mean
    fn compute_noise_ratio(&self, data: &[u8], stride: usize) -> f64 {
        let limit = data.len().min(NOISE_SCAN_BYTES);
        let last = data.len().saturating_sub(1);
        let uniform = (0..limit)
            .step_by(SPARSE_STEP)
            .filter(|&i| {
                let here = f64::from(data[i]);
                let right = f64::from(data[(i + 4).min(last)]);
                let below = f64::from(data[(i + stride).min(last)]);
                let mean = (here + right + below) / 3.0;
                (here - mean).abs() < 5.0
            })
            .count();
        uniform as f64 / limit as f64 * 40.0
    }

    /// Share of sparse samples with HSV saturation above 0.7
    fn compute_saturation_ratio(&self, data: &[u8]) -> f64 {
        let high = data
            .chunks_exact(4)
            .step_by(SPARSE_STEP / 4)
            .filter(|px| {
                let max = px[0].max(px[1]).max(px[2]);
                let min = px[0].min(px[1]).min(px[2]);
                let saturation = if max == 0 {
                    0.0
                } else {
                    f64::from(max - min) / f64::from(max)
                };
                saturation > 0.7
            })
            .count();
        high as f64 / (data.len() as f64 / SPARSE_STEP as f64)
    }

    /// Count of short runs that mostly repeat on the next scanline
    ///
    /// Returns `(pattern_count, offsets_considered)`.
    fn compute_row_pattern(&self, data: &[u8], width: usize, stride: usize) -> (usize, usize) {
        let sample_size = width.min(PATTERN_MAX_OFFSETS);
        let pattern = (0..sample_size)
            .step_by(10)
            .filter(|&i| i + PATTERN_RUN_BYTES < data.len())
            .filter(|&i| {
                let similar = (0..PATTERN_RUN_BYTES)
                    .step_by(4)
                    .filter(|&j| match data.get(i + j + stride) {
                        Some(&below) => data[i + j].abs_diff(below) < 10,
                        None => false,
                    })
                    .count();
                similar > 15
            })
            .count();
        (pattern, sample_size)
    }
}

impl FeatureExtractor for PixelFeatureExtractor {
    type Input = RasterImage;
    type Output = ImageFeatureSet;

    fn name(&self) -> &'static str {
        "PixelFeatures"
    }

    fn extract(&self, image: &RasterImage) -> ImageFeatureSet {
        let data = image.pixels();
        let stride = image.stride();

        let smoothness = self.compute_smoothness(data);
        let palette = self.compute_palette_size(data) as f64;
        let variance = self.compute_luminance_variance(data);
        let edges = self.compute_edge_strength(data, stride);
        let noise = self.compute_noise_ratio(data, stride);
        let saturation = self.compute_saturation_ratio(data);
        let (pattern, sample_size) = self.compute_row_pattern(data, image.width() as usize, stride);

        let features = ImageFeatureSet {
            smoothness: FeatureContribution::new(
                "smoothness",
                smoothness,
                points_below(smoothness, 20.0, 15.0) + points_below(smoothness, 12.0, 10.0),
            ),
            palette: FeatureContribution::new(
                "palette",
                palette,
                points_below(palette, 1500.0, 12.0) + points_below(palette, 800.0, 10.0),
            ),
            luminance_variance: FeatureContribution::new(
                "luminance_variance",
                variance,
                points_below(variance, 4000.0, 12.0) + points_below(variance, 2000.0, 10.0),
            ),
            edge_strength: FeatureContribution::new(
                "edge_strength",
                edges,
                if edges > 20.0 && edges < 40.0 { 10.0 } else { 0.0 },
            ),
            noise_uniformity: FeatureContribution::new(
                "noise_uniformity",
                noise,
                points_above(noise, 0.7, 15.0),
            ),
            saturation: FeatureContribution::new(
                "saturation",
                saturation,
                points_above(saturation, 0.4, 8.0),
            ),
            row_pattern: FeatureContribution::new(
                "row_pattern",
                pattern as f64,
                points_above(pattern as f64, sample_size as f64 / 200.0, 8.0),
            ),
        };

        debug!(
            width = image.width(),
            height = image.height(),
            smoothness = smoothness,
            palette = palette,
            variance = variance,
            edges = edges,
            noise = noise,
            saturation = saturation,
            pattern = pattern,
            points = features.total_points(),
            "Pixel feature extraction complete"
        );

        features
    }
}

// ============================================================================
// Tests
// ============================================================================
