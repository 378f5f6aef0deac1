//! Core Types for the detector
//!
//! Media inputs handed over by the decode boundary, the feature-set shape
//! shared by both extractors, and the `DetectionResult` that crosses the
//! core/UI boundary.
//!
//! All values are immutable once built and recomputed per analysis.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Media Inputs
// ============================================================================

/// Decoded raster image (RGBA8, row-major, non-premultiplied)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap a decoded RGBA buffer
    ///
    /// # Errors
    /// Returns `MediaError::InvalidRaster` unless `pixels.len() == width * height * 4`
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, MediaError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(MediaError::InvalidRaster {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes per scanline
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }
}

/// Decoded mono audio (channel 0 of the source)
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSamples {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Native sample rate of the source (not used by scoring)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Which kind of media an analysis ran on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Audio,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Image => "image",
            Modality::Audio => "audio",
        }
    }
}

// ============================================================================
// Feature Sets
// ============================================================================

/// One heuristic's raw measurement and the points it adds to the AI score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub name: &'static str,
    /// Raw measurement (NaN when the input was too small to measure)
    pub measurement: f64,
    /// Points added toward the AI score
    pub points: f64,
}

impl FeatureContribution {
    pub fn new(name: &'static str, measurement: f64, points: f64) -> Self {
        Self {
            name,
            measurement,
            points,
        }
    }
}

/// Fixed, named set of feature contributions produced by one extractor
pub trait FeatureSet {
    /// Contributions in their canonical order
    fn contributions(&self) -> Vec<FeatureContribution>;

    /// Raw point sum, before clamping
    fn total_points(&self) -> f64 {
        self.contributions().iter().map(|c| c.points).sum()
    }
}

// ============================================================================
// Results
// ============================================================================

/// Strategy that produced a `DetectionResult`
///
/// Serialized names are consumed by downstream label mapping and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Api,
    AdvancedHeuristic,
    Heuristic,
    Hybrid,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Api => "api",
            Method::AdvancedHeuristic => "advanced-heuristic",
            Method::Heuristic => "heuristic",
            Method::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary verdict with confidence
///
/// `is_ai == confidence > threshold` for the threshold of the producing component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(rename = "isAI")]
    pub is_ai: bool,
    pub confidence: f64,
    pub method: Method,
}

impl DetectionResult {
    /// Apply a strict `>` decision threshold
    pub fn from_confidence(confidence: f64, threshold: f64, method: Method) -> Self {
        Self {
            is_ai: confidence > threshold,
            confidence,
            method,
        }
    }
}

/// Final state of one analysis: a verdict, or a failure distinct from any verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Complete(DetectionResult),
    Failed { reason: String },
}

impl AnalysisOutcome {
    pub fn result(&self) -> Option<&DetectionResult> {
        match self {
            AnalysisOutcome::Complete(result) => Some(result),
            AnalysisOutcome::Failed { .. } => None,
        }
    }
}

/// One `{label, score}` entry returned by an external classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierLabel {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

impl ClassifierLabel {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised at the decode/load boundary
#[derive(Debug, Error)]
pub enum MediaError {
    /// Pixel buffer does not match the declared dimensions
    #[error("RGBA buffer for {width}x{height} must be {expected} bytes, got {actual}")]
    InvalidRaster {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Upload is not the expected kind of media
    #[error("Unsupported media: {0}")]
    Unsupported(String),

    /// Audio decoding failed (unsupported or corrupt codec)
    #[error("Audio decoding error: {0}")]
    Decode(String),
}
