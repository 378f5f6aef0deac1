//! Per-analysis request objects
//!
//! Each upload becomes its own `ImageAnalysis` or `AudioAnalysis` carrying
//! the media it runs on; nothing about the "current" media lives in shared
//! state. Running an analysis consumes it.
//!
//! Image flow:
//! ```text
//! RasterImage ──spawn_blocking──> HeuristicScorer::image ──┐
//!                                                          ├─> fuse_image
//! encoded bytes ──────────────> ClassifierChain::detect ───┘
//! ```
//! Audio flow: decode (channel 0) → HeuristicScorer::audio → fuse_audio.
//! A decode failure ends the analysis in `AnalysisOutcome::Failed`.

use crate::classifiers::{ClassifierChain, OCTET_STREAM};
use crate::extractors::{AudioFeatureSet, ImageFeatureSet};
use crate::fusion::{fuse_audio, fuse_image};
use crate::scoring::HeuristicScorer;
use crate::types::{AnalysisOutcome, AudioSamples, DetectionResult, RasterImage};
use crate::utils::decode_audio_bytes;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Failures of the analysis machinery itself (never a verdict)
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Original encoded upload, forwarded to the external classifiers
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// One image analysis request
#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    id: Uuid,
    image: RasterImage,
    encoded: Option<EncodedImage>,
}

/// Everything an image analysis produced
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub id: Uuid,
    pub width: u32,
    pub height: u32,
    pub features: ImageFeatureSet,
    pub heuristic: DetectionResult,
    pub external: Option<DetectionResult>,
    pub result: DetectionResult,
}

impl ImageAnalysis {
    pub fn new(image: RasterImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            encoded: None,
        }
    }

    /// Attach the encoded original so the external classifiers can run
    pub fn with_encoded(mut self, bytes: Vec<u8>) -> Self {
        self.encoded = Some(EncodedImage {
            bytes,
            content_type: OCTET_STREAM.to_string(),
        });
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Score locally and classify remotely in parallel, then fuse
    ///
    /// Classifier failures are logged and treated as "no external verdict".
    pub async fn run(self, classifiers: &ClassifierChain) -> Result<ImageReport, AnalysisError> {
        let Self { id, image, encoded } = self;
        let (width, height) = (image.width(), image.height());

        debug!(
            analysis_id = %id,
            width = width,
            height = height,
            classifiers = classifiers.len(),
            "Starting image analysis"
        );

        let heuristic_task =
            tokio::task::spawn_blocking(move || HeuristicScorer::image().score(&image));

        let external_task = async {
            let encoded = match &encoded {
                Some(encoded) if !classifiers.is_empty() => encoded,
                _ => {
                    debug!(analysis_id = %id, "Skipping external classifiers");
                    return None;
                }
            };
            match classifiers
                .detect(&encoded.bytes, &encoded.content_type)
                .await
            {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(analysis_id = %id, error = %e, "External classification unavailable");
                    None
                }
            }
        };

        let (heuristic, external) = tokio::join!(heuristic_task, external_task);
        let heuristic = heuristic?;

        let result = fuse_image(external, heuristic.result);

        info!(
            analysis_id = %id,
            is_ai = result.is_ai,
            confidence = result.confidence,
            method = %result.method,
            "Image analysis complete"
        );

        Ok(ImageReport {
            id,
            width,
            height,
            features: heuristic.features,
            heuristic: heuristic.result,
            external,
            result,
        })
    }
}

/// Audio as submitted: already decoded, or still encoded
#[derive(Debug, Clone)]
pub enum AudioInput {
    Samples(AudioSamples),
    Encoded {
        bytes: Vec<u8>,
        mime_type: Option<String>,
    },
}

/// One audio analysis request
#[derive(Debug, Clone)]
pub struct AudioAnalysis {
    id: Uuid,
    input: AudioInput,
}

/// Everything an audio analysis produced
#[derive(Debug, Clone)]
pub struct AudioReport {
    pub id: Uuid,
    /// Absent when decoding failed
    pub features: Option<AudioFeatureSet>,
    pub duration_seconds: Option<f64>,
    pub outcome: AnalysisOutcome,
}

impl AudioAnalysis {
    pub fn from_samples(samples: AudioSamples) -> Self {
        Self {
            id: Uuid::new_v4(),
            input: AudioInput::Samples(samples),
        }
    }

    pub fn from_encoded(bytes: Vec<u8>, mime_type: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            input: AudioInput::Encoded {
                bytes,
                mime_type: mime_type.map(str::to_string),
            },
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Decode if needed, then score
    pub async fn run(self) -> Result<AudioReport, AnalysisError> {
        let Self { id, input } = self;

        let scored = tokio::task::spawn_blocking(move || {
            let samples = match input {
                AudioInput::Samples(samples) => samples,
                AudioInput::Encoded { bytes, mime_type } => {
                    decode_audio_bytes(&bytes, mime_type.as_deref())?.into_samples()
                }
            };
            let duration = samples.duration_seconds();
            Ok::<_, crate::types::MediaError>((HeuristicScorer::audio().score(&samples), duration))
        })
        .await?;

        let report = match scored {
            Ok((heuristic, duration)) => {
                let result = fuse_audio(heuristic.result);
                info!(
                    analysis_id = %id,
                    is_ai = result.is_ai,
                    confidence = result.confidence,
                    duration_seconds = duration,
                    "Audio analysis complete"
                );
                AudioReport {
                    id,
                    features: Some(heuristic.features),
                    duration_seconds: Some(duration),
                    outcome: AnalysisOutcome::Complete(result),
                }
            }
            Err(e) => {
                warn!(analysis_id = %id, error = %e, "Audio analysis failed");
                AudioReport {
                    id,
                    features: None,
                    duration_seconds: None,
                    outcome: AnalysisOutcome::Failed {
                        reason: e.to_string(),
                    },
                }
            }
        };

        Ok(report)
    }
}
