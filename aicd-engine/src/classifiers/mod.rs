//! External image classifiers
//!
//! Remote label/score classifiers sit behind the [`ImageClassifier`] trait so
//! the hosted endpoints can be swapped for fakes. A [`ClassifierChain`] is an
//! ordered list of strategies, each a classifier paired with the
//! [`LabelMatcher`] that turns its label list into an AI confidence. The
//! chain tries each strategy once, in order, and returns the first success.
//!
//! There is no local fallback here: when every strategy fails the chain
//! returns [`ClassifierError::Exhausted`] and the caller proceeds with the
//! heuristic result alone.

pub mod hosted;

pub use hosted::HostedClassifier;

use crate::types::{ClassifierLabel, DetectionResult, Method};
use aicd_common::config::{ClassifierConfig, MatchProfile};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Decision threshold for classifier confidences
pub const API_THRESHOLD: f64 = 0.45;

/// Content type sent with raw image bytes
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Label substrings that mark an AI/generated class
pub const AI_LABEL_TERMS: &[&str] = &["artificial", "ai", "fake", "generated"];

/// Extra term recognised on the secondary (SDXL) endpoint
pub const SDXL_LABEL_TERM: &str = "sdxl";

/// Classifier errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Request could not be sent or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status
    #[error("Classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not a usable label list
    #[error("Parse error: {0}")]
    Parse(String),

    /// Every strategy in the chain failed
    #[error("All {attempts} classifier attempts failed")]
    Exhausted { attempts: usize },
}

/// Remote label/score image classifier
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Classifier name for logging
    fn name(&self) -> &str;

    /// Classify raw image bytes
    ///
    /// # Errors
    /// Any failure (network, status, parse) means "try the next strategy".
    async fn classify(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<Vec<ClassifierLabel>, ClassifierError>;
}

/// Turns a classifier's label list into an AI confidence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatcher {
    terms: Vec<String>,
    /// Read an unmatched, non-AI first label as the human class (`1 - score`)
    complement_unmatched: bool,
}

impl LabelMatcher {
    pub fn new<I, S>(terms: I, complement_unmatched: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(|t| t.into().to_lowercase()).collect(),
            complement_unmatched,
        }
    }

    /// artificial/ai/fake/generated; unmatched first label is complemented
    pub fn primary() -> Self {
        Self::new(AI_LABEL_TERMS.iter().copied(), true)
    }

    /// Primary terms plus `sdxl`; unmatched first label is taken as-is
    pub fn secondary() -> Self {
        Self::new(
            AI_LABEL_TERMS.iter().copied().chain([SDXL_LABEL_TERM]),
            false,
        )
    }

    /// Case-insensitive substring match against the AI terms
    pub fn indicates_ai(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.terms.iter().any(|term| label.contains(term.as_str()))
    }

    /// AI confidence for a label list
    ///
    /// 1. First label matching an AI term: its score
    /// 2. Otherwise the first entry: its score if it reads as AI, else
    ///    `1 - score` when complementing, else its raw score
    /// 3. Empty list: 0.0
    pub fn ai_confidence(&self, labels: &[ClassifierLabel]) -> f64 {
        if let Some(matched) = labels.iter().find(|l| self.indicates_ai(&l.label)) {
            return matched.score;
        }
        match labels.first() {
            Some(first) if self.complement_unmatched && !self.indicates_ai(&first.label) => {
                1.0 - first.score
            }
            Some(first) => first.score,
            None => 0.0,
        }
    }
}

impl From<MatchProfile> for LabelMatcher {
    fn from(profile: MatchProfile) -> Self {
        match profile {
            MatchProfile::Primary => LabelMatcher::primary(),
            MatchProfile::Secondary => LabelMatcher::secondary(),
        }
    }
}

/// One entry in the fallback order
#[derive(Clone)]
pub struct ClassifierStrategy {
    pub classifier: Arc<dyn ImageClassifier>,
    pub matcher: LabelMatcher,
}

/// Ordered classifier strategies, tried once each until one succeeds
#[derive(Clone, Default)]
pub struct ClassifierChain {
    strategies: Vec<ClassifierStrategy>,
}

impl ClassifierChain {
    /// Empty chain (image analysis runs on heuristics alone)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy to the end of the fallback order
    pub fn with_strategy(mut self, classifier: Arc<dyn ImageClassifier>, matcher: LabelMatcher) -> Self {
        self.strategies.push(ClassifierStrategy {
            classifier,
            matcher,
        });
        self
    }

    /// Build hosted strategies from configuration (empty when disabled)
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        if !config.enabled {
            return Ok(Self::new());
        }
        let timeout = Duration::from_secs(config.timeout_secs);
        config.endpoints.iter().try_fold(Self::new(), |chain, endpoint| {
            let classifier = HostedClassifier::new(
                endpoint.name.clone(),
                endpoint.url.clone(),
                timeout,
                config.api_token.clone(),
            )?;
            Ok(chain.with_strategy(Arc::new(classifier), endpoint.profile.into()))
        })
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Classifier names in fallback order
    pub fn names(&self) -> Vec<String> {
        self.strategies
            .iter()
            .map(|s| s.classifier.name().to_string())
            .collect()
    }

    /// Run the chain and return the first successful verdict
    ///
    /// # Errors
    /// `ClassifierError::Exhausted` when every strategy failed (or the chain is empty)
    pub async fn detect(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<DetectionResult, ClassifierError> {
        for strategy in &self.strategies {
            let name = strategy.classifier.name();
            match strategy.classifier.classify(image, content_type).await {
                Ok(labels) => {
                    let confidence = strategy.matcher.ai_confidence(&labels);
                    debug!(
                        classifier = name,
                        labels = labels.len(),
                        confidence = confidence,
                        "Classifier succeeded"
                    );
                    return Ok(DetectionResult::from_confidence(
                        confidence,
                        API_THRESHOLD,
                        Method::Api,
                    ));
                }
                Err(e) => {
                    warn!(classifier = name, error = %e, "Classifier failed, trying next");
                }
            }
        }

        Err(ClassifierError::Exhausted {
            attempts: self.strategies.len(),
        })
    }
}

impl std::fmt::Debug for ClassifierChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierChain")
            .field("strategies", &self.names())
            .finish()
    }
}
