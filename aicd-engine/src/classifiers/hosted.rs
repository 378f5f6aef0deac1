//! Hosted Classifier
//!
//! Posts raw image bytes to a hosted inference endpoint and reads back a
//! `[{label, score}, ...]` list.
//!
//! # Response Handling
//! - Non-2xx status → `ClassifierError::Status`
//! - Body that is not JSON → `ClassifierError::Parse`
//! - JSON array → label list (a nested `[[...]]` batch is unwrapped)
//! - Any other JSON value → empty label list (the matcher scores it 0.0)

use super::{ClassifierError, ImageClassifier};
use crate::types::ClassifierLabel;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Hosted Classifier
///
/// # Example
/// ```rust,ignore
/// use aicd_engine::classifiers::{HostedClassifier, ImageClassifier, OCTET_STREAM};
///
/// let classifier = HostedClassifier::new(
///     "ai-image-detector".to_string(),
///     "https://api-inference.huggingface.co/models/umm-maybe/AI-image-detector".to_string(),
///     Duration::from_secs(30),
///     None,
/// )?;
/// let labels = classifier.classify(&png_bytes, OCTET_STREAM).await?;
/// ```
pub struct HostedClassifier {
    name: String,
    endpoint: String,
    api_token: Option<String>,
    http_client: Client,
}

impl HostedClassifier {
    /// Create a classifier for one endpoint
    ///
    /// # Errors
    /// `ClassifierError::Network` if the HTTP client cannot be built
    pub fn new(
        name: String,
        endpoint: String,
        timeout: Duration,
        api_token: Option<String>,
    ) -> Result<Self, ClassifierError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name,
            endpoint,
            api_token,
            http_client,
        })
    }
}

#[async_trait]
impl ImageClassifier for HostedClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<Vec<ClassifierLabel>, ClassifierError> {
        debug!(
            classifier = %self.name,
            endpoint = %self.endpoint,
            bytes = image.len(),
            "Posting image to hosted classifier"
        );

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, content_type)
            .body(image.to_vec());
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        parse_label_list(body)
    }
}

/// Read a classifier response body as a label list
pub fn parse_label_list(body: Value) -> Result<Vec<ClassifierLabel>, ClassifierError> {
    let Value::Array(items) = body else {
        return Ok(Vec::new());
    };

    let items = match items.first() {
        Some(Value::Array(inner)) => inner.clone(),
        _ => items,
    };

    serde_json::from_value(Value::Array(items)).map_err(|e| ClassifierError::Parse(e.to_string()))
}
