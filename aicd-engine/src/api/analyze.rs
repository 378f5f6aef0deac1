//! Analysis endpoints
//!
//! - `POST /analyze/image`: JSON with base64 RGBA pixels and, optionally,
//!   the base64 original file for the external classifiers
//! - `POST /analyze/audio`: raw audio file bytes as the request body
//!
//! Both answer with an [`AnalysisResponse`]. Uploads that are not media at
//! all are rejected with 400 before any analysis runs; audio that sniffs as
//! audio but cannot be decoded completes with `status: "failed"`.

use axum::{
    body::Bytes,
    extract::State,
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::annotation::{plan_overlay, OverlayPlan};
use crate::error::{ApiError, ApiResult};
use crate::presentation::ResultSummary;
use crate::session::{AudioAnalysis, ImageAnalysis};
use crate::types::{AnalysisOutcome, FeatureContribution, FeatureSet, Modality, RasterImage};
use crate::utils::ensure_media;
use crate::AppState;

/// POST /analyze/image request body
#[derive(Debug, Clone, Deserialize)]
pub struct ImageAnalysisRequest {
    pub width: u32,
    pub height: u32,
    /// Base64 RGBA8, row-major, `width * height * 4` bytes
    pub pixels: String,
    /// Base64 original image file
    #[serde(default)]
    pub encoded: Option<String>,
}

/// Analysis response
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub modality: Modality,
    pub outcome: AnalysisOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ResultSummary>,
    pub features: Vec<FeatureContribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayPlan>,
}

fn decode_base64(field: &str, value: &str) -> ApiResult<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| ApiError::BadRequest(format!("{} is not valid base64: {}", field, e)))
}

/// POST /analyze/image
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(request): Json<ImageAnalysisRequest>,
) -> ApiResult<Json<AnalysisResponse>> {
    let pixels = decode_base64("pixels", &request.pixels)?;
    let image = RasterImage::from_rgba(request.width, request.height, pixels)?;

    let mut analysis = ImageAnalysis::new(image);
    if let Some(encoded) = &request.encoded {
        let bytes = decode_base64("encoded", encoded)?;
        let mime_type = ensure_media(&bytes, Modality::Image)?;
        debug!(analysis_id = %analysis.id(), mime_type = mime_type, "Encoded original attached");
        analysis = analysis.with_encoded(bytes);
    }

    let report = analysis.run(&state.classifiers).await?;

    let overlay = plan_overlay(&report.result, report.width, report.height, &mut rand::thread_rng());

    Ok(Json(AnalysisResponse {
        analysis_id: report.id,
        modality: Modality::Image,
        summary: Some(ResultSummary::new(&report.result, Modality::Image)),
        outcome: AnalysisOutcome::Complete(report.result),
        features: report.features.contributions(),
        overlay,
    }))
}

/// POST /analyze/audio
pub async fn analyze_audio(body: Bytes) -> ApiResult<Json<AnalysisResponse>> {
    let mime_type = ensure_media(&body, Modality::Audio)?;
    info!(bytes = body.len(), mime_type = mime_type, "Audio upload received");

    let report = AudioAnalysis::from_encoded(body.to_vec(), Some(mime_type))
        .run()
        .await?;

    let summary = report
        .outcome
        .result()
        .map(|result| ResultSummary::new(result, Modality::Audio));

    Ok(Json(AnalysisResponse {
        analysis_id: report.id,
        modality: Modality::Audio,
        outcome: report.outcome,
        summary,
        features: report
            .features
            .map(|f| f.contributions())
            .unwrap_or_default(),
        overlay: None,
    }))
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze/image", post(analyze_image))
        .route("/analyze/audio", post(analyze_audio))
}
