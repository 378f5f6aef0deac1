//! Result summary shown alongside a verdict

use crate::types::{DetectionResult, Method, Modality};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    /// "AI-Generated" or "Human-Created"
    pub title: &'static str,
    /// AI share, one decimal place
    pub ai_percent: String,
    /// Human share, one decimal place
    pub human_percent: String,
    pub method_label: &'static str,
}

impl ResultSummary {
    pub fn new(result: &DetectionResult, modality: Modality) -> Self {
        let ai = result.confidence * 100.0;
        Self {
            title: if result.is_ai {
                "AI-Generated"
            } else {
                "Human-Created"
            },
            ai_percent: format_fixed(ai, 1),
            human_percent: format_fixed(100.0 - ai, 1),
            method_label: method_label(result.method, modality),
        }
    }
}

/// Fixed-point text with ties rounded up (`62.25` → `"62.3"`)
///
/// `format!("{:.1}")` rounds exact ties to even, so the value is rounded
/// half-up first.
pub fn format_fixed(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    format!("{:.*}", digits, rounded)
}

/// Display label for the method that produced a verdict
pub fn method_label(method: Method, modality: Modality) -> &'static str {
    match (modality, method) {
        (Modality::Audio, _) => "Audio Analysis",
        (Modality::Image, Method::Api) => "AI Model Detection",
        (Modality::Image, Method::Hybrid) => "Hybrid Analysis",
        (Modality::Image, Method::AdvancedHeuristic) => "Advanced Analysis",
        (Modality::Image, Method::Heuristic) => "Analysis",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_summary() {
        let result = DetectionResult::from_confidence(0.62, 0.45, Method::Hybrid);
        let summary = ResultSummary::new(&result, Modality::Image);

        assert_eq!(summary.title, "AI-Generated");
        assert_eq!(summary.ai_percent, "62.0");
        assert_eq!(summary.human_percent, "38.0");
        assert_eq!(summary.method_label, "Hybrid Analysis");
    }

    #[test]
    fn test_human_summary() {
        let result = DetectionResult::from_confidence(0.25, 0.5, Method::AdvancedHeuristic);
        let summary = ResultSummary::new(&result, Modality::Image);

        assert_eq!(summary.title, "Human-Created");
        assert_eq!(summary.ai_percent, "25.0");
        assert_eq!(summary.human_percent, "75.0");
        assert_eq!(summary.method_label, "Advanced Analysis");
    }

    #[test]
    fn test_ties_round_up() {
        assert_eq!(format_fixed(62.25, 1), "62.3");
        assert_eq!(format_fixed(62.5, 0), "63");
        assert_eq!(format_fixed(0.05, 1), "0.1");
        assert_eq!(format_fixed(99.94, 1), "99.9");
    }

    #[test]
    fn test_summary_tie_rounds_up() {
        let result = DetectionResult::from_confidence(0.625, 0.45, Method::Api);
        let summary = ResultSummary::new(&result, Modality::Image);
        assert_eq!(summary.ai_percent, "62.5");
        assert_eq!(summary.human_percent, "37.5");

        let result = DetectionResult::from_confidence(0.3125, 0.5, Method::AdvancedHeuristic);
        let summary = ResultSummary::new(&result, Modality::Image);
        // 31.25 is exact: half-up gives 31.3, half-even would give 31.2
        assert_eq!(summary.ai_percent, "31.3");
        assert_eq!(summary.human_percent, "68.8");
    }

    #[test]
    fn test_audio_label_ignores_method() {
        assert_eq!(method_label(Method::Heuristic, Modality::Audio), "Audio Analysis");
        assert_eq!(method_label(Method::Api, Modality::Image), "AI Model Detection");
    }
}
