//! Annotator overlay plan
//!
//! When a verdict says AI, the client paints the image over with black
//! strokes and a red "AI DETECTED" banner. This module decides *what* to draw;
//! rasterising the plan is left to the client.

use crate::presentation::format_fixed;
use crate::types::DetectionResult;
use rand::Rng;
use serde::Serialize;

const STROKE_COUNT: usize = 15;
const STROKE_ALPHA: f64 = 0.7;
const STROKE_COLOR: &str = "#000000";
const MIN_STROKE_WIDTH: f64 = 40.0;
const STROKE_WIDTH_SPAN: f64 = 80.0;
/// Control points wander up to a quarter of the canvas either way
const CONTROL_SPREAD: f64 = 0.5;

const HEADLINE: &str = "AI DETECTED";
const HEADLINE_FONT_PX: u32 = 60;
const CAPTION_FONT_PX: u32 = 32;
const CAPTION_OFFSET_Y: f64 = 70.0;
const TEXT_FILL: &str = "#ff3b30";
const TEXT_OUTLINE: &str = "#000000";
const TEXT_OUTLINE_WIDTH: f64 = 4.0;
const TEXT_ALPHA: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One cubic Bézier paint stroke
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrushStroke {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    pub width: f64,
}

/// Centered, outlined text line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayText {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_px: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPlan {
    pub width: u32,
    pub height: u32,
    pub stroke_color: &'static str,
    pub stroke_alpha: f64,
    pub strokes: Vec<BrushStroke>,
    pub text_fill: &'static str,
    pub text_outline: &'static str,
    pub text_outline_width: f64,
    pub text_alpha: f64,
    pub headline: OverlayText,
    pub caption: OverlayText,
}

/// Plan the overlay for a verdict, `None` unless it is an AI verdict
pub fn plan_overlay<R: Rng>(
    result: &DetectionResult,
    width: u32,
    height: u32,
    rng: &mut R,
) -> Option<OverlayPlan> {
    if !result.is_ai {
        return None;
    }

    let (w, h) = (f64::from(width), f64::from(height));
    let strokes = (0..STROKE_COUNT)
        .map(|_| random_stroke(w, h, rng))
        .collect();

    let (cx, cy) = (w / 2.0, h / 2.0);

    Some(OverlayPlan {
        width,
        height,
        stroke_color: STROKE_COLOR,
        stroke_alpha: STROKE_ALPHA,
        strokes,
        text_fill: TEXT_FILL,
        text_outline: TEXT_OUTLINE,
        text_outline_width: TEXT_OUTLINE_WIDTH,
        text_alpha: TEXT_ALPHA,
        headline: OverlayText {
            text: HEADLINE.to_string(),
            x: cx,
            y: cy,
            font_px: HEADLINE_FONT_PX,
        },
        caption: OverlayText {
            text: format!("{}% AI-Generated", format_fixed(result.confidence * 100.0, 0)),
            x: cx,
            y: cy + CAPTION_OFFSET_Y,
            font_px: CAPTION_FONT_PX,
        },
    })
}

fn random_stroke<R: Rng>(w: f64, h: f64, rng: &mut R) -> BrushStroke {
    let width = rng.gen::<f64>() * STROKE_WIDTH_SPAN + MIN_STROKE_WIDTH;
    let start = Point {
        x: rng.gen::<f64>() * w,
        y: rng.gen::<f64>() * h,
    };
    let end = Point {
        x: rng.gen::<f64>() * w,
        y: rng.gen::<f64>() * h,
    };
    let mut jitter = |origin: Point| Point {
        x: origin.x + (rng.gen::<f64>() - 0.5) * w * CONTROL_SPREAD,
        y: origin.y + (rng.gen::<f64>() - 0.5) * h * CONTROL_SPREAD,
    };
    let control1 = jitter(start);
    let control2 = jitter(end);

    BrushStroke {
        start,
        control1,
        control2,
        end,
        width,
    }
}
