//! Image Extractor
//!
//! Runs OCR over an attached image, estimates visual complexity from
//! edge/contour heuristics, and delegates any recognized text to the text
//! extractor. The nested call is explicit composition: the text extractor's
//! public contract, invoked on OCR output.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::models::{AnalysisRecord, Complexity, Modality, VisualAnalysis};
use crate::utils::error::{AppError, AppResult};

use super::text::TextExtractor;
use super::{Extractor, MessagePayload};

/// Canny edge detection thresholds
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Contour counts below these bounds map to low/medium complexity
const CONTOURS_LOW_BOUND: usize = 10;
const CONTOURS_MEDIUM_BOUND: usize = 50;

/// OCR + visual analysis over attached images
pub struct ImageExtractor {
    text: Arc<TextExtractor>,
    ocr_command: String,
    ocr_language: String,
}

impl ImageExtractor {
    /// Create an image extractor delegating recognized text to `text`
    pub fn new(text: Arc<TextExtractor>, ocr_command: String, ocr_language: String) -> Self {
        Self {
            text,
            ocr_command,
            ocr_language,
        }
    }

    /// Run the OCR executable in stdout mode over the image
    fn run_ocr(&self, path: &Path) -> AppResult<String> {
        let output = Command::new(&self.ocr_command)
            .arg(path)
            .arg("stdout")
            .args(["-l", &self.ocr_language])
            .output()
            .map_err(|e| {
                AppError::extraction(format!("failed to run {}: {}", self.ocr_command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::extraction(format!(
                "{} exited with {}: {}",
                self.ocr_command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Edge/contour heuristics estimating visual complexity
    fn visual_analysis(path: &Path) -> AppResult<VisualAnalysis> {
        let img = image::open(path)
            .map_err(|e| AppError::extraction(format!("failed to open image: {}", e)))?;

        let gray = img.to_luma8();
        let (width, height) = gray.dimensions();

        let edges = imageproc::edges::canny(&gray, CANNY_LOW, CANNY_HIGH);
        let contours = imageproc::contours::find_contours::<i32>(&edges);
        let contour_count = contours.len();

        Ok(VisualAnalysis {
            has_text: contour_count > 0,
            contour_count,
            width,
            height,
            estimated_complexity: complexity_for_contours(contour_count),
        })
    }
}

/// Map a contour count to a complexity tier
fn complexity_for_contours(count: usize) -> Complexity {
    if count < CONTOURS_LOW_BOUND {
        Complexity::Low
    } else if count < CONTOURS_MEDIUM_BOUND {
        Complexity::Medium
    } else {
        Complexity::High
    }
}

#[async_trait]
impl Extractor for ImageExtractor {
    fn modality(&self) -> Modality {
        Modality::Image
    }

    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord> {
        let path = payload.require_file()?;

        let ocr_text = self.run_ocr(path)?;
        let visual_analysis = Self::visual_analysis(path)?;

        debug!(
            contours = visual_analysis.contour_count,
            ocr_chars = ocr_text.trim().len(),
            "image analyzed"
        );

        let text_analysis = if ocr_text.trim().is_empty() {
            None
        } else {
            Some(self.text.analyze_text(&ocr_text).await?)
        };

        Ok(AnalysisRecord::Image {
            ocr_text,
            visual_analysis,
            text_analysis,
        })
    }
}
