//! Human-facing summary of a finished compression.

use serde::{Deserialize, Serialize};

use crate::controller::{CompressOutcome, TargetSpec, TargetStatus};
use crate::encode::EncodeFormat;

/// Format a byte count as KiB with one decimal, e.g. `"19.8"`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

/// Percent saved relative to the original file size.
///
/// Negative when the output is larger. Zero for an empty original.
pub fn savings_percent(original_bytes: u64, compressed_bytes: u64) -> f64 {
    if original_bytes == 0 {
        return 0.0;
    }
    (1.0 - compressed_bytes as f64 / original_bytes as f64) * 100.0
}

/// Download name for a result, e.g. `compressed-20kb.jpg`.
pub fn output_file_name(target_kb: u64, format: EncodeFormat) -> String {
    format!("compressed-{}kb.{}", target_kb, format.extension())
}

/// Serializable summary of a request, for display next to the download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    pub file_name: String,
    pub mime_type: String,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub target_bytes: u64,
    pub target_kb: u64,
    pub width: u32,
    pub height: u32,
    pub quality: Option<f64>,
    pub shrink_rounds: u32,
    pub status: TargetStatus,
    pub savings_percent: f64,
}

impl CompressionReport {
    /// Summarize `outcome` for a source file of `original_bytes`.
    pub fn new(outcome: &CompressOutcome, spec: &TargetSpec, original_bytes: u64) -> Self {
        let blob = &outcome.blob;
        Self {
            file_name: output_file_name(spec.target_kb(), spec.format()),
            mime_type: spec.format().mime_type().to_string(),
            original_bytes,
            compressed_bytes: blob.size(),
            target_bytes: spec.target_bytes(),
            target_kb: spec.target_kb(),
            width: blob.width(),
            height: blob.height(),
            quality: blob.quality(),
            shrink_rounds: outcome.shrink_rounds,
            status: outcome.status,
            savings_percent: savings_percent(original_bytes, blob.size()),
        }
    }

    /// One-line description of the output, e.g.
    /// `compressed-20kb.jpg • 19.8 KB • saved 94.1%`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} • {} KB • saved {:.1}%",
            self.file_name,
            format_kb(self.compressed_bytes),
            self.savings_percent
        )
    }

    /// Status message telling the user whether the target was met.
    pub fn status_message(&self) -> String {
        match self.status {
            TargetStatus::UnderTarget => {
                format!("Done. Under target ({}KB).", self.target_kb)
            }
            TargetStatus::Exhausted => {
                "Compressed, but still above target. Try lower max width.".to_string()
            }
        }
    }
}
