//! Batch summary reporting.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::core::{BatchItem, EntryStatus, TransformResult};
use crate::session::SessionEntry;
use crate::utils::{compression_ratio, format_file_size};

/// Totals for one processing run.
///
/// Byte totals cover completed images only; failures are counted but do not
/// contribute sizes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Number of images that completed
    pub completed: usize,
    /// Number of images that failed
    pub failed: usize,
    /// Total input bytes across completed images
    #[serde(rename = "totalInputBytes")]
    pub total_input_bytes: u64,
    /// Total output bytes across completed images
    #[serde(rename = "totalOutputBytes")]
    pub total_output_bytes: u64,
    /// Overall percentage reduction across completed images
    #[serde(rename = "compressionRatio")]
    pub compression_ratio: i32,
    /// Wall-clock time for the whole run in milliseconds
    #[serde(rename = "totalTimeMs")]
    pub total_time_ms: u64,
}

impl BatchSummary {
    /// Builds a summary from raw batch outcomes.
    pub fn from_items(items: &[BatchItem]) -> Self {
        let mut summary = Self::default();
        for item in items {
            match &item.outcome {
                Ok(result) => summary.record_result(result),
                Err(_) => summary.record_failure(),
            }
        }
        summary
    }

    /// Builds a summary from session entries after a processing run.
    pub fn from_entries(entries: &[SessionEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match (&entry.status, &entry.result) {
                (EntryStatus::Completed, Some(result)) => summary.record_result(result),
                (EntryStatus::Error, _) => summary.record_failure(),
                _ => {}
            }
        }
        summary
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.total_time_ms = elapsed.as_millis() as u64;
    }

    fn record_result(&mut self, result: &TransformResult) {
        self.completed += 1;
        self.total_input_bytes += result.original_size;
        self.total_output_bytes += result.output_size;
        self.compression_ratio = compression_ratio(self.total_input_bytes, self.total_output_bytes);
    }

    fn record_failure(&mut self) {
        self.failed += 1;
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Batch Processing Report ===")?;
        writeln!(f)?;
        writeln!(f, "- Images: {} completed, {} failed", self.completed, self.failed)?;
        writeln!(
            f,
            "- Total Size: {} → {}",
            format_file_size(self.total_input_bytes),
            format_file_size(self.total_output_bytes)
        )?;
        if self.compression_ratio > 0 {
            writeln!(f, "- Overall Compression: {}%", self.compression_ratio)?;
        } else {
            writeln!(f, "- Overall Compression: no change")?;
        }
        write!(f, "- Total Duration: {:.2}s", self.total_time_ms as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{CompressorError, ImageFormat};
    use bytes::Bytes;

    fn ok_item(id: &str, original: u64, output: u64) -> BatchItem {
        BatchItem {
            id: id.to_string(),
            outcome: Ok(TransformResult {
                data: Bytes::new(),
                format: ImageFormat::JPEG,
                original_size: original,
                output_size: output,
                compression_ratio: compression_ratio(original, output),
                elapsed_ms: 5,
            }),
        }
    }

    fn failed_item(id: &str) -> BatchItem {
        BatchItem {
            id: id.to_string(),
            outcome: Err(CompressorError::decode("bad payload")),
        }
    }

    #[test]
    fn accumulates_completed_and_failed_counts() {
        let items = vec![
            ok_item("a", 1000, 400),
            failed_item("b"),
            ok_item("c", 3000, 600),
        ];
        let summary = BatchSummary::from_items(&items);

        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_input_bytes, 4000);
        assert_eq!(summary.total_output_bytes, 1000);
        assert_eq!(summary.compression_ratio, 75);
    }

    #[test]
    fn displays_no_change_when_nothing_shrank() {
        let summary = BatchSummary::from_items(&[ok_item("a", 100, 150)]);
        let rendered = summary.to_string();
        assert!(rendered.contains("no change"));
        assert!(rendered.contains("1 completed, 0 failed"));
    }

    #[test]
    fn renders_sizes_and_duration() {
        let mut summary = BatchSummary::from_items(&[ok_item("a", 2 * 1024 * 1024, 1024 * 1024)]);
        summary.set_elapsed(Duration::from_millis(1500));
        let rendered = summary.to_string();
        assert!(rendered.contains("2.00 MB → 1.00 MB"));
        assert!(rendered.contains("50%"));
        assert!(rendered.contains("1.50s"));
    }
}
