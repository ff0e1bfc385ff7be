//! Core types for transform requests and results.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::utils::{CompressorError, ImageFormat};

/// Default quality factor applied when a request does not set one.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// A source image submitted for transformation.
///
/// The payload is immutable for the duration of a transform call; `Bytes`
/// keeps the hand-off to worker threads cheap.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Stable identifier used to match batch results back to inputs
    pub id: String,
    /// Display name, normally the original file name
    pub name: String,
    /// Declared source format
    pub format: ImageFormat,
    /// Raw encoded payload
    pub data: Bytes,
}

impl SourceImage {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        format: ImageFormat,
        data: Bytes,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            format,
            data,
        }
    }

    /// Payload size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Settings for one transform call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransformRequest {
    /// Target format; `None` keeps the source format
    #[serde(rename = "targetFormat")]
    pub target_format: Option<ImageFormat>,
    /// Quality factor in (0, 1]
    pub quality: f32,
}

impl Default for TransformRequest {
    fn default() -> Self {
        Self {
            target_format: None,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Result of a completed transform.
///
/// Carries the re-encoded payload along with the statistics the caller
/// displays next to it.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    /// Re-encoded payload
    #[serde(skip)]
    pub data: Bytes,
    /// Output format
    pub format: ImageFormat,
    /// Original payload size in bytes
    #[serde(rename = "originalSize")]
    pub original_size: u64,
    /// Output payload size in bytes
    #[serde(rename = "outputSize")]
    pub output_size: u64,
    /// Percentage reduction from source to result; negative when the result grew
    #[serde(rename = "compressionRatio")]
    pub compression_ratio: i32,
    /// Wall-clock time spent transforming, in milliseconds
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
}

impl TransformResult {
    /// Bytes saved (negative if the output grew)
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.output_size as i64
    }
}

/// Lifecycle status of one session entry.
///
/// `pending → processing → {completed | error}`, driven entirely by the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// One per-source outcome of a batch transform.
///
/// Failures are isolated per item; a batch always yields one of these for
/// every source, in submission order.
#[derive(Debug)]
pub struct BatchItem {
    /// Identifier of the source this outcome belongs to
    pub id: String,
    /// The transform outcome for that source
    pub outcome: Result<TransformResult, CompressorError>,
}
