//! File intake.
//!
//! Builds [`SourceImage`] values from user-selected files, filtering by the
//! supported-format allow-list and enforcing the per-batch cap. Files that
//! do not make it in are reported back to the caller, not treated as errors.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::core::SourceImage;
use crate::utils::ImageFormat;

/// Most sources accepted into a single batch.
pub const MAX_SOURCES_PER_BATCH: usize = 20;

static SOURCE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Why a file was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The extension is not in the supported-format allow-list
    UnsupportedType,
    /// The batch cap was already reached
    BatchFull,
    /// The file could not be read
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedType => write!(f, "unsupported file type"),
            SkipReason::BatchFull => {
                write!(f, "batch limit of {MAX_SOURCES_PER_BATCH} images reached")
            }
            SkipReason::Unreadable(e) => write!(f, "unreadable ({e})"),
        }
    }
}

/// One skipped file with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one intake pass.
#[derive(Debug, Default)]
pub struct Intake {
    pub accepted: Vec<SourceImage>,
    pub skipped: Vec<SkippedFile>,
}

/// Whether a MIME type is on the intake allow-list.
///
/// Covers jpeg (including the `image/jpg` alias), png, gif, bmp and webp.
pub fn accepts_mime(mime: &str) -> bool {
    ImageFormat::from_mime(mime).is_some()
}

/// Loads supported images from `paths`, up to [`MAX_SOURCES_PER_BATCH`].
///
/// Unsupported and unreadable files are skipped and reported, as are files
/// beyond the cap. `already_accepted` counts sources the caller holds from
/// earlier passes so the cap spans a whole session.
pub async fn load_sources(paths: &[PathBuf], already_accepted: usize) -> Intake {
    let mut intake = Intake::default();
    let mut budget = MAX_SOURCES_PER_BATCH.saturating_sub(already_accepted);

    for path in paths {
        let Some(format) = format_for_path(path) else {
            debug!("Skipping {} (unsupported type)", path.display());
            intake.skipped.push(SkippedFile {
                path: path.clone(),
                reason: SkipReason::UnsupportedType,
            });
            continue;
        };

        if budget == 0 {
            warn!(
                "Batch cap of {MAX_SOURCES_PER_BATCH} reached, skipping {}",
                path.display()
            );
            intake.skipped.push(SkippedFile {
                path: path.clone(),
                reason: SkipReason::BatchFull,
            });
            continue;
        }

        match tokio::fs::read(path).await {
            Ok(data) => {
                intake.accepted.push(SourceImage::new(
                    next_source_id(),
                    file_name(path),
                    format,
                    Bytes::from(data),
                ));
                budget -= 1;
            }
            Err(e) => {
                warn!("Cannot read {}: {e}", path.display());
                intake.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: SkipReason::Unreadable(e.to_string()),
                });
            }
        }
    }

    debug!(
        "Intake accepted {} file(s), skipped {}",
        intake.accepted.len(),
        intake.skipped.len()
    );
    intake
}

fn format_for_path(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension()?.to_str()?;
    ext.parse().ok()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string()
}

/// Unique id for a new source: unix millis plus a process-wide sequence.
fn next_source_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = SOURCE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{millis}-{seq}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_allow_list_covers_the_supported_mimes() {
        for mime in ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/bmp", "image/webp"] {
            assert!(accepts_mime(mime), "{mime} should be accepted");
        }
        for mime in ["image/tiff", "image/svg+xml", "application/pdf", "text/html"] {
            assert!(!accepts_mime(mime), "{mime} should be rejected");
        }
    }

    #[test]
    fn formats_come_from_file_extensions() {
        assert_eq!(format_for_path(Path::new("a/photo.JPG")), Some(ImageFormat::JPEG));
        assert_eq!(format_for_path(Path::new("pic.webp")), Some(ImageFormat::WebP));
        assert_eq!(format_for_path(Path::new("notes.txt")), None);
        assert_eq!(format_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn source_ids_are_unique() {
        let a = next_source_id();
        let b = next_source_id();
        assert_ne!(a, b);
    }
}
