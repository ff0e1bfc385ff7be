//! Bulk export of completed results.
//!
//! Writes one file per completed result into an output directory, remapping
//! each name's extension to the output format and suffixing duplicates so
//! nothing inside one export pass is overwritten. Writes are awaited
//! sequentially; an optional inter-file delay is available for callers that
//! need to pace a downstream consumer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::core::TransformResult;
use crate::utils::{format_file_size, CompressorResult, ImageFormat};

/// Options controlling one export pass.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory the files are written into; created when missing
    pub output_dir: PathBuf,
    /// Optional pause before every file after the first
    pub delay: Option<Duration>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("compressed"),
            delay: None,
        }
    }
}

/// One file to write: the name it was submitted under plus its result.
#[derive(Debug, Clone)]
pub struct ExportItem {
    pub name: String,
    pub result: TransformResult,
}

/// Writes all `items` into `options.output_dir`.
///
/// Returns the written paths in item order.
pub async fn export_results(
    items: &[ExportItem],
    options: &ExportOptions,
) -> CompressorResult<Vec<PathBuf>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    tokio::fs::create_dir_all(&options.output_dir).await?;

    let mut written = Vec::with_capacity(items.len());
    let mut taken = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            if let Some(delay) = options.delay {
                tokio::time::sleep(delay).await;
            }
        }

        let file_name = unique_name(&output_name(&item.name, item.result.format), &mut taken);
        let path = options.output_dir.join(&file_name);

        tokio::fs::write(&path, &item.result.data).await?;
        debug!(
            "Wrote {} ({})",
            path.display(),
            format_file_size(item.result.output_size)
        );
        written.push(path);
    }

    info!(
        "Exported {} file(s) to {}",
        written.len(),
        options.output_dir.display()
    );
    Ok(written)
}

/// Replaces `name`'s extension with the primary extension for `format`.
fn output_name(name: &str, format: ImageFormat) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    format!("{stem}.{}", format.primary_extension())
}

/// Suffixes duplicate names with a counter so nothing gets overwritten
/// within one export pass.
fn unique_name(candidate: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(candidate.to_string()) {
        return candidate.to_string();
    }

    let path = Path::new(candidate);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let mut n = 1u32;
    loop {
        let next = format!("{stem}-{n}.{ext}");
        if taken.insert(next.clone()) {
            return next;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_follow_the_output_format() {
        assert_eq!(output_name("photo.png", ImageFormat::JPEG), "photo.jpg");
        assert_eq!(output_name("photo.jpeg", ImageFormat::JPEG), "photo.jpg");
        assert_eq!(output_name("scan.jpg", ImageFormat::WebP), "scan.webp");
        assert_eq!(output_name("noext", ImageFormat::PNG), "noext.png");
    }

    #[test]
    fn duplicate_names_get_numbered() {
        let mut taken = HashSet::new();
        assert_eq!(unique_name("a.webp", &mut taken), "a.webp");
        assert_eq!(unique_name("a.webp", &mut taken), "a-1.webp");
        assert_eq!(unique_name("a.webp", &mut taken), "a-2.webp");
        assert_eq!(unique_name("b.webp", &mut taken), "b.webp");
    }
}
