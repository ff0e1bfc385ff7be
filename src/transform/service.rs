//! The transform service.
//!
//! Each image is processed inside a `tokio::task::spawn_blocking` call so the
//! async runtime is never blocked. Transforms are independent units of work
//! with no shared mutable state; batch concurrency is bounded by a semaphore
//! sized from the configured worker budget.

use std::f64::consts::SQRT_2;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use image::GenericImageView;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::core::{BatchItem, SourceImage, TransformConfig, TransformRequest, TransformResult};
use crate::utils::{
    compression_ratio, validate_config, validate_request, CompressorError, CompressorResult,
};

use super::decode::decode_image;
use super::encode::encode_image;
use super::resize::{resize_exact, resize_to_fit};

/// Bounded number of shrink attempts when output exceeds the size cap.
const MAX_SIZE_CAP_ATTEMPTS: u32 = 8;

/// Image transform service.
///
/// Stateless apart from its configuration. Cloning is cheap and clones share
/// the same worker budget.
#[derive(Clone)]
pub struct ImageTransformer {
    config: TransformConfig,
    semaphore: Arc<Semaphore>,
}

impl ImageTransformer {
    /// Creates a transformer, validating the configuration up front.
    pub fn new(config: TransformConfig) -> CompressorResult<Self> {
        validate_config(&config)?;
        debug!("Creating transformer with {} workers", config.workers);
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(config.workers)),
            config,
        })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transforms one source image.
    ///
    /// No retry; each call is independent and idempotent given identical
    /// inputs.
    pub async fn transform(
        &self,
        source: &SourceImage,
        request: &TransformRequest,
    ) -> CompressorResult<TransformResult> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| CompressorError::processing(format!("Worker budget closed: {e}")))?;

        let source = source.clone();
        let request = *request;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || transform_single(&source, &request, &config))
            .await
            .map_err(|e| CompressorError::processing(format!("Transform task panicked: {e}")))?
    }

    /// Transforms a batch concurrently.
    ///
    /// One item's failure does not cancel or affect its siblings; the output
    /// order always matches the input order.
    pub async fn transform_batch(
        &self,
        sources: &[SourceImage],
        request: &TransformRequest,
    ) -> Vec<BatchItem> {
        debug!("Processing batch of {} images", sources.len());

        let transforms = sources.iter().map(|source| {
            let id = source.id.clone();
            let name = source.name.clone();
            async move {
                let outcome = self.transform(source, request).await;
                match &outcome {
                    Ok(result) => {
                        let saved_kb = result.saved_bytes() as f64 / 1024.0;
                        debug!(
                            "{name} transformed ({saved_kb:.2} KB saved / {}% compression)",
                            result.compression_ratio
                        );
                    }
                    Err(e) => warn!("Transform failed for {name}: {e}"),
                }
                BatchItem { id, outcome }
            }
        });

        futures::future::join_all(transforms).await
    }
}

// ── Blocking pipeline (runs on tokio's blocking thread pool) ──────────────────────────

/// Runs the decode → resize → encode pipeline for one image.
fn transform_single(
    source: &SourceImage,
    request: &TransformRequest,
    config: &TransformConfig,
) -> CompressorResult<TransformResult> {
    validate_request(request)?;

    let started = Instant::now();
    let original_size = source.size();
    let target_format = request.target_format.unwrap_or(source.format);

    let mut image = decode_image(&source.data, source.format)?;

    // Ceiling resize before the first encode
    if let Some(max_dimension) = config.max_dimension {
        image = resize_to_fit(image, max_dimension)?;
    }

    let mut encoded = encode_image(&image, target_format, request.quality)?;

    // Shrink until the output fits under the size cap, halving the pixel
    // count per attempt. If the cap is still exceeded after the last
    // attempt the smallest output is returned as-is.
    if let Some(cap) = config.max_output_bytes {
        let mut attempts = 0;
        while encoded.len() as u64 > cap && attempts < MAX_SIZE_CAP_ATTEMPTS {
            let (width, height) = (image.width(), image.height());
            if width <= 1 && height <= 1 {
                break;
            }
            let dst_w = ((width as f64 / SQRT_2).round() as u32).max(1);
            let dst_h = ((height as f64 / SQRT_2).round() as u32).max(1);
            warn!(
                "{} exceeds the size cap ({} > {}), shrinking to {dst_w}×{dst_h}",
                source.name,
                encoded.len(),
                cap
            );
            image = resize_exact(&image, dst_w, dst_h)?;
            encoded = encode_image(&image, target_format, request.quality)?;
            attempts += 1;
        }
    }

    // Format conversion goes through a second decode → encode pass over the
    // already-encoded output, matching how a redraw-and-reencode behaves
    if request.target_format.is_some_and(|target| target != source.format) {
        let converted = decode_image(&encoded, target_format)?;
        encoded = encode_image(&converted, target_format, request.quality)?;
    }

    let output_size = encoded.len() as u64;
    Ok(TransformResult {
        data: Bytes::from(encoded),
        format: target_format,
        original_size,
        output_size,
        compression_ratio: compression_ratio(original_size, output_size),
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ImageFormat;
    use image::DynamicImage;
    use std::io::Cursor;

    fn png_source(id: &str) -> SourceImage {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(32, 32)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        SourceImage::new(id, format!("{id}.png"), ImageFormat::PNG, Bytes::from(buf.into_inner()))
    }

    fn transformer() -> ImageTransformer {
        ImageTransformer::new(TransformConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn keeps_the_source_format_without_a_target() {
        let result = transformer()
            .transform(&png_source("a"), &TransformRequest::default())
            .await
            .unwrap();
        assert_eq!(result.format, ImageFormat::PNG);
        assert_eq!(result.output_size, result.data.len() as u64);
        assert_eq!(
            result.compression_ratio,
            compression_ratio(result.original_size, result.output_size)
        );
    }

    #[tokio::test]
    async fn corrupt_payloads_fail_with_a_decode_error() {
        let source = SourceImage::new("bad", "bad.png", ImageFormat::PNG, Bytes::from_static(b"junk"));
        let err = transformer()
            .transform(&source, &TransformRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompressorError::Decode(_)));
    }

    #[tokio::test]
    async fn rejects_invalid_quality_before_decoding() {
        let request = TransformRequest { quality: 0.0, ..Default::default() };
        let err = transformer()
            .transform(&png_source("q"), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, CompressorError::Validation(_)));
    }

    #[test]
    fn rejects_a_zero_worker_config() {
        let config = TransformConfig { workers: 0, ..Default::default() };
        assert!(ImageTransformer::new(config).is_err());
    }

    #[test]
    fn exposes_its_configuration() {
        let config = TransformConfig { workers: 3, ..Default::default() };
        let transformer = ImageTransformer::new(config).unwrap();
        assert_eq!(transformer.config().workers, 3);
    }
}
