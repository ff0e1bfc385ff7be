use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

use crate::utils::{CompressorError, CompressorResult, ImageFormat};

/// Encodes pixel data at the requested quality factor.
///
/// The (0, 1] quality factor maps onto the 1-100 scale lossy encoders use.
/// PNG, GIF and BMP are not quality-controlled; the factor is ignored for
/// them.
pub fn encode_image(
    img: &DynamicImage,
    format: ImageFormat,
    quality: f32,
) -> CompressorResult<Vec<u8>> {
    let data = match format {
        ImageFormat::JPEG => {
            let mut buf = Cursor::new(Vec::new());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality_scale(quality));
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| CompressorError::encode(format!("JPEG encode failed: {e}")))?;
            buf.into_inner()
        }
        ImageFormat::PNG => {
            let mut buf = Cursor::new(Vec::new());
            img.write_to(&mut buf, image::ImageFormat::Png)
                .map_err(|e| CompressorError::encode(format!("PNG encode failed: {e}")))?;
            buf.into_inner()
        }
        ImageFormat::WebP => {
            // The image crate only writes lossless WebP; lossy goes through libwebp
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            webp::Encoder::from_rgba(&rgba, width, height)
                .encode(quality_scale(quality) as f32)
                .to_vec()
        }
        ImageFormat::GIF => {
            // The GIF encoder only accepts 8-bit RGB/RGBA frames
            let mut buf = Cursor::new(Vec::new());
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut buf, image::ImageFormat::Gif)
                .map_err(|e| CompressorError::encode(format!("GIF encode failed: {e}")))?;
            buf.into_inner()
        }
        ImageFormat::BMP => {
            let mut buf = Cursor::new(Vec::new());
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_to(&mut buf, image::ImageFormat::Bmp)
                .map_err(|e| CompressorError::encode(format!("BMP encode failed: {e}")))?;
            buf.into_inner()
        }
    };

    if data.is_empty() {
        return Err(CompressorError::encode("Encoder produced no output"));
    }

    debug!("Encoded {} bytes as {:?}", data.len(), format);
    Ok(data)
}

/// Maps a (0, 1] quality factor onto the 1-100 integer scale.
pub(crate) fn quality_scale(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_jpeg() {
        let img = DynamicImage::new_rgb8(10, 10);
        let data = encode_image(&img, ImageFormat::JPEG, 0.8).unwrap();
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn encodes_png() {
        let img = DynamicImage::new_rgb8(10, 10);
        let data = encode_image(&img, ImageFormat::PNG, 0.8).unwrap();
        assert_eq!(&data[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn encodes_lossy_webp() {
        let img = DynamicImage::new_rgb8(10, 10);
        let data = encode_image(&img, ImageFormat::WebP, 0.8).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
    }

    #[test]
    fn encodes_gif() {
        let img = DynamicImage::new_rgb8(10, 10);
        let data = encode_image(&img, ImageFormat::GIF, 0.8).unwrap();
        assert_eq!(&data[0..4], b"GIF8");
    }

    #[test]
    fn encodes_bmp() {
        let img = DynamicImage::new_rgb8(10, 10);
        let data = encode_image(&img, ImageFormat::BMP, 0.8).unwrap();
        assert_eq!(&data[0..2], b"BM");
    }

    #[test]
    fn quality_factor_maps_to_the_percent_scale() {
        assert_eq!(quality_scale(0.8), 80);
        assert_eq!(quality_scale(0.92), 92);
        assert_eq!(quality_scale(1.0), 100);
        // Tiny factors stay above the encoder minimum
        assert_eq!(quality_scale(0.001), 1);
    }

    #[test]
    fn jpeg_quality_changes_output_size() {
        let img = DynamicImage::ImageRgb8(image::ImageBuffer::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        }));
        let high = encode_image(&img, ImageFormat::JPEG, 1.0).unwrap();
        let low = encode_image(&img, ImageFormat::JPEG, 0.1).unwrap();
        assert!(low.len() < high.len());
    }
}
