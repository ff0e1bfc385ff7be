use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageReader};
use tracing::debug;

use crate::utils::{CompressorError, CompressorResult, ImageFormat};

/// Decodes an encoded payload into pixel data.
///
/// Content sniffing takes precedence over the declared format; the declared
/// format is used as a fallback when the payload has no recognisable
/// signature. Animated GIF sources decode to their first frame.
pub fn decode_image(data: &[u8], declared: ImageFormat) -> CompressorResult<DynamicImage> {
    let mut reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CompressorError::decode(format!("Cannot sniff image format: {e}")))?;

    if reader.format().is_none() {
        reader.set_format(codec_format(declared));
    }

    let image = reader
        .decode()
        .map_err(|e| CompressorError::decode(format!("Failed to decode image: {e}")))?;

    debug!("Decoded {}×{} image", image.width(), image.height());
    Ok(image)
}

/// Maps the crate's format enum onto the identifiers the `image` codecs use.
pub(crate) fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::JPEG => image::ImageFormat::Jpeg,
        ImageFormat::PNG => image::ImageFormat::Png,
        ImageFormat::WebP => image::ImageFormat::WebP,
        ImageFormat::GIF => image::ImageFormat::Gif,
        ImageFormat::BMP => image::ImageFormat::Bmp,
    }
}
