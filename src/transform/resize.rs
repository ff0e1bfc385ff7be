use fast_image_resize as fr;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::utils::{CompressorError, CompressorResult};

/// Largest dimensions that fit `src` inside a `max_dimension` square without
/// changing its aspect ratio. Never upscales; both dimensions are floored
/// at 1px.
pub fn contain_dimensions(src_w: u32, src_h: u32, max_dimension: u32) -> (u32, u32) {
    let scale_w = max_dimension as f64 / src_w as f64;
    let scale_h = max_dimension as f64 / src_h as f64;
    let scale = scale_w.min(scale_h).min(1.0);

    let new_w = ((src_w as f64 * scale).round() as u32).max(1);
    let new_h = ((src_h as f64 * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Resizes `img` so neither dimension exceeds `max_dimension`, preserving
/// aspect ratio. Returns the input unchanged when it already fits.
pub fn resize_to_fit(img: DynamicImage, max_dimension: u32) -> CompressorResult<DynamicImage> {
    let (src_w, src_h) = (img.width(), img.height());
    let (dst_w, dst_h) = contain_dimensions(src_w, src_h, max_dimension);
    if (dst_w, dst_h) == (src_w, src_h) {
        return Ok(img);
    }
    resize_exact(&img, dst_w, dst_h)
}

/// Lanczos3 resampling on RGBA8 buffers via `fast_image_resize`.
pub fn resize_exact(img: &DynamicImage, dst_w: u32, dst_h: u32) -> CompressorResult<DynamicImage> {
    let rgba = img.to_rgba8();
    let (src_w, src_h) = rgba.dimensions();

    let src_image = fr::images::Image::from_vec_u8(src_w, src_h, rgba.into_raw(), fr::PixelType::U8x4)
        .map_err(|e| CompressorError::processing(format!("Cannot build resize source: {e}")))?;
    let mut dst_image = fr::images::Image::new(dst_w, dst_h, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| CompressorError::processing(format!("Resize failed: {e}")))?;

    debug!("Resized {src_w}×{src_h} → {dst_w}×{dst_h}");

    let resized = image::RgbaImage::from_raw(dst_w, dst_h, dst_image.into_vec())
        .ok_or_else(|| CompressorError::processing("Resized buffer has unexpected length"))?;

    Ok(DynamicImage::ImageRgba8(resized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keeps_images_already_within_the_ceiling() {
        assert_eq!(contain_dimensions(1920, 1080, 4096), (1920, 1080));
        assert_eq!(contain_dimensions(4096, 4096, 4096), (4096, 4096));
    }

    #[test]
    fn scales_down_the_longest_side_first() {
        assert_eq!(contain_dimensions(8192, 4096, 4096), (4096, 2048));
        assert_eq!(contain_dimensions(4096, 8192, 4096), (2048, 4096));
        assert_eq!(contain_dimensions(10, 10, 4), (4, 4));
    }

    #[test]
    fn extreme_aspect_ratios_keep_at_least_one_pixel() {
        assert_eq!(contain_dimensions(1, 10_000, 100), (1, 100));
        assert_eq!(contain_dimensions(10_000, 1, 100), (100, 1));
    }

    #[test]
    fn resizes_pixel_data_to_the_contained_dimensions() {
        let img = DynamicImage::new_rgb8(600, 300);
        let resized = resize_to_fit(img, 256).unwrap();
        assert_eq!((resized.width(), resized.height()), (256, 128));
    }

    #[test]
    fn leaves_small_images_untouched() {
        let img = DynamicImage::new_rgb8(100, 50);
        let resized = resize_to_fit(img, 4096).unwrap();
        assert_eq!((resized.width(), resized.height()), (100, 50));
    }

    proptest! {
        #[test]
        fn contained_dimensions_respect_the_ceiling(
            src_w in 1u32..20_000,
            src_h in 1u32..20_000,
            max in 1u32..8192,
        ) {
            let (w, h) = contain_dimensions(src_w, src_h, max);
            prop_assert!(w <= max && h <= max);
            prop_assert!(w >= 1 && h >= 1);
            // Never upscale
            prop_assert!(w <= src_w && h <= src_h);
        }
    }
}
