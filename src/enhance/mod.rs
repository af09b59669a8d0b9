//! Image enhancement pipeline: upscale, sharpen, tonal adjustment
//!
//! Stages are value-transforming and total over well-formed input; the
//! pipeline dispatches exhaustively on the channel layout of the input and
//! always returns the same layout. Alpha never enters the sharpening filter,
//! and the alpha plane is resized with the same cubic kernel as color.

pub mod sharpen;
pub mod tone;
pub mod upscale;

pub use sharpen::sharpen;
pub use tone::adjust_tone;
pub use upscale::{upscale2x_alpha, upscale2x_color};

use crate::{config::EnhanceSettings, types::RasterImage};
use tracing::debug;

/// Run the full enhancement pipeline on a decoded raster image.
///
/// RGB: upscale, sharpen, tonal adjustment. RGBA: upscale color and alpha
/// separately, sharpen the color planes only, recombine, then tonal
/// adjustment with alpha passthrough. The output carries the input's channel
/// layout at double the resolution.
#[must_use]
pub fn enhance(image: &RasterImage, settings: &EnhanceSettings) -> RasterImage {
    let (width, height) = image.dimensions();
    debug!(
        width,
        height,
        has_alpha = image.has_alpha(),
        "running enhancement pipeline"
    );

    let upscaled = match image {
        RasterImage::Rgb(color) => {
            let upscaled = upscale2x_color(color);
            RasterImage::Rgb(sharpen(&upscaled, &settings.sharpen_kernel))
        },
        RasterImage::Rgba { color, alpha } => {
            let upscaled_color = upscale2x_color(color);
            let upscaled_alpha = upscale2x_alpha(alpha);
            RasterImage::Rgba {
                color: sharpen(&upscaled_color, &settings.sharpen_kernel),
                alpha: upscaled_alpha,
            }
        },
    };

    adjust_tone(&upscaled, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlphaPlane;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn output_layout_matches_input_layout() {
        let rgb = RasterImage::Rgb(RgbImage::new(4, 4));
        let enhanced = enhance(&rgb, &EnhanceSettings::default());
        assert!(!enhanced.has_alpha());
        assert_eq!(enhanced.dimensions(), (8, 8));

        let rgba = RasterImage::Rgba {
            color: RgbImage::new(4, 4),
            alpha: AlphaPlane::new(4, 4),
        };
        let enhanced = enhance(&rgba, &EnhanceSettings::default());
        assert!(enhanced.has_alpha());
        assert_eq!(enhanced.dimensions(), (8, 8));
    }

    #[test]
    fn flat_red_field_survives_the_whole_chain() {
        // 10x10 opaque red yields a 20x20 image that is still pure red:
        // cubic resampling, the sum-1 kernel, and both tonal steps are all
        // identity (modulo clamping) on a flat field
        let input = RasterImage::Rgb(RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])));
        let enhanced = enhance(&input, &EnhanceSettings::default());
        assert_eq!(enhanced.dimensions(), (20, 20));
        assert!(enhanced.color().pixels().all(|p| p.0 == [255, 0, 0]));
    }

    #[test]
    fn binary_alpha_becomes_smoothed_after_enhancement() {
        let color = RgbImage::from_pixel(4, 4, Rgb([50, 50, 50]));
        let mut alpha = AlphaPlane::new(4, 4);
        for (x, y, pixel) in alpha.enumerate_pixels_mut() {
            *pixel = Luma([if (x + y) % 2 == 0 { 0 } else { 255 }]);
        }
        let input = RasterImage::Rgba { color, alpha };
        let enhanced = enhance(&input, &EnhanceSettings::default());
        assert_eq!(enhanced.dimensions(), (8, 8));
        let alpha = enhanced.alpha().unwrap();
        assert!(alpha.pixels().any(|p| p.0[0] > 0 && p.0[0] < 255));
    }

    #[test]
    fn odd_dimensions_double_exactly() {
        let input = RasterImage::Rgb(RgbImage::new(7, 3));
        let enhanced = enhance(&input, &EnhanceSettings::default());
        assert_eq!(enhanced.dimensions(), (14, 6));
    }
}
