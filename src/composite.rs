//! Alpha compositing over an opaque solid-color background

use crate::{
    color::ColorRgb,
    error::{PixeliftError, Result},
    types::RasterImage,
};
use image::{Rgb, RgbImage};

/// Composite a foreground image over an opaque background of the given color
/// using the standard "over" blend, then drop the alpha channel.
///
/// Per color channel: `out = (fg * a + bg * (255 - a) + 127) / 255`, which
/// rounds and collapses exactly to the foreground at `a = 255` and exactly to
/// the background at `a = 0`.
///
/// # Errors
///
/// Returns [`PixeliftError::MissingAlphaChannel`] when the foreground carries
/// no alpha plane; compositing an opaque image is a caller contract
/// violation.
pub fn composite_over_color(foreground: &RasterImage, background: ColorRgb) -> Result<RasterImage> {
    let RasterImage::Rgba { color, alpha } = foreground else {
        return Err(PixeliftError::missing_alpha(
            "composite requested on a 3-channel image",
        ));
    };

    let (width, height) = color.dimensions();
    let fill = background.channels();
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in color.enumerate_pixels() {
        let a = u32::from(alpha.get_pixel(x, y).0[0]);
        let mut blended = [0u8; 3];
        for ((channel, fg), bg) in blended.iter_mut().zip(pixel.0).zip(fill) {
            let value = (u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255;
            *channel = value as u8;
        }
        out.put_pixel(x, y, Rgb(blended));
    }
    Ok(RasterImage::Rgb(out))
}
