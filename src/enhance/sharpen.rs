//! Fixed-kernel 3x3 sharpening of color planes

use image::{Rgb, RgbImage};

/// Convolve each color channel independently with the 3x3 sharpening kernel.
///
/// Out-of-bounds sample coordinates clamp to the image edge (border
/// replication), so border pixels are filtered like interior ones and the
/// output is never cropped; per-channel results saturate at the [0, 255]
/// range. The alpha plane is never routed through this filter.
#[must_use]
pub fn sharpen(image: &RgbImage, kernel: &[f32; 9]) -> RgbImage {
    convolve3x3(image, kernel)
}

/// 3x3 convolution with replicated borders, row-major kernel
pub(crate) fn convolve3x3(image: &RgbImage, kernel: &[f32; 9]) -> RgbImage {
    let (width, height) = image.dimensions();
    let max_x = i64::from(width) - 1;
    let max_y = i64::from(height) - 1;
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let mut acc = [0.0f32; 3];
        for (tap, weight) in kernel.iter().enumerate() {
            let dx = (tap % 3) as i64 - 1;
            let dy = (tap / 3) as i64 - 1;
            let sx = (i64::from(x) + dx).clamp(0, max_x) as u32;
            let sy = (i64::from(y) + dy).clamp(0, max_y) as u32;
            let sample = image.get_pixel(sx, sy).0;
            for (channel, value) in acc.iter_mut().zip(sample) {
                *channel += weight * f32::from(value);
            }
        }
        *pixel = Rgb([
            acc[0].round().clamp(0.0, 255.0) as u8,
            acc[1].round().clamp(0.0, 255.0) as u8,
            acc[2].round().clamp(0.0, 255.0) as u8,
        ]);
    }
    out
}
