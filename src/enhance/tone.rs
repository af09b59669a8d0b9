//! Fixed-factor contrast and sharpness adjustment

use crate::{
    config::{EnhanceSettings, SMOOTH_KERNEL},
    enhance::sharpen::convolve3x3,
    types::RasterImage,
};
use image::{Rgb, RgbImage};

/// Apply the two tonal enhancement steps in their fixed order: contrast
/// toward the mean luminance, then a sharpness blend against a low-pass
/// filtered copy. Both steps run for every processed image; the alpha plane
/// passes through untouched.
#[must_use]
pub fn adjust_tone(image: &RasterImage, settings: &EnhanceSettings) -> RasterImage {
    match image {
        RasterImage::Rgb(color) => RasterImage::Rgb(adjust_color(color, settings)),
        RasterImage::Rgba { color, alpha } => RasterImage::Rgba {
            color: adjust_color(color, settings),
            alpha: alpha.clone(),
        },
    }
}

fn adjust_color(color: &RgbImage, settings: &EnhanceSettings) -> RgbImage {
    let contrasted = apply_contrast(color, settings.contrast_factor);
    apply_sharpness(&contrasted, settings.sharpness_factor)
}

/// Mean Rec. 601 luminance over the color channels
fn mean_luminance(image: &RgbImage) -> f32 {
    let pixel_count = u64::from(image.width()) * u64::from(image.height());
    if pixel_count == 0 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for pixel in image.pixels() {
        sum += 0.299 * f64::from(pixel.0[0])
            + 0.587 * f64::from(pixel.0[1])
            + 0.114 * f64::from(pixel.0[2]);
    }
    (sum / pixel_count as f64) as f32
}

/// Blend every channel sample away from the image-wide mean luminance
fn apply_contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_luminance(image);
    let (width, height) = image.dimensions();
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let mut adjusted = [0u8; 3];
        for (channel, value) in adjusted.iter_mut().zip(pixel.0) {
            let blended = mean + (f32::from(value) - mean) * factor;
            *channel = blended.round().clamp(0.0, 255.0) as u8;
        }
        out.put_pixel(x, y, Rgb(adjusted));
    }
    out
}

/// Blend the image away from a 3x3 smoothed copy of itself
fn apply_sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    let smoothed = convolve3x3(image, &SMOOTH_KERNEL);
    let (width, height) = image.dimensions();
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let base = smoothed.get_pixel(x, y).0;
        let mut adjusted = [0u8; 3];
        for ((channel, value), smooth) in adjusted.iter_mut().zip(pixel.0).zip(base) {
            let blended = f32::from(smooth) + (f32::from(value) - f32::from(smooth)) * factor;
            *channel = blended.round().clamp(0.0, 255.0) as u8;
        }
        out.put_pixel(x, y, Rgb(adjusted));
    }
    out
}
