//! Core types for the enhancement and compositing pipeline

use crate::{
    config::OutputFormat,
    error::{PixeliftError, Result},
};
use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Single-channel W x H grid of 8-bit opacity values.
///
/// Logically part of an RGBA [`RasterImage`] but manipulated independently
/// during upscaling, where it is resized with the same cubic kernel as the
/// color planes.
pub type AlphaPlane = GrayImage;

/// A decoded raster image with an explicit channel layout.
///
/// The pipeline dispatches exhaustively on this tagged representation instead
/// of inferring transparency from an implicit format flag. All planes of an
/// `Rgba` image share identical dimensions; the constructors enforce this.
#[derive(Debug, Clone)]
pub enum RasterImage {
    /// Opaque 3-channel image
    Rgb(RgbImage),
    /// 4-channel image split into its color and opacity planes
    Rgba {
        /// Color planes (RGB)
        color: RgbImage,
        /// Opacity plane
        alpha: AlphaPlane,
    },
}

impl RasterImage {
    /// Build an RGBA raster image from separate color and alpha planes
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::Internal`] when the planes disagree on
    /// dimensions.
    pub fn from_planes(color: RgbImage, alpha: AlphaPlane) -> Result<Self> {
        if color.dimensions() != alpha.dimensions() {
            return Err(PixeliftError::internal(format!(
                "alpha plane {}x{} does not match color planes {}x{}",
                alpha.width(),
                alpha.height(),
                color.width(),
                color.height()
            )));
        }
        Ok(Self::Rgba { color, alpha })
    }

    /// Build a raster image from a raw interleaved 8-bit buffer
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::UnsupportedChannelLayout`] for channel counts
    /// outside {3, 4}, and [`PixeliftError::Decode`] when the buffer length
    /// does not match `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(PixeliftError::decode(format!(
                "raw buffer is {} bytes, expected {} for {}x{}x{}",
                data.len(),
                expected,
                width,
                height,
                channels
            )));
        }
        match channels {
            3 => {
                let color = RgbImage::from_raw(width, height, data.to_vec())
                    .ok_or_else(|| PixeliftError::decode("RGB buffer rejected by image crate"))?;
                Ok(Self::Rgb(color))
            },
            4 => {
                let mut color = Vec::with_capacity(width as usize * height as usize * 3);
                let mut alpha = Vec::with_capacity(width as usize * height as usize);
                for pixel in data.chunks_exact(4) {
                    color.extend_from_slice(&pixel[..3]);
                    alpha.push(pixel[3]);
                }
                let color = RgbImage::from_raw(width, height, color)
                    .ok_or_else(|| PixeliftError::decode("RGB buffer rejected by image crate"))?;
                let alpha = AlphaPlane::from_raw(width, height, alpha)
                    .ok_or_else(|| PixeliftError::decode("alpha buffer rejected by image crate"))?;
                Self::from_planes(color, alpha)
            },
            other => Err(PixeliftError::UnsupportedChannelLayout { channels: other }),
        }
    }

    /// Split a decoded [`DynamicImage`] into its strict 3- or 4-channel form,
    /// preserving the presence of an alpha channel
    #[must_use]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            let (width, height) = rgba.dimensions();
            let mut color = RgbImage::new(width, height);
            let mut alpha = AlphaPlane::new(width, height);
            for (x, y, pixel) in rgba.enumerate_pixels() {
                color.put_pixel(x, y, image::Rgb([pixel.0[0], pixel.0[1], pixel.0[2]]));
                alpha.put_pixel(x, y, image::Luma([pixel.0[3]]));
            }
            Self::Rgba { color, alpha }
        } else {
            Self::Rgb(image.to_rgb8())
        }
    }

    /// Reassemble the image into a [`DynamicImage`] with the same channel
    /// layout (interleaving alpha back in for the RGBA arm)
    #[must_use]
    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Self::Rgb(color) => DynamicImage::ImageRgb8(color),
            Self::Rgba { color, alpha } => {
                let (width, height) = color.dimensions();
                let mut rgba = image::RgbaImage::new(width, height);
                for (x, y, pixel) in color.enumerate_pixels() {
                    let opacity = alpha.get_pixel(x, y).0[0];
                    rgba.put_pixel(
                        x,
                        y,
                        image::Rgba([pixel.0[0], pixel.0[1], pixel.0[2], opacity]),
                    );
                }
                DynamicImage::ImageRgba8(rgba)
            },
        }
    }

    /// Image dimensions as `(width, height)`
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Rgb(color) | Self::Rgba { color, .. } => color.dimensions(),
        }
    }

    /// Whether the image carries an alpha channel
    #[must_use]
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba { .. })
    }

    /// Number of interleaved channels (3 or 4)
    #[must_use]
    pub fn channel_count(&self) -> u8 {
        if self.has_alpha() {
            4
        } else {
            3
        }
    }

    /// Borrow the color planes
    #[must_use]
    pub fn color(&self) -> &RgbImage {
        match self {
            Self::Rgb(color) | Self::Rgba { color, .. } => color,
        }
    }

    /// Borrow the alpha plane, if present
    #[must_use]
    pub fn alpha(&self) -> Option<&AlphaPlane> {
        match self {
            Self::Rgb(_) => None,
            Self::Rgba { alpha, .. } => Some(alpha),
        }
    }
}

/// Per-stage timing breakdown for a processed request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    /// Time spent decoding input bytes
    pub decode_ms: u64,
    /// Time spent in the background removal collaborator (0 when unused)
    pub removal_ms: u64,
    /// Time spent in the enhancement or compositing pipeline
    pub pipeline_ms: u64,
    /// Time spent encoding the response, when measured
    pub encode_ms: Option<u64>,
    /// End-to-end time for the operation
    pub total_ms: u64,
}

impl StageTimings {
    /// One-line summary for logs
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Total: {}ms | Decode: {}ms | Removal: {}ms | Pipeline: {}ms",
            self.total_ms, self.decode_ms, self.removal_ms, self.pipeline_ms
        );
        if let Some(encode_ms) = self.encode_ms {
            summary.push_str(&format!(" | Encode: {}ms", encode_ms));
        }
        summary
    }
}

/// Result of a processing operation
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// The processed image, channel layout matching the pipeline contract
    pub image: DynamicImage,
    /// Dimensions of the decoded input before any upscaling
    pub original_dimensions: (u32, u32),
    /// Per-stage timing breakdown
    pub timings: StageTimings,
}

impl ProcessedImage {
    /// Create a new processed image result
    #[must_use]
    pub fn new(
        image: DynamicImage,
        original_dimensions: (u32, u32),
        timings: StageTimings,
    ) -> Self {
        Self {
            image,
            original_dimensions,
            timings,
        }
    }

    /// Get output image dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Encode as PNG bytes, keeping any alpha channel
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes(OutputFormat::Png, 100)
    }

    /// Encode in the specified format
    pub fn to_bytes(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        match format {
            OutputFormat::Png => {
                self.image.write_to(&mut cursor, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let rgb_image = self.image.to_rgb8();
                let mut jpeg_encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                jpeg_encoder.encode_image(&rgb_image)?;
            },
        }
        Ok(buffer)
    }

    /// Save as PNG with alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_bad_channel_counts() {
        let err = RasterImage::from_raw(2, 2, 2, &[0; 8]).unwrap_err();
        assert!(matches!(
            err,
            PixeliftError::UnsupportedChannelLayout { channels: 2 }
        ));

        let err = RasterImage::from_raw(2, 2, 5, &[0; 20]).unwrap_err();
        assert!(matches!(
            err,
            PixeliftError::UnsupportedChannelLayout { channels: 5 }
        ));
    }

    #[test]
    fn from_raw_rejects_short_buffers() {
        let err = RasterImage::from_raw(2, 2, 3, &[0; 11]).unwrap_err();
        assert!(matches!(err, PixeliftError::Decode(_)));
    }

    #[test]
    fn from_raw_splits_rgba_planes() {
        let data = [10, 20, 30, 40, 50, 60, 70, 80];
        let raster = RasterImage::from_raw(2, 1, 4, &data).unwrap();
        assert!(raster.has_alpha());
        assert_eq!(raster.channel_count(), 4);
        let alpha = raster.alpha().unwrap();
        assert_eq!(alpha.get_pixel(0, 0).0[0], 40);
        assert_eq!(alpha.get_pixel(1, 0).0[0], 80);
        assert_eq!(raster.color().get_pixel(1, 0).0, [50, 60, 70]);
    }

    #[test]
    fn from_planes_enforces_matching_dimensions() {
        let color = RgbImage::new(4, 4);
        let alpha = AlphaPlane::new(4, 5);
        assert!(RasterImage::from_planes(color, alpha).is_err());
    }

    #[test]
    fn dynamic_round_trip_preserves_layout() {
        let rgba = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 200]));
        let raster = RasterImage::from_dynamic(&DynamicImage::ImageRgba8(rgba));
        assert!(raster.has_alpha());
        let back = raster.into_dynamic();
        assert_eq!(back.color(), image::ColorType::Rgba8);
        assert_eq!(back.to_rgba8().get_pixel(2, 1).0, [1, 2, 3, 200]);

        let rgb = RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7]));
        let raster = RasterImage::from_dynamic(&DynamicImage::ImageRgb8(rgb));
        assert!(!raster.has_alpha());
        assert_eq!(raster.into_dynamic().color(), image::ColorType::Rgb8);
    }

    #[test]
    fn timings_summary_includes_encode_when_present() {
        let mut timings = StageTimings {
            total_ms: 12,
            decode_ms: 3,
            removal_ms: 0,
            pipeline_ms: 9,
            encode_ms: None,
        };
        assert!(!timings.summary().contains("Encode"));
        timings.encode_ms = Some(2);
        assert!(timings.summary().contains("Encode: 2ms"));
    }
}
