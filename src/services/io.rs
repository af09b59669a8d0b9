//! Image decode/encode operations service
//!
//! This module separates codec concerns from the pipeline business logic.
//! Uploaded bytes are normalized to a strict 3- or 4-channel representation
//! before any pipeline stage runs; paletted and single-channel layouts never
//! reach the pipeline.

use crate::{
    config::OutputFormat,
    error::{PixeliftError, Result},
    types::RasterImage,
};
use std::path::Path;

/// How decoding maps the source channel layout onto the pipeline's strict
/// 3/4-channel data model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPolicy {
    /// Keep alpha when the decoded layout carries it, otherwise RGB
    Preserve,
    /// Flatten to opaque RGB regardless of the decoded layout
    ForceRgb,
    /// Expand to RGBA, synthesizing full opacity when the source has none
    ForceRgba,
}

/// Service for decoding request bytes and encoding response images
pub struct ImageIoService;

impl ImageIoService {
    /// Decode encoded image bytes into a raster image under the given
    /// channel policy.
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::Decode`] when the bytes cannot be decoded by
    /// any supported codec.
    pub fn decode(bytes: &[u8], policy: ChannelPolicy) -> Result<RasterImage> {
        let decoded = image::load_from_memory(bytes).map_err(|e| {
            PixeliftError::decode_stage_error(
                "request decode",
                &e.to_string(),
                Some(&format!("{} bytes", bytes.len())),
            )
        })?;

        log::debug!(
            "decoded {}x{} image ({:?}) under policy {:?}",
            decoded.width(),
            decoded.height(),
            decoded.color(),
            policy
        );

        let raster = match policy {
            ChannelPolicy::Preserve => RasterImage::from_dynamic(&decoded),
            ChannelPolicy::ForceRgb => RasterImage::Rgb(decoded.to_rgb8()),
            ChannelPolicy::ForceRgba => {
                RasterImage::from_dynamic(&image::DynamicImage::ImageRgba8(decoded.to_rgba8()))
            },
        };
        Ok(raster)
    }

    /// Encode a raster image in the given response format
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::Image`] on encoder failures.
    pub fn encode(image: RasterImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        let dynamic = image.into_dynamic();
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        match format {
            OutputFormat::Png => {
                dynamic.write_to(&mut cursor, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let rgb_image = dynamic.to_rgb8();
                let mut jpeg_encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                jpeg_encoder.encode_image(&rgb_image)?;
            },
        }
        Ok(buffer)
    }

    /// Read and decode an image file
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::Io`] for filesystem failures and
    /// [`PixeliftError::Decode`] for undecodable content.
    pub fn load_file<P: AsRef<Path>>(path: P, policy: ChannelPolicy) -> Result<RasterImage> {
        let path_ref = path.as_ref();
        let bytes = std::fs::read(path_ref).map_err(|e| {
            PixeliftError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read '{}': {}", path_ref.display(), e),
            ))
        })?;
        Self::decode(&bytes, policy)
    }
}
