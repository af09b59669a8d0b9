//! Background removal collaborator abstraction
//!
//! The segmentation model runtime lives outside this crate. Callers inject an
//! implementation of [`BackgroundRemover`]; its failures propagate as request
//! failures and are never retried here.

use crate::error::Result;

/// Collaborator that removes the background from encoded image bytes.
///
/// Implementations receive raw encoded bytes (PNG/JPEG/...) and return raw
/// encoded bytes of an RGBA PNG whose background pixels are transparent. An
/// implementation is typically constructed once at process start and reused
/// across requests to keep model sessions warm.
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background from the given encoded image bytes
    ///
    /// # Errors
    ///
    /// Returns [`crate::PixeliftError::Removal`] (or an implementation's own
    /// mapped error) on malformed input or model failure.
    fn remove(&self, image_bytes: &[u8]) -> Result<Vec<u8>>;

    /// Short identifier for logs
    fn name(&self) -> &str {
        "background-remover"
    }
}

/// Deterministic in-process remover used by tests and examples.
///
/// Decodes the input, marks every pixel matching the corner background color
/// as fully transparent, and re-encodes as RGBA PNG. Not a segmentation
/// model; it exists so the processing paths can be exercised without one.
#[derive(Debug, Default)]
pub struct ChromaKeyRemover;

impl ChromaKeyRemover {
    /// Create a new chroma-key remover
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BackgroundRemover for ChromaKeyRemover {
    fn remove(&self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let decoded = image::load_from_memory(image_bytes)
            .map_err(|e| crate::error::PixeliftError::removal(format!("undecodable input: {}", e)))?;
        let mut rgba = decoded.to_rgba8();
        let key = rgba.get_pixel(0, 0).0;
        for pixel in rgba.pixels_mut() {
            if pixel.0[..3] == key[..3] {
                pixel.0[3] = 0;
            }
        }

        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        image::DynamicImage::ImageRgba8(rgba).write_to(&mut cursor, image::ImageFormat::Png)?;
        Ok(buffer)
    }

    fn name(&self) -> &str {
        "chroma-key"
    }
}
