//! Unified request processor
//!
//! This module provides the `EnhancementProcessor` that consolidates the
//! business logic behind every operation of the service: background removal
//! with result caching, the enhancement pipeline, and solid-color
//! compositing. The HTTP layer in front of it stays a thin adapter.

use crate::{
    cache::{content_key, CacheStats, ResultCache},
    color::{parse_hex_color, ColorRgb},
    composite::composite_over_color,
    config::ProcessorConfig,
    enhance::enhance,
    error::{PixeliftError, Result},
    removal::BackgroundRemover,
    services::{ChannelPolicy, ImageIoService},
    types::{ProcessedImage, RasterImage, StageTimings},
};
use instant::Instant;
use tracing::{debug, info, instrument};

/// Consolidated processor behind the service's operations.
///
/// One instance is constructed at process start and reused across requests;
/// every pipeline stage is pure, so the only state here is the configuration,
/// the injected removal collaborator, and the removal result cache.
pub struct EnhancementProcessor {
    config: ProcessorConfig,
    remover: Option<Box<dyn BackgroundRemover>>,
    cache: ResultCache,
}

impl EnhancementProcessor {
    /// Create a processor without a background removal collaborator.
    ///
    /// Enhancement and compositing work; removal operations fail with
    /// [`PixeliftError::InvalidConfig`] until a remover is injected.
    #[must_use]
    pub fn new(config: ProcessorConfig) -> Self {
        let cache = ResultCache::new(config.cache_capacity);
        Self {
            config,
            remover: None,
            cache,
        }
    }

    /// Create a processor with an injected removal collaborator
    #[must_use]
    pub fn with_remover(config: ProcessorConfig, remover: Box<dyn BackgroundRemover>) -> Self {
        let mut processor = Self::new(config);
        processor.remover = Some(remover);
        processor
    }

    /// Inject or replace the removal collaborator
    pub fn set_remover(&mut self, remover: Box<dyn BackgroundRemover>) {
        self.remover = Some(remover);
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Snapshot of the removal result cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached removal results
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Remove the background from encoded image bytes.
    ///
    /// Returns the collaborator's RGBA PNG bytes, served from the result
    /// cache when the same input was processed before.
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::InvalidConfig`] when no remover is
    /// configured and [`PixeliftError::Removal`] when the collaborator
    /// fails; collaborator failures are never retried.
    #[instrument(skip(self, image_bytes), fields(input_bytes = image_bytes.len()))]
    pub fn remove_background(&mut self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let removal_start = Instant::now();
        let output = self.cached_removal(image_bytes)?;
        info!(
            removal_ms = removal_start.elapsed().as_millis() as u64,
            output_bytes = output.len(),
            "background removal complete"
        );
        Ok(output)
    }

    /// Remove the background, then run the enhancement pipeline on the
    /// cutout (decoded as strict RGBA).
    ///
    /// # Errors
    ///
    /// Propagates removal failures, [`PixeliftError::Decode`] when the
    /// collaborator output cannot be decoded, and encoder errors.
    #[instrument(skip(self, image_bytes), fields(input_bytes = image_bytes.len()))]
    pub fn remove_and_enhance(&mut self, image_bytes: &[u8]) -> Result<ProcessedImage> {
        let total_start = Instant::now();
        let mut timings = StageTimings::default();

        let removal_start = Instant::now();
        let cutout_bytes = self.cached_removal(image_bytes)?;
        timings.removal_ms = removal_start.elapsed().as_millis() as u64;

        let decode_start = Instant::now();
        let raster = ImageIoService::decode(&cutout_bytes, ChannelPolicy::ForceRgba)
            .map_err(|e| match e {
                PixeliftError::Decode(msg) => PixeliftError::decode(format!(
                    "background removal output was not a decodable image: {}",
                    msg
                )),
                other => other,
            })?;
        timings.decode_ms = decode_start.elapsed().as_millis() as u64;

        self.finish_enhancement(raster, timings, total_start)
    }

    /// Run the enhancement pipeline on an opaque upload (decoded as strict
    /// RGB; any alpha in the upload is flattened first).
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::Decode`] for undecodable input.
    #[instrument(skip(self, image_bytes), fields(input_bytes = image_bytes.len()))]
    pub fn enhance_image(&mut self, image_bytes: &[u8]) -> Result<ProcessedImage> {
        self.enhance_with_policy(image_bytes, ChannelPolicy::ForceRgb)
    }

    /// Run the enhancement pipeline on an already background-removed upload
    /// (decoded as strict RGBA so the cutout's transparency is preserved).
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::Decode`] for undecodable input.
    #[instrument(skip(self, image_bytes), fields(input_bytes = image_bytes.len()))]
    pub fn enhance_cutout(&mut self, image_bytes: &[u8]) -> Result<ProcessedImage> {
        self.enhance_with_policy(image_bytes, ChannelPolicy::ForceRgba)
    }

    /// Composite an uploaded cutout over a solid background color.
    ///
    /// `color` is a `RRGGBB` hex string with optional leading `#`; when
    /// absent the configured default (white unless overridden) is used. The
    /// result is an opaque RGB image.
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::InvalidColorFormat`] for malformed colors
    /// and [`PixeliftError::Decode`] for undecodable input.
    #[instrument(skip(self, image_bytes), fields(input_bytes = image_bytes.len(), color))]
    pub fn add_color_background(
        &mut self,
        image_bytes: &[u8],
        color: Option<&str>,
    ) -> Result<ProcessedImage> {
        let total_start = Instant::now();
        let mut timings = StageTimings::default();

        let background = match color {
            Some(value) => parse_hex_color(value)?,
            None => self.config.default_background,
        };

        let decode_start = Instant::now();
        let raster = ImageIoService::decode(image_bytes, ChannelPolicy::ForceRgba)?;
        timings.decode_ms = decode_start.elapsed().as_millis() as u64;
        let original_dimensions = raster.dimensions();

        let pipeline_start = Instant::now();
        let composited = composite_over_color(&raster, background)?;
        timings.pipeline_ms = pipeline_start.elapsed().as_millis() as u64;
        timings.total_ms = total_start.elapsed().as_millis() as u64;

        debug!(
            background = %background,
            width = original_dimensions.0,
            height = original_dimensions.1,
            "composited over solid color"
        );

        Ok(ProcessedImage::new(
            composited.into_dynamic(),
            original_dimensions,
            timings,
        ))
    }

    /// Encode a processed image using the configured output format,
    /// recording the encode time in the result's timings
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::Image`] on encoder failures.
    pub fn encode(&self, result: &mut ProcessedImage) -> Result<Vec<u8>> {
        let encode_start = Instant::now();
        let bytes = result.to_bytes(self.config.output_format, self.config.jpeg_quality)?;
        result.timings.encode_ms = Some(encode_start.elapsed().as_millis() as u64);
        Ok(bytes)
    }

    /// The configured default background fill
    #[must_use]
    pub fn default_background(&self) -> ColorRgb {
        self.config.default_background
    }

    fn enhance_with_policy(
        &mut self,
        image_bytes: &[u8],
        policy: ChannelPolicy,
    ) -> Result<ProcessedImage> {
        let total_start = Instant::now();
        let mut timings = StageTimings::default();

        let decode_start = Instant::now();
        let raster = ImageIoService::decode(image_bytes, policy)?;
        timings.decode_ms = decode_start.elapsed().as_millis() as u64;

        self.finish_enhancement(raster, timings, total_start)
    }

    fn finish_enhancement(
        &mut self,
        raster: RasterImage,
        mut timings: StageTimings,
        total_start: Instant,
    ) -> Result<ProcessedImage> {
        let original_dimensions = raster.dimensions();

        let pipeline_start = Instant::now();
        let enhanced = enhance(&raster, &self.config.enhance);
        timings.pipeline_ms = pipeline_start.elapsed().as_millis() as u64;
        timings.total_ms = total_start.elapsed().as_millis() as u64;

        debug!(
            original_width = original_dimensions.0,
            original_height = original_dimensions.1,
            has_alpha = enhanced.has_alpha(),
            timings = %timings.summary(),
            "enhancement complete"
        );

        Ok(ProcessedImage::new(
            enhanced.into_dynamic(),
            original_dimensions,
            timings,
        ))
    }

    fn cached_removal(&mut self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let remover = self.remover.as_ref().ok_or_else(|| {
            PixeliftError::invalid_config(
                "no background remover configured. Inject one with with_remover() or set_remover().",
            )
        })?;

        if self.config.disable_cache {
            return remover.remove(image_bytes);
        }

        let key = content_key(image_bytes);
        if let Some(cached) = self.cache.get(&key) {
            debug!(remover = remover.name(), "removal result served from cache");
            return Ok(cached.to_vec());
        }

        let output = remover.remove(image_bytes)?;
        self.cache.put(key, output.clone());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::removal::ChromaKeyRemover;
    use image::{Rgb, RgbImage};

    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        image::DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn test_upload() -> Vec<u8> {
        let mut image = RgbImage::from_pixel(6, 6, Rgb([0, 255, 0]));
        for y in 2..4 {
            for x in 2..4 {
                image.put_pixel(x, y, Rgb([180, 40, 40]));
            }
        }
        png_bytes(&image)
    }

    #[test]
    fn removal_requires_an_injected_collaborator() {
        let mut processor = EnhancementProcessor::new(ProcessorConfig::default());
        let err = processor.remove_background(&test_upload()).unwrap_err();
        assert!(matches!(err, PixeliftError::InvalidConfig(_)));
    }

    #[test]
    fn removal_results_are_cached_by_content() {
        let mut processor = EnhancementProcessor::with_remover(
            ProcessorConfig::default(),
            Box::new(ChromaKeyRemover::new()),
        );
        let upload = test_upload();

        let first = processor.remove_background(&upload).unwrap();
        let second = processor.remove_background(&upload).unwrap();
        assert_eq!(first, second);

        let stats = processor.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn disabled_cache_skips_accounting() {
        let config = ProcessorConfig::builder().disable_cache(true).build().unwrap();
        let mut processor =
            EnhancementProcessor::with_remover(config, Box::new(ChromaKeyRemover::new()));
        let upload = test_upload();
        processor.remove_background(&upload).unwrap();
        processor.remove_background(&upload).unwrap();

        let stats = processor.cache_stats();
        assert_eq!(stats.hits + stats.misses, 0);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn enhance_image_doubles_dimensions_and_stays_opaque() {
        let mut processor = EnhancementProcessor::new(ProcessorConfig::default());
        let result = processor.enhance_image(&test_upload()).unwrap();
        assert_eq!(result.original_dimensions, (6, 6));
        assert_eq!(result.dimensions(), (12, 12));
        assert!(!result.image.color().has_alpha());
    }

    #[test]
    fn remove_and_enhance_produces_a_transparent_upscale() {
        let mut processor = EnhancementProcessor::with_remover(
            ProcessorConfig::default(),
            Box::new(ChromaKeyRemover::new()),
        );
        let result = processor.remove_and_enhance(&test_upload()).unwrap();
        assert_eq!(result.dimensions(), (12, 12));
        assert!(result.image.color().has_alpha());
        // The keyed-out background must still be transparent somewhere
        let rgba = result.image.to_rgba8();
        assert!(rgba.pixels().any(|p| p.0[3] < 255));
    }

    #[test]
    fn add_color_background_defaults_to_configured_fill() {
        let mut processor = EnhancementProcessor::new(ProcessorConfig::default());
        // An opaque upload forced to RGBA composites to itself, so use the
        // remover stub to get real transparency first
        processor.set_remover(Box::new(ChromaKeyRemover::new()));
        let cutout = processor.remove_background(&test_upload()).unwrap();

        let result = processor.add_color_background(&cutout, None).unwrap();
        assert!(!result.image.color().has_alpha());
        let rgb = result.image.to_rgb8();
        // Keyed background pixels took the white default
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        // Foreground pixels survive
        assert_eq!(rgb.get_pixel(2, 2).0, [180, 40, 40]);
    }

    #[test]
    fn add_color_background_rejects_malformed_colors() {
        let mut processor = EnhancementProcessor::new(ProcessorConfig::default());
        let err = processor
            .add_color_background(&test_upload(), Some("#ZZZZZZ"))
            .unwrap_err();
        assert!(matches!(err, PixeliftError::InvalidColorFormat(_)));
    }

    #[test]
    fn encode_respects_configured_format_and_records_timing() {
        let mut processor = EnhancementProcessor::new(ProcessorConfig::default());
        let mut result = processor.enhance_image(&test_upload()).unwrap();
        assert!(result.timings.encode_ms.is_none());
        let bytes = processor.encode(&mut result).unwrap();
        // PNG magic
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert!(result.timings.encode_ms.is_some());
        assert!(result.timings.summary().contains("Encode"));
    }
}
