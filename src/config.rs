//! Configuration types for enhancement and compositing operations

use crate::{
    color::ColorRgb,
    error::{PixeliftError, Result},
};
use serde::{Deserialize, Serialize};

/// Fixed 3x3 sharpening kernel: center 9, eight neighbors -1 (sum 1, so flat
/// regions keep their intensity)
pub const SHARPEN_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];

/// 3x3 low-pass kernel used as the degenerate image of the sharpness step
/// (weights 1 around a 5 center, normalized by 13)
pub const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    5.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
];

/// Fixed contrast enhancement factor applied to every processed image
pub const DEFAULT_CONTRAST_FACTOR: f32 = 1.2;

/// Fixed sharpness enhancement factor applied to every processed image
pub const DEFAULT_SHARPNESS_FACTOR: f32 = 1.1;

/// Fixed resolution multiplier of the geometric upscaler
pub const UPSCALE_FACTOR: u32 = 2;

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    Png,
    /// JPEG (no transparency)
    Jpeg,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

/// Tunable constants of the enhancement pipeline.
///
/// The defaults are the production values; the fields exist so tests can
/// parameterize the pipeline, not as a user-facing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceSettings {
    /// Contrast blend factor toward the mean luminance (1.0 = no change)
    pub contrast_factor: f32,
    /// Sharpness blend factor against the smoothed image (1.0 = no change)
    pub sharpness_factor: f32,
    /// Sharpening convolution kernel, row-major 3x3
    pub sharpen_kernel: [f32; 9],
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        Self {
            contrast_factor: DEFAULT_CONTRAST_FACTOR,
            sharpness_factor: DEFAULT_SHARPNESS_FACTOR,
            sharpen_kernel: SHARPEN_KERNEL,
        }
    }
}

/// Configuration for the request-level processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Enhancement pipeline constants
    pub enhance: EnhanceSettings,
    /// Output format for encoded responses
    pub output_format: OutputFormat,
    /// JPEG quality (0-100, only used for JPEG output)
    pub jpeg_quality: u8,
    /// Background fill used when a composite request supplies no color
    pub default_background: ColorRgb,
    /// Disable the removal result cache
    pub disable_cache: bool,
    /// Maximum number of cached removal results kept in memory
    pub cache_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            enhance: EnhanceSettings::default(),
            output_format: OutputFormat::default(),
            jpeg_quality: 90,
            default_background: ColorRgb::WHITE,
            disable_cache: false,
            cache_capacity: 64,
        }
    }
}

impl ProcessorConfig {
    /// Create a new configuration builder for fluent API construction
    #[must_use]
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }
}

/// Builder for [`ProcessorConfig`]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
        }
    }

    #[must_use]
    pub fn enhance_settings(mut self, settings: EnhanceSettings) -> Self {
        self.config.enhance = settings;
        self
    }

    #[must_use]
    pub fn contrast_factor(mut self, factor: f32) -> Self {
        self.config.enhance.contrast_factor = factor;
        self
    }

    #[must_use]
    pub fn sharpness_factor(mut self, factor: f32) -> Self {
        self.config.enhance.sharpness_factor = factor;
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(0, 100);
        self
    }

    #[must_use]
    pub fn default_background(mut self, color: ColorRgb) -> Self {
        self.config.default_background = color;
        self
    }

    #[must_use]
    pub fn disable_cache(mut self, disable: bool) -> Self {
        self.config.disable_cache = disable;
        self
    }

    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Build the processor configuration
    ///
    /// # Errors
    ///
    /// Returns [`PixeliftError::InvalidConfig`] for:
    /// - Non-finite or negative enhancement factors
    /// - A zero cache capacity while the cache is enabled
    pub fn build(self) -> Result<ProcessorConfig> {
        let enhance = &self.config.enhance;
        for (name, factor) in [
            ("contrast_factor", enhance.contrast_factor),
            ("sharpness_factor", enhance.sharpness_factor),
        ] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(PixeliftError::invalid_config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, factor
                )));
            }
        }
        if !self.config.disable_cache && self.config.cache_capacity == 0 {
            return Err(PixeliftError::invalid_config(
                "cache_capacity must be at least 1 unless the cache is disabled",
            ));
        }
        Ok(self.config)
    }
}

impl Default for ProcessorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
