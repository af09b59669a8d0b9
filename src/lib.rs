#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Pixelift Image Enhancement Library
//!
//! A Rust library for enhancing images and compositing cutouts onto solid
//! backgrounds. The enhancement pipeline doubles the image resolution with a
//! cubic interpolator, applies a 3x3 sharpening convolution, then finishes
//! with contrast and sharpness tonal adjustments.
//!
//! Images with an alpha channel keep their transparency through the whole
//! pipeline: the alpha plane is upscaled with the same cubic interpolator as
//! the color data, but is never sharpened or tone-adjusted, so cutout edges
//! stay intact.
//!
//! ## Features
//!
//! - **Enhancement Pipeline**: 2x cubic upscale, 3x3 sharpen, contrast and sharpness tuning
//! - **Alpha-Aware Processing**: RGBA cutouts are enhanced without disturbing their mask
//! - **Color Compositing**: Flatten a cutout onto any hex color background
//! - **Background Removal Seam**: Pluggable `BackgroundRemover` trait for segmentation engines
//! - **Result Caching**: Content-addressed cache keyed by SHA-256 of the input bytes
//! - **Format Support**: PNG and JPEG output with configurable quality
//! - **CLI Integration**: Optional command-line interface (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixelift::{EnhancementProcessor, ProcessorConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ProcessorConfig::builder().build()?;
//! let mut processor = EnhancementProcessor::new(config);
//!
//! let input = std::fs::read("photo.jpg")?;
//! let result = processor.enhance_image(&input)?;
//! result.save_png("photo-enhanced.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI Usage
//!
//! - **Library Usage**: All processing operations are available by default
//! - **CLI Usage**: Enable the `cli` feature for the command-line interface
//!
//! ### Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! pixelift = { version = "0.2", default-features = false }
//! ```

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod composite;
pub mod config;
pub mod enhance;
pub mod error;
pub mod processor;
pub mod removal;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

// Public API exports
pub use cache::{CacheStats, ContentKey, ResultCache};
pub use color::{parse_hex_color, ColorRgb};
pub use composite::composite_over_color;
pub use config::{
    EnhanceSettings, OutputFormat, ProcessorConfig, ProcessorConfigBuilder,
    DEFAULT_CONTRAST_FACTOR, DEFAULT_SHARPNESS_FACTOR, SHARPEN_KERNEL, UPSCALE_FACTOR,
};
pub use enhance::enhance;
pub use error::{PixeliftError, Result};
pub use processor::EnhancementProcessor;
pub use removal::{BackgroundRemover, ChromaKeyRemover};
pub use services::{ChannelPolicy, ImageIoService};
pub use types::{AlphaPlane, ProcessedImage, RasterImage, StageTimings};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Enhance an image provided as bytes
///
/// This is a convenience API for one-shot processing. It decodes the bytes,
/// runs the full enhancement pipeline, and returns the processed result. Alpha
/// channels are discarded; use [`enhance_cutout_from_bytes`] to keep them.
///
/// # Arguments
///
/// * `image_bytes` - Raw image data as bytes (JPEG, PNG, TIFF)
/// * `config` - Configuration for the enhancement operation
///
/// # Returns
///
/// A [`ProcessedImage`] containing the enhanced image and stage timings
///
/// # Examples
///
/// ```rust,no_run
/// use pixelift::{enhance_from_bytes, ProcessorConfig};
///
/// # fn example(upload_bytes: Vec<u8>) -> anyhow::Result<()> {
/// let config = ProcessorConfig::builder().build()?;
/// let result = enhance_from_bytes(&upload_bytes, &config)?;
/// let output_bytes = result.to_bytes(config.output_format, config.jpeg_quality)?;
/// # Ok(())
/// # }
/// ```
pub fn enhance_from_bytes(image_bytes: &[u8], config: &ProcessorConfig) -> Result<ProcessedImage> {
    let mut processor = EnhancementProcessor::new(config.clone());
    processor.enhance_image(image_bytes)
}

/// Enhance an image cutout provided as bytes, preserving its alpha channel
///
/// The input must carry an alpha channel (RGBA or LA). The color planes go
/// through the full enhancement pipeline while the alpha plane is only
/// upscaled, keeping the cutout mask intact.
///
/// # Arguments
///
/// * `image_bytes` - Raw image data as bytes, with alpha
/// * `config` - Configuration for the enhancement operation
///
/// # Returns
///
/// A [`ProcessedImage`] whose image retains the upscaled alpha plane
pub fn enhance_cutout_from_bytes(
    image_bytes: &[u8],
    config: &ProcessorConfig,
) -> Result<ProcessedImage> {
    let mut processor = EnhancementProcessor::new(config.clone());
    processor.enhance_cutout(image_bytes)
}

/// Composite an image cutout onto a solid color background
///
/// Decodes the bytes as RGBA, alpha-blends them over the given hex color, and
/// returns a flattened RGB result. When `hex_color` is `None` the configured
/// default background color is used.
///
/// # Arguments
///
/// * `image_bytes` - Raw image data as bytes, with alpha
/// * `hex_color` - Optional hex color string such as `"#ff8800"` or `"336699"`
/// * `config` - Configuration providing the default background color
///
/// # Examples
///
/// ```rust,no_run
/// use pixelift::{composite_from_bytes, ProcessorConfig};
///
/// # fn example(cutout_bytes: Vec<u8>) -> anyhow::Result<()> {
/// let config = ProcessorConfig::builder().build()?;
/// let result = composite_from_bytes(&cutout_bytes, Some("#336699"), &config)?;
/// result.save_png("flattened.png")?;
/// # Ok(())
/// # }
/// ```
pub fn composite_from_bytes(
    image_bytes: &[u8],
    hex_color: Option<&str>,
    config: &ProcessorConfig,
) -> Result<ProcessedImage> {
    let mut processor = EnhancementProcessor::new(config.clone());
    processor.add_color_background(image_bytes, hex_color)
}
