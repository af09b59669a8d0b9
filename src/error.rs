//! Error types for the enhancement and compositing pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PixeliftError>;

/// Error types for image enhancement and compositing operations
#[derive(Error, Debug)]
pub enum PixeliftError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or codec errors from the image crate
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed hex color string (wrong length or non-hex characters)
    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),

    /// Compositing was requested on an image without an alpha channel
    #[error("Missing alpha channel: {0}")]
    MissingAlphaChannel(String),

    /// Bytes could not be decoded into a raster image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Decoded image has a channel count outside {3, 4}
    #[error("Unsupported channel layout: {channels} channels (expected 3 or 4)")]
    UnsupportedChannelLayout {
        /// Channel count that was rejected
        channels: u8,
    },

    /// Background removal collaborator failure
    #[error("Removal error: {0}")]
    Removal(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PixeliftError {
    /// Create a new invalid color format error
    pub fn invalid_color<S: Into<String>>(msg: S) -> Self {
        Self::InvalidColorFormat(msg.into())
    }

    /// Create a new missing alpha channel error
    pub fn missing_alpha<S: Into<String>>(msg: S) -> Self {
        Self::MissingAlphaChannel(msg.into())
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new removal collaborator error
    pub fn removal<S: Into<String>>(msg: S) -> Self {
        Self::Removal(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a decode error with stage context
    pub fn decode_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {})", info),
            None => String::new(),
        };

        Self::Decode(format!(
            "Decoding failed at stage '{}'{}: {}",
            stage, input_context, details
        ))
    }
}
