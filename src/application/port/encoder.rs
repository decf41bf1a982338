// SPDX-License-Identifier: MPL-2.0
//! QR encoder port definition.
//!
//! The encoder is a pure function of its inputs: the same content and
//! [`EncodeOptions`] always give the same output, and a failure produces no
//! partial output.

use crate::domain::color::Color;
use crate::domain::qr::{EncodedImage, ErrorCorrectionLevel, ImageKind, QrCustomization};
use std::fmt;

// =============================================================================
// EncodeOptions
// =============================================================================

/// Rendering parameters handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Target image width in pixels.
    pub width: u32,
    /// Quiet zone width in modules.
    pub margin: u32,
    /// Color of dark modules.
    pub dark_color: Color,
    /// Color of light modules and the quiet zone.
    pub light_color: Color,
    pub error_correction_level: ErrorCorrectionLevel,
}

impl From<&QrCustomization> for EncodeOptions {
    fn from(custom: &QrCustomization) -> Self {
        Self {
            width: custom.size.value(),
            margin: custom.margin.value(),
            dark_color: custom.foreground_color,
            light_color: custom.background_color,
            error_correction_level: custom.error_correction_level,
        }
    }
}

// =============================================================================
// EncodeError
// =============================================================================

/// Errors that can occur while encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The content does not fit in any QR version at the requested level.
    DataTooLong,

    /// The encoder rejected the content or options.
    InvalidInput(String),

    /// Producing the image from the module matrix failed.
    Render(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::DataTooLong => write!(f, "Content is too long for a QR code"),
            EncodeError::InvalidInput(msg) => write!(f, "Invalid QR input: {msg}"),
            EncodeError::Render(msg) => write!(f, "QR rendering failed: {msg}"),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<EncodeError> for crate::error::Error {
    fn from(err: EncodeError) -> Self {
        crate::error::Error::Encode(err.to_string())
    }
}

// =============================================================================
// QrEncoder Trait
// =============================================================================

/// Port for QR encoding.
///
/// # Example
///
/// ```ignore
/// use qrx::application::port::{EncodeOptions, QrEncoder};
///
/// fn preview(encoder: &impl QrEncoder, options: &EncodeOptions) -> String {
///     encoder
///         .encode_to_raster("https://example.com", options)
///         .unwrap_or_default()
/// }
/// ```
pub trait QrEncoder: Send + Sync {
    /// Encodes `content` into a PNG data URI (`data:image/png;base64,...`).
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the content cannot be encoded.
    fn encode_to_raster(&self, content: &str, options: &EncodeOptions)
        -> Result<String, EncodeError>;

    /// Encodes `content` into standalone SVG markup.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the content cannot be encoded.
    fn encode_to_vector_markup(
        &self,
        content: &str,
        options: &EncodeOptions,
    ) -> Result<String, EncodeError>;

    /// Encodes into the requested [`ImageKind`].
    fn encode(
        &self,
        kind: ImageKind,
        content: &str,
        options: &EncodeOptions,
    ) -> Result<EncodedImage, EncodeError> {
        match kind {
            ImageKind::Raster => self.encode_to_raster(content, options).map(EncodedImage::Raster),
            ImageKind::Vector => self
                .encode_to_vector_markup(content, options)
                .map(EncodedImage::Vector),
        }
    }
}
