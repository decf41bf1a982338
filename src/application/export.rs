// SPDX-License-Identifier: MPL-2.0
//! Conversion of encoded images into downloadable files.
//!
//! Vector exports are produced by the encoder directly. Raster exports are
//! composed here: the cached preview is decoded, scaled onto an opaque
//! square canvas filled with the background color, and encoded as PNG.

use crate::application::port::EncodeError;
use crate::domain::color::Color;
use crate::domain::qr::{EncodedImage, ImageKind, QrSize, PNG_DATA_URI_PREFIX};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use image_rs::imageops::{self, FilterType};
use image_rs::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resvg::usvg;
use std::fmt;
use std::io::Cursor;

// =============================================================================
// ExportError
// =============================================================================

/// Errors surfaced by an export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// There is no content or no generated image yet.
    NothingToExport,

    /// Re-encoding for a vector export failed.
    Encode(EncodeError),

    /// Decoding the cached image or composing the PNG failed.
    Render(String),

    /// The download sink could not store the file.
    Save(crate::error::Error),
}

impl ExportError {
    /// Message suitable for a blocking user notification.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::NothingToExport => "Please generate a QR code first!",
            ExportError::Encode(_) | ExportError::Render(_) | ExportError::Save(_) => {
                "Error downloading QR code. Please try again."
            }
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NothingToExport => write!(f, "No QR code has been generated yet"),
            ExportError::Encode(e) => write!(f, "Export encoding failed: {e}"),
            ExportError::Render(msg) => write!(f, "Export rendering failed: {msg}"),
            ExportError::Save(e) => write!(f, "Export save failed: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<EncodeError> for ExportError {
    fn from(err: EncodeError) -> Self {
        ExportError::Encode(err)
    }
}

impl From<image_rs::ImageError> for ExportError {
    fn from(err: image_rs::ImageError) -> Self {
        ExportError::Render(err.to_string())
    }
}

// =============================================================================
// File naming
// =============================================================================

/// Timestamped file name for an export, e.g. `qrcode-1700000000000.png`.
#[must_use]
pub fn export_filename(kind: ImageKind, at: DateTime<Utc>) -> String {
    format!("qrcode-{}.{}", at.timestamp_millis(), kind.extension())
}

// =============================================================================
// Raster composition
// =============================================================================

/// Side length of an exported PNG: the preview size, raised to `floor`.
#[must_use]
pub fn raster_target_size(size: QrSize, floor: u32) -> u32 {
    size.value().max(floor)
}

/// Composes the PNG bytes of a raster export.
///
/// The background is always painted opaque, so translucent background colors
/// never leave transparent edges in the file.
///
/// # Errors
///
/// Returns [`ExportError::Render`] if the cached image cannot be decoded.
pub fn compose_raster(
    image: &EncodedImage,
    background: Color,
    side: u32,
) -> Result<Vec<u8>, ExportError> {
    let qr = match image {
        EncodedImage::Raster(uri) => decode_data_uri(uri)?,
        EncodedImage::Vector(markup) => rasterize_svg(markup, side)?,
    };

    let scaled = if qr.dimensions() == (side, side) {
        qr
    } else {
        imageops::resize(&qr, side, side, FilterType::Nearest)
    };

    let [r, g, b, _] = background.to_rgba8();
    let mut canvas = RgbaImage::from_pixel(side, side, Rgba([r, g, b, 0xff]));
    imageops::overlay(&mut canvas, &scaled, 0, 0);

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas).write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

fn decode_data_uri(uri: &str) -> Result<RgbaImage, ExportError> {
    let encoded = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or_else(|| ExportError::Render("image is not a PNG data URI".into()))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ExportError::Render(e.to_string()))?;
    let decoded = image_rs::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
    Ok(decoded.to_rgba8())
}

fn rasterize_svg(markup: &str, side: u32) -> Result<RgbaImage, ExportError> {
    let tree = usvg::Tree::from_data(markup.as_bytes(), &usvg::Options::default())
        .map_err(|e| ExportError::Render(e.to_string()))?;

    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(ExportError::Render("SVG has empty dimensions".into()));
    }

    let mut pixmap = tiny_skia::Pixmap::new(side, side)
        .ok_or_else(|| ExportError::Render("failed to allocate pixmap".into()))?;
    let transform = tiny_skia::Transform::from_scale(
        side as f32 / size.width(),
        side as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // Pixmap data is premultiplied; going through PNG yields straight alpha.
    let png = pixmap
        .encode_png()
        .map_err(|e| ExportError::Render(e.to_string()))?;
    let decoded = image_rs::load_from_memory_with_format(&png, ImageFormat::Png)?;
    Ok(decoded.to_rgba8())
}
