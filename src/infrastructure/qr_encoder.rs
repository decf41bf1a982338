// SPDX-License-Identifier: MPL-2.0
//! QR encoder adapter backed by the `qrcode` crate.
//!
//! `qrcode` computes the module matrix; rendering is done here so the quiet
//! zone, colors and alpha follow [`EncodeOptions`] exactly.
//!
//! Raster output is `width` pixels square when the width can hold every
//! module including the margin, otherwise one pixel per module. Each pixel
//! takes the color of the module under it (floor mapping), so modules may
//! differ by one pixel in size when the width is not an exact multiple.

use crate::application::port::{EncodeError, EncodeOptions, QrEncoder};
use crate::domain::color::Color;
use crate::domain::qr::{ErrorCorrectionLevel, PNG_DATA_URI_PREFIX};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image_rs::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use std::fmt::Write as _;
use std::io::Cursor;

/// Module matrix of an encoded QR code.
struct Matrix {
    width: u32,
    dark: Vec<bool>,
}

impl Matrix {
    fn encode(content: &str, level: ErrorCorrectionLevel) -> Result<Self, EncodeError> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), ec_level(level))
            .map_err(map_qr_error)?;
        let width = u32::try_from(code.width())
            .map_err(|_| EncodeError::Render("module matrix too large".into()))?;
        let dark = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        Ok(Self { width, dark })
    }

    /// Whether the module at `(x, y)` is dark. Out-of-range coordinates
    /// belong to the quiet zone.
    fn is_dark(&self, x: i64, y: i64) -> bool {
        let width = i64::from(self.width);
        if x < 0 || y < 0 || x >= width || y >= width {
            return false;
        }
        // Both coordinates are in 0..width here.
        self.dark[(y * width + x) as usize]
    }
}

fn ec_level(level: ErrorCorrectionLevel) -> EcLevel {
    match level {
        ErrorCorrectionLevel::L => EcLevel::L,
        ErrorCorrectionLevel::M => EcLevel::M,
        ErrorCorrectionLevel::Q => EcLevel::Q,
        ErrorCorrectionLevel::H => EcLevel::H,
    }
}

fn map_qr_error(err: QrError) -> EncodeError {
    match err {
        QrError::DataTooLong => EncodeError::DataTooLong,
        other => EncodeError::InvalidInput(other.to_string()),
    }
}

/// Renders QR codes as PNG data URIs and SVG markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEncoder;

impl QrCodeEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders the module matrix to RGBA pixels.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the content cannot be encoded.
    pub fn render_pixels(
        &self,
        content: &str,
        options: &EncodeOptions,
    ) -> Result<RgbaImage, EncodeError> {
        let matrix = Matrix::encode(content, options.error_correction_level)?;
        let total = matrix.width + 2 * options.margin;
        let side = if options.width >= total {
            options.width
        } else {
            total
        };

        let dark = Rgba(options.dark_color.to_rgba8());
        let light = Rgba(options.light_color.to_rgba8());
        let margin = i64::from(options.margin);
        let to_module = |pixel: u32| {
            (u64::from(pixel) * u64::from(total) / u64::from(side)) as i64 - margin
        };

        Ok(RgbaImage::from_fn(side, side, |x, y| {
            if matrix.is_dark(to_module(x), to_module(y)) {
                dark
            } else {
                light
            }
        }))
    }
}

impl QrEncoder for QrCodeEncoder {
    fn encode_to_raster(
        &self,
        content: &str,
        options: &EncodeOptions,
    ) -> Result<String, EncodeError> {
        let pixels = self.render_pixels(content, options)?;
        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(pixels)
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| EncodeError::Render(e.to_string()))?;
        Ok(format!(
            "{PNG_DATA_URI_PREFIX}{}",
            STANDARD.encode(png.into_inner())
        ))
    }

    fn encode_to_vector_markup(
        &self,
        content: &str,
        options: &EncodeOptions,
    ) -> Result<String, EncodeError> {
        let matrix = Matrix::encode(content, options.error_correction_level)?;
        let total = matrix.width + 2 * options.margin;
        let margin = i64::from(options.margin);

        let mut path = String::new();
        for y in 0..i64::from(matrix.width) {
            for x in 0..i64::from(matrix.width) {
                if matrix.is_dark(x, y) {
                    // Writing into a String cannot fail.
                    let _ = write!(path, "M{} {}h1v1h-1z", x + margin, y + margin);
                }
            }
        }

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{w}" viewBox="0 0 {t} {t}" shape-rendering="crispEdges">"#,
            w = options.width.max(total),
            t = total,
        );
        let _ = write!(
            svg,
            r#"<rect width="{total}" height="{total}" fill="{}"{}/>"#,
            options.light_color.to_rgb_hex(),
            opacity_attr(options.light_color),
        );
        if !path.is_empty() {
            let _ = write!(
                svg,
                r#"<path fill="{}"{} d="{path}"/>"#,
                options.dark_color.to_rgb_hex(),
                opacity_attr(options.dark_color),
            );
        }
        svg.push_str("</svg>");
        Ok(svg)
    }
}

fn opacity_attr(color: Color) -> String {
    if color.is_opaque() {
        String::new()
    } else {
        format!(r#" fill-opacity="{:.3}""#, color.opacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::qr::{CustomizationPatch, QrCustomization};

    fn options(width: u32, margin: u32) -> EncodeOptions {
        let custom = QrCustomization::default().merged(&CustomizationPatch::default().margin(margin));
        EncodeOptions {
            width,
            ..EncodeOptions::from(&custom)
        }
    }

    #[test]
    fn raster_matches_requested_width() {
        let pixels = QrCodeEncoder
            .render_pixels("https://example.com", &options(400, 2))
            .unwrap();
        assert_eq!(pixels.dimensions(), (400, 400));
    }

    #[test]
    fn narrow_width_falls_back_to_one_pixel_per_module() {
        let pixels = QrCodeEncoder
            .render_pixels("https://example.com", &options(10, 2))
            .unwrap();
        // Smallest version at level H holding this content is 33 modules.
        let side = pixels.width();
        assert_eq!(side, pixels.height());
        assert!(side > 10);
        assert_eq!((side - 4) % 4, 1, "module count is 4·version + 17");
    }

    #[test]
    fn margin_is_painted_light_and_finder_pattern_dark() {
        let opts = options(200, 4);
        let pixels = QrCodeEncoder.render_pixels("hello", &opts).unwrap();
        let light = Rgba(Color::WHITE.to_rgba8());
        let dark = Rgba(Color::BLACK.to_rgba8());

        assert_eq!(pixels.get_pixel(0, 0), &light);
        // The top-left finder pattern starts right after the quiet zone.
        let total = pixels.width() as f32;
        let matrix = Matrix::encode("hello", opts.error_correction_level).unwrap();
        let module = total / (matrix.width + 8) as f32;
        let inside = (4.5 * module) as u32;
        assert_eq!(pixels.get_pixel(inside, inside), &dark);
    }

    #[test]
    fn alpha_is_preserved_in_raster() {
        let mut opts = options(200, 2);
        opts.light_color = Color::rgba(0xffffff00);
        let pixels = QrCodeEncoder.render_pixels("hello", &opts).unwrap();
        assert_eq!(pixels.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn raster_is_a_png_data_uri() {
        let uri = QrCodeEncoder
            .encode_to_raster("hello", &options(300, 2))
            .unwrap();
        let bytes = STANDARD
            .decode(uri.strip_prefix(PNG_DATA_URI_PREFIX).unwrap())
            .unwrap();
        let image = image_rs::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((image.width(), image.height()), (300, 300));
    }

    #[test]
    fn vector_markup_carries_colors_and_margin() {
        let mut opts = options(400, 3);
        opts.dark_color = Color::rgb(0xdc143c);
        opts.light_color = Color::rgba(0x0a0a0a80);

        let svg = QrCodeEncoder.encode_to_vector_markup("hello", &opts).unwrap();
        let matrix = Matrix::encode("hello", opts.error_correction_level).unwrap();
        let total = matrix.width + 6;

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(&format!(r#"viewBox="0 0 {total} {total}""#)));
        assert!(svg.contains(r##"fill="#dc143c""##));
        assert!(svg.contains(r##"fill="#0a0a0a" fill-opacity="0.502""##));
        assert!(svg.contains("M3 3h1v1h-1z"));
    }

    #[test]
    fn vector_markup_is_deterministic() {
        let opts = options(400, 2);
        let first = QrCodeEncoder.encode_to_vector_markup("same", &opts).unwrap();
        let second = QrCodeEncoder.encode_to_vector_markup("same", &opts).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_content_is_data_too_long() {
        let content = "x".repeat(4000);
        let err = QrCodeEncoder
            .encode_to_raster(&content, &options(400, 2))
            .unwrap_err();
        assert_eq!(err, EncodeError::DataTooLong);
    }

    #[test]
    fn every_error_correction_level_encodes() {
        for level in ErrorCorrectionLevel::ALL {
            let mut opts = options(200, 2);
            opts.error_correction_level = level;
            assert!(QrCodeEncoder.encode_to_raster("level", &opts).is_ok());
        }
    }
}
