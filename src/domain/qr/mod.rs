// SPDX-License-Identifier: MPL-2.0
//! QR generator domain types.

pub mod customization;
pub mod input;

pub use customization::{
    CustomizationPatch, ErrorCorrectionLevel, QrCustomization, QrMargin, QrSize,
};
pub use input::{QrFormat, QrInput};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of the PNG data URIs produced for raster images.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Raster (PNG) or vector (SVG) output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    #[default]
    Raster,
    Vector,
}

impl ImageKind {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Raster => "png",
            ImageKind::Vector => "svg",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Raster => "image/png",
            ImageKind::Vector => "image/svg+xml",
        }
    }
}

impl FromStr for ImageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raster" | "png" => Ok(ImageKind::Raster),
            "vector" | "svg" => Ok(ImageKind::Vector),
            other => Err(format!("unknown image kind '{other}': expected png or svg")),
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An encoded QR image as produced by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedImage {
    /// PNG data URI (`data:image/png;base64,...`).
    Raster(String),
    /// SVG markup.
    Vector(String),
}

impl EncodedImage {
    #[must_use]
    pub fn kind(&self) -> ImageKind {
        match self {
            EncodedImage::Raster(_) => ImageKind::Raster,
            EncodedImage::Vector(_) => ImageKind::Vector,
        }
    }

    /// The raw payload: data URI or markup.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            EncodedImage::Raster(uri) | EncodedImage::Vector(uri) => uri,
        }
    }
}
