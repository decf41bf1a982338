// SPDX-License-Identifier: MPL-2.0
//! QR rendering customization.
//!
//! [`QrSize`] and [`QrMargin`] enforce their domains at the type level, so a
//! [`QrCustomization`] is valid by construction whatever its source (slider,
//! command line, or a persisted record written by an older build).

use crate::config::{
    DEFAULT_QR_MARGIN, DEFAULT_QR_SIZE, MAX_QR_MARGIN, MAX_QR_SIZE, MIN_QR_MARGIN, MIN_QR_SIZE,
    QR_SIZE_STEP,
};
use crate::domain::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// QrSize
// =============================================================================

/// Rendered image width in pixels, within 200–800 in steps of 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct QrSize(u32);

impl QrSize {
    /// Creates a size, clamping to the valid range and snapping to the
    /// nearest step.
    #[must_use]
    pub fn new(pixels: u32) -> Self {
        let clamped = pixels.clamp(MIN_QR_SIZE, MAX_QR_SIZE);
        let steps = (clamped - MIN_QR_SIZE + QR_SIZE_STEP / 2) / QR_SIZE_STEP;
        Self(MIN_QR_SIZE + steps * QR_SIZE_STEP)
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_QR_SIZE
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_QR_SIZE
    }
}

impl Default for QrSize {
    fn default() -> Self {
        Self(DEFAULT_QR_SIZE)
    }
}

impl From<u32> for QrSize {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<QrSize> for u32 {
    fn from(size: QrSize) -> Self {
        size.0
    }
}

// =============================================================================
// QrMargin
// =============================================================================

/// Quiet zone width in modules, within 0–10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct QrMargin(u32);

impl QrMargin {
    /// Creates a margin, clamping to the valid range.
    #[must_use]
    pub fn new(modules: u32) -> Self {
        Self(modules.clamp(MIN_QR_MARGIN, MAX_QR_MARGIN))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for QrMargin {
    fn default() -> Self {
        Self(DEFAULT_QR_MARGIN)
    }
}

impl From<u32> for QrMargin {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<QrMargin> for u32 {
    fn from(margin: QrMargin) -> Self {
        margin.0
    }
}

// =============================================================================
// ErrorCorrectionLevel
// =============================================================================

/// QR redundancy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl ErrorCorrectionLevel {
    pub const ALL: [ErrorCorrectionLevel; 4] = [
        ErrorCorrectionLevel::L,
        ErrorCorrectionLevel::M,
        ErrorCorrectionLevel::Q,
        ErrorCorrectionLevel::H,
    ];

    /// Label shown next to the level selector.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ErrorCorrectionLevel::L => "Low (~7%)",
            ErrorCorrectionLevel::M => "Medium (~15%)",
            ErrorCorrectionLevel::Q => "Quartile (~25%)",
            ErrorCorrectionLevel::H => "High (~30%)",
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ErrorCorrectionLevel::L => "L",
            ErrorCorrectionLevel::M => "M",
            ErrorCorrectionLevel::Q => "Q",
            ErrorCorrectionLevel::H => "H",
        };
        f.write_str(letter)
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrectionLevel::L),
            "M" => Ok(ErrorCorrectionLevel::M),
            "Q" => Ok(ErrorCorrectionLevel::Q),
            "H" => Ok(ErrorCorrectionLevel::H),
            _ => Err(format!("unknown error correction level '{s}': expected L, M, Q or H")),
        }
    }
}

// =============================================================================
// QrCustomization
// =============================================================================

/// User-adjustable rendering parameters.
///
/// The serialized form uses the camelCase field names of the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCustomization {
    pub foreground_color: Color,
    pub background_color: Color,
    pub size: QrSize,
    pub margin: QrMargin,
    pub error_correction_level: ErrorCorrectionLevel,
}

impl Default for QrCustomization {
    fn default() -> Self {
        Self {
            foreground_color: Color::BLACK,
            background_color: Color::WHITE,
            size: QrSize::default(),
            margin: QrMargin::default(),
            error_correction_level: ErrorCorrectionLevel::default(),
        }
    }
}

impl QrCustomization {
    /// Returns a copy with every field present in `patch` replaced.
    #[must_use]
    pub fn merged(self, patch: &CustomizationPatch) -> Self {
        Self {
            foreground_color: patch.foreground_color.unwrap_or(self.foreground_color),
            background_color: patch.background_color.unwrap_or(self.background_color),
            size: patch.size.unwrap_or(self.size),
            margin: patch.margin.unwrap_or(self.margin),
            error_correction_level: patch
                .error_correction_level
                .unwrap_or(self.error_correction_level),
        }
    }

    /// Serializes the full record for persistence.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds a record from its persisted JSON form.
    ///
    /// Missing fields take their defaults. Returns `None` when the text is not
    /// a JSON object of well-typed fields.
    #[must_use]
    pub fn restore(json: &str) -> Option<Self> {
        serde_json::from_str::<CustomizationPatch>(json)
            .ok()
            .map(|patch| Self::default().merged(&patch))
    }
}

/// A partial update to [`QrCustomization`]; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizationPatch {
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
    pub size: Option<QrSize>,
    pub margin: Option<QrMargin>,
    pub error_correction_level: Option<ErrorCorrectionLevel>,
}

impl CustomizationPatch {
    #[must_use]
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground_color = Some(color);
        self
    }

    #[must_use]
    pub fn background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    #[must_use]
    pub fn size(mut self, pixels: u32) -> Self {
        self.size = Some(QrSize::new(pixels));
        self
    }

    #[must_use]
    pub fn margin(mut self, modules: u32) -> Self {
        self.margin = Some(QrMargin::new(modules));
        self
    }

    #[must_use]
    pub fn error_correction(mut self, level: ErrorCorrectionLevel) -> Self {
        self.error_correction_level = Some(level);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_clamps_and_snaps_to_step() {
        assert_eq!(QrSize::new(0).value(), MIN_QR_SIZE);
        assert_eq!(QrSize::new(5000).value(), MAX_QR_SIZE);
        assert_eq!(QrSize::new(420).value(), 400);
        assert_eq!(QrSize::new(425).value(), 450);
        assert_eq!(QrSize::new(500).value(), 500);
        assert!(QrSize::new(200).is_min());
        assert!(QrSize::new(800).is_max());
    }

    #[test]
    fn margin_clamps_to_range() {
        assert_eq!(QrMargin::new(0).value(), 0);
        assert_eq!(QrMargin::new(11).value(), MAX_QR_MARGIN);
    }

    #[test]
    fn defaults_match_generator_defaults() {
        let custom = QrCustomization::default();
        assert_eq!(custom.foreground_color, Color::BLACK);
        assert_eq!(custom.background_color, Color::WHITE);
        assert_eq!(custom.size.value(), 400);
        assert_eq!(custom.margin.value(), 2);
        assert_eq!(custom.error_correction_level, ErrorCorrectionLevel::H);
    }

    #[test]
    fn merge_only_touches_patched_fields() {
        let base = QrCustomization {
            foreground_color: Color::rgb(0x123456),
            ..QrCustomization::default()
        };
        let merged = base.merged(&CustomizationPatch::default().size(500));
        assert_eq!(merged.size.value(), 500);
        assert_eq!(merged.foreground_color, base.foreground_color);
        assert_eq!(merged.background_color, base.background_color);
        assert_eq!(merged.margin, base.margin);
        assert_eq!(merged.error_correction_level, base.error_correction_level);
    }

    #[test]
    fn json_round_trip_uses_camel_case() {
        let custom = QrCustomization {
            error_correction_level: ErrorCorrectionLevel::Q,
            ..QrCustomization::default()
        };
        let json = custom.to_json().unwrap();
        assert!(json.contains("\"foregroundColor\":\"#000000\""));
        assert!(json.contains("\"errorCorrectionLevel\":\"Q\""));
        assert_eq!(QrCustomization::restore(&json), Some(custom));
    }

    #[test]
    fn restore_fills_missing_fields_with_defaults() {
        let restored = QrCustomization::restore(r#"{"margin": 7}"#).unwrap();
        assert_eq!(restored.margin.value(), 7);
        assert_eq!(restored.size, QrSize::default());
    }

    #[test]
    fn restore_clamps_out_of_range_numbers() {
        let restored = QrCustomization::restore(r#"{"size": 10000, "margin": 99}"#).unwrap();
        assert_eq!(restored.size.value(), MAX_QR_SIZE);
        assert_eq!(restored.margin.value(), MAX_QR_MARGIN);
    }

    #[test]
    fn restore_rejects_malformed_records() {
        assert_eq!(QrCustomization::restore("{not json"), None);
        assert_eq!(QrCustomization::restore(r#"{"foregroundColor": "blue"}"#), None);
        assert_eq!(QrCustomization::restore(r#"{"errorCorrectionLevel": "X"}"#), None);
        assert_eq!(QrCustomization::restore("[1, 2]"), None);
    }

    #[test]
    fn ecl_parses_case_insensitively() {
        assert_eq!("q".parse::<ErrorCorrectionLevel>(), Ok(ErrorCorrectionLevel::Q));
        assert!("Z".parse::<ErrorCorrectionLevel>().is_err());
        assert_eq!(ErrorCorrectionLevel::M.description(), "Medium (~15%)");
    }
}
