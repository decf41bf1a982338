// SPDX-License-Identifier: MPL-2.0
//! Theme composition.
//!
//! The rendered theme has two independent dimensions: which [`Palette`] is
//! selected and whether the display [`Mode`] is dark or light. They are
//! folded into an [`EffectivePalette`] by [`EffectivePalette::derive`].

pub mod palette;

pub use palette::{Palette, PaletteId, UnknownPalette};

use crate::domain::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surface colors substituted in light mode.
pub mod light {
    use crate::domain::color::Color;

    pub const BACKGROUND: Color = Color::rgb(0xffffff);
    pub const SURFACE: Color = Color::rgb(0xf8f9fa);
    pub const TEXT: Color = Color::rgb(0x1a1a1a);
    pub const TEXT_SECONDARY: Color = Color::rgb(0x666666);
}

/// Display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Dark,
    Light,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Dark => "dark",
            Mode::Light => "light",
        }
    }

    /// The other mode, for a dark/light toggle.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Mode::Dark => Mode::Light,
            Mode::Light => Mode::Dark,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Mode::Dark),
            "light" => Ok(Mode::Light),
            other => Err(format!("unknown mode '{other}': expected dark or light")),
        }
    }
}

/// The palette actually rendered for a (palette, mode) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectivePalette {
    pub id: PaletteId,
    pub display_name: &'static str,
    pub mode: Mode,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub glow: Color,
}

impl EffectivePalette {
    /// Dark mode keeps the palette verbatim. Light mode keeps the brand
    /// colors (primary, secondary, accent, glow) and swaps the surfaces and
    /// text for the fixed [`light`] set.
    #[must_use]
    pub fn derive(palette: &Palette, mode: Mode) -> Self {
        let (background, surface, text, text_secondary) = match mode {
            Mode::Dark => (
                palette.background,
                palette.surface,
                palette.text,
                palette.text_secondary,
            ),
            Mode::Light => (
                light::BACKGROUND,
                light::SURFACE,
                light::TEXT,
                light::TEXT_SECONDARY,
            ),
        };

        Self {
            id: palette.id,
            display_name: palette.display_name,
            mode,
            primary: palette.primary,
            secondary: palette.secondary,
            accent: palette.accent,
            background,
            surface,
            text,
            text_secondary,
            glow: palette.glow,
        }
    }

    /// CSS custom properties for the presentation layer, in a stable order.
    #[must_use]
    pub fn css_variables(&self) -> [(&'static str, Color); 8] {
        [
            ("--theme-primary", self.primary),
            ("--theme-secondary", self.secondary),
            ("--theme-accent", self.accent),
            ("--theme-background", self.background),
            ("--theme-surface", self.surface),
            ("--theme-text", self.text),
            ("--theme-text-secondary", self.text_secondary),
            ("--theme-glow", self.glow),
        ]
    }
}
