// SPDX-License-Identifier: MPL-2.0
//! Built-in anime palettes.
//!
//! The catalog is fixed at compile time: every [`PaletteId`] maps to exactly
//! one [`Palette`] through [`PaletteId::palette`].

use crate::domain::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a built-in palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteId {
    #[default]
    DragonBall,
    AttackTitan,
    DemonSlayer,
    OnePiece,
}

impl PaletteId {
    /// All palettes, in menu order.
    pub const ALL: [PaletteId; 4] = [
        PaletteId::DragonBall,
        PaletteId::AttackTitan,
        PaletteId::DemonSlayer,
        PaletteId::OnePiece,
    ];

    /// Stable identifier used for persistence and the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteId::DragonBall => "dragon-ball",
            PaletteId::AttackTitan => "attack-titan",
            PaletteId::DemonSlayer => "demon-slayer",
            PaletteId::OnePiece => "one-piece",
        }
    }

    #[must_use]
    pub fn palette(self) -> &'static Palette {
        match self {
            PaletteId::DragonBall => &DRAGON_BALL,
            PaletteId::AttackTitan => &ATTACK_TITAN,
            PaletteId::DemonSlayer => &DEMON_SLAYER,
            PaletteId::OnePiece => &ONE_PIECE,
        }
    }
}

impl fmt::Display for PaletteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an identifier outside the built-in catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPalette(pub String);

impl fmt::Display for UnknownPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown palette '{}'", self.0)
    }
}

impl std::error::Error for UnknownPalette {}

impl FromStr for PaletteId {
    type Err = UnknownPalette;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaletteId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownPalette(s.to_string()))
    }
}

/// A named set of eight theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub id: PaletteId,
    pub display_name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub glow: Color,
}

const DRAGON_BALL: Palette = Palette {
    id: PaletteId::DragonBall,
    display_name: "Dragon Ball",
    primary: Color::rgb(0xff6b00),
    secondary: Color::rgb(0xff9500),
    accent: Color::rgb(0xffb800),
    background: Color::rgb(0x0a0604),
    surface: Color::rgb(0x1a1208),
    text: Color::WHITE,
    text_secondary: Color::rgb(0xffcc88),
    glow: Color::rgba(0xff6b0050),
};

const ATTACK_TITAN: Palette = Palette {
    id: PaletteId::AttackTitan,
    display_name: "Attack on Titan",
    primary: Color::rgb(0x8b0000),
    secondary: Color::rgb(0x654321),
    accent: Color::rgb(0xff4444),
    background: Color::rgb(0x0f0505),
    surface: Color::rgb(0x2a1a1a),
    text: Color::WHITE,
    text_secondary: Color::rgb(0xccaaaa),
    glow: Color::rgba(0x8b000050),
};

const DEMON_SLAYER: Palette = Palette {
    id: PaletteId::DemonSlayer,
    display_name: "Demon Slayer",
    primary: Color::rgb(0x4a90e2),
    secondary: Color::rgb(0x2c5aa0),
    accent: Color::rgb(0x87ceeb),
    background: Color::rgb(0x050a0f),
    surface: Color::rgb(0x0f1a2a),
    text: Color::WHITE,
    text_secondary: Color::rgb(0xaaccff),
    glow: Color::rgba(0x4a90e250),
};

const ONE_PIECE: Palette = Palette {
    id: PaletteId::OnePiece,
    display_name: "One Piece",
    primary: Color::rgb(0xdc143c),
    secondary: Color::rgb(0xb22222),
    accent: Color::rgb(0xff6347),
    background: Color::rgb(0x0a0505),
    surface: Color::rgb(0x1a0f0f),
    text: Color::WHITE,
    text_secondary: Color::rgb(0xffaaaa),
    glow: Color::rgba(0xdc143c50),
};
