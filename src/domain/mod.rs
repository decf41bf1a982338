// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types and derivation rules.
//!
//! This module contains pure value types and the rules that combine them.
//! Nothing in here performs I/O; persistence and encoding go through the
//! ports in [`crate::application::port`].
//!
//! # Modules
//!
//! - [`color`]: Typed RGBA color ([`Color`](color::Color))
//! - [`theme`]: Palettes, display mode and the derived
//!   [`EffectivePalette`](theme::EffectivePalette)
//! - [`qr`]: QR input, customization and encoded image types

pub mod color;
pub mod qr;
pub mod theme;
