// SPDX-License-Identifier: MPL-2.0
//! `qrx` is a themed QR code generator.
//!
//! It keeps a palette and display-mode preference, turns typed content into
//! QR codes with a debounced regeneration loop, and exports them as PNG or
//! SVG files. Preferences persist across sessions.
//!
//! # Layers
//!
//! - [`domain`]: colors, palettes, QR input and customization
//! - [`application`]: ports, the theme store and the QR controller
//! - [`infrastructure`]: `qrcode` encoder, preference stores, download sink
//! - [`app`]: session wiring and path resolution
//! - [`config`]: `settings.toml` loading and defaults

#![doc(html_root_url = "https://docs.rs/qrx/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
