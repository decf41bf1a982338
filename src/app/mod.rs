// SPDX-License-Identifier: MPL-2.0
//! Application wiring.
//!
//! [`session::Session`] assembles the theme store and the QR controller over
//! one shared preference store; [`paths`] resolves where preferences and
//! configuration live.

pub mod paths;
pub mod session;

pub use session::Session;
