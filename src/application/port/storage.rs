// SPDX-License-Identifier: MPL-2.0
//! Key-value persistence port definition.
//!
//! Session preferences are stored as text values under fixed keys. Reads are
//! best-effort (a missing or unreadable value is `None`); writes report
//! failures so callers can log them, but callers never abort a state change
//! because a write failed.

use crate::error::Result;

/// Storage keys for the persisted session preferences.
pub mod keys {
    /// Selected palette identity (`dragon-ball`, ...).
    pub const PALETTE: &str = "qrx-anime-theme";
    /// Selected display mode (`dark` or `light`).
    pub const MODE: &str = "qrx-web-theme";
    /// QR customization record, as JSON.
    pub const CUSTOMIZATION: &str = "qrx-qr-customization";
}

/// Port for a string key-value store.
///
/// Implementations use interior mutability so a single store can be shared
/// between the theme store and the QR controller.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be made durable.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
