// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **QR Size**: Rendered image width in pixels
//! - **QR Margin**: Quiet zone width in modules
//! - **Regeneration**: Debounce and minimum display timings
//! - **Export**: Raster export resolution floor

// ==========================================================================
// QR Size Defaults
// ==========================================================================

/// Default rendered QR image width in pixels.
pub const DEFAULT_QR_SIZE: u32 = 400;

/// Minimum allowed QR image width.
pub const MIN_QR_SIZE: u32 = 200;

/// Maximum allowed QR image width.
pub const MAX_QR_SIZE: u32 = 800;

/// Slider granularity for the QR image width.
pub const QR_SIZE_STEP: u32 = 50;

// ==========================================================================
// QR Margin Defaults
// ==========================================================================

/// Default quiet zone width in modules.
pub const DEFAULT_QR_MARGIN: u32 = 2;

/// Minimum quiet zone width.
pub const MIN_QR_MARGIN: u32 = 0;

/// Maximum quiet zone width.
pub const MAX_QR_MARGIN: u32 = 10;

// ==========================================================================
// Regeneration Defaults
// ==========================================================================

/// Quiet period after the last change before the code is regenerated (ms).
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Upper bound accepted for a configured debounce period (ms).
pub const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Minimum time the "generating" state stays visible after encoding (ms).
pub const DEFAULT_MIN_DISPLAY_MS: u64 = 500;

/// Upper bound accepted for a configured minimum display delay (ms).
pub const MAX_MIN_DISPLAY_MS: u64 = 5_000;

// ==========================================================================
// Export Defaults
// ==========================================================================

/// Smallest side length of an exported PNG, whatever the preview size.
pub const DEFAULT_MIN_RASTER_EXPORT_SIZE: u32 = 800;

/// Largest accepted value for the raster export floor.
pub const MAX_RASTER_EXPORT_SIZE: u32 = 4096;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Size validation
    assert!(MIN_QR_SIZE > 0);
    assert!(MAX_QR_SIZE > MIN_QR_SIZE);
    assert!(DEFAULT_QR_SIZE >= MIN_QR_SIZE);
    assert!(DEFAULT_QR_SIZE <= MAX_QR_SIZE);
    assert!((MAX_QR_SIZE - MIN_QR_SIZE) % QR_SIZE_STEP == 0);
    assert!((DEFAULT_QR_SIZE - MIN_QR_SIZE) % QR_SIZE_STEP == 0);

    // Margin validation
    assert!(MAX_QR_MARGIN > MIN_QR_MARGIN);
    assert!(DEFAULT_QR_MARGIN >= MIN_QR_MARGIN);
    assert!(DEFAULT_QR_MARGIN <= MAX_QR_MARGIN);

    // Timing validation
    assert!(DEFAULT_DEBOUNCE_MS <= MAX_DEBOUNCE_MS);
    assert!(DEFAULT_MIN_DISPLAY_MS <= MAX_MIN_DISPLAY_MS);

    // Export validation
    assert!(DEFAULT_MIN_RASTER_EXPORT_SIZE >= MAX_QR_SIZE);
    assert!(MAX_RASTER_EXPORT_SIZE >= DEFAULT_MIN_RASTER_EXPORT_SIZE);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_defaults_are_valid() {
        assert_eq!(DEFAULT_QR_SIZE, 400);
        assert!(DEFAULT_QR_SIZE >= MIN_QR_SIZE);
        assert!(DEFAULT_QR_SIZE <= MAX_QR_SIZE);
    }

    #[test]
    fn margin_defaults_are_valid() {
        assert_eq!(DEFAULT_QR_MARGIN, 2);
        assert!(DEFAULT_QR_MARGIN <= MAX_QR_MARGIN);
    }

    #[test]
    fn timing_defaults_match_generator_behavior() {
        assert_eq!(DEFAULT_DEBOUNCE_MS, 300);
        assert_eq!(DEFAULT_MIN_DISPLAY_MS, 500);
    }

    #[test]
    fn export_floor_covers_largest_preview() {
        assert_eq!(DEFAULT_MIN_RASTER_EXPORT_SIZE, 800);
        assert!(DEFAULT_MIN_RASTER_EXPORT_SIZE >= MAX_QR_SIZE);
    }
}
