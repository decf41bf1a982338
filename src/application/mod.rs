// SPDX-License-Identifier: MPL-2.0
//! Application layer: use cases and orchestration.
//!
//! - [`port`]: trait definitions the infrastructure implements
//! - [`theme_store`]: palette and mode selection
//! - [`controller`]: QR input, customization, regeneration and export
//! - [`debounce`]: cancellable delayed jobs used by the controller
//! - [`export`]: conversion of encoded images into downloadable files
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The command line front end drives application layer services

pub mod controller;
pub mod debounce;
pub mod export;
pub mod port;
pub mod theme_store;

pub use controller::{ControllerSettings, GeneratorSnapshot, QrController};
pub use export::ExportError;
pub use theme_store::ThemeStore;
