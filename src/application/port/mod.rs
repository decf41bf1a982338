// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces for the collaborators the
//! generator talks to. Adapters live in [`crate::infrastructure`]; tests
//! substitute their own.
//!
//! # Available Ports
//!
//! - [`encoder`]: QR encoding to PNG data URIs and SVG markup
//! - [`storage`]: Key-value persistence of session preferences
//! - [`download`]: Delivery of exported files
//!
//! # Design Notes
//!
//! - All traits use domain types only
//! - Traits are `Send + Sync` so they can be shared behind `Arc` with
//!   spawned Tokio tasks
//! - Methods are synchronous: the controller decides where to suspend

pub mod download;
pub mod encoder;
pub mod storage;

pub use download::DownloadSink;
pub use encoder::{EncodeError, EncodeOptions, QrEncoder};
pub use storage::KeyValueStore;
