// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`qr_encoder`]: QR encoding via the `qrcode` crate (implements [`QrEncoder`])
//! - [`storage`]: in-memory and CBOR file stores (implement [`KeyValueStore`])
//! - [`download`]: writes exports into a directory (implements [`DownloadSink`])
//!
//! [`QrEncoder`]: crate::application::port::QrEncoder
//! [`KeyValueStore`]: crate::application::port::KeyValueStore
//! [`DownloadSink`]: crate::application::port::DownloadSink

pub mod download;
pub mod qr_encoder;
pub mod storage;

pub use download::DirectorySink;
pub use qr_encoder::QrCodeEncoder;
pub use storage::{FileStore, MemoryStore};
