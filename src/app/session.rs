// SPDX-License-Identifier: MPL-2.0
//! Session context shared by the front end.
//!
//! A session owns one [`ThemeStore`] and one [`QrController`], both backed by
//! the same [`KeyValueStore`], so a single preference file holds the palette,
//! the mode and the QR customization.

use crate::application::port::{DownloadSink, KeyValueStore, QrEncoder};
use crate::application::{ControllerSettings, QrController, ThemeStore};
use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::{DirectorySink, FileStore, QrCodeEncoder};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct Session {
    theme: ThemeStore,
    controller: QrController,
}

impl Session {
    /// Builds a session from explicit collaborators.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        encoder: Arc<dyn QrEncoder>,
        sink: Arc<dyn DownloadSink>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            theme: ThemeStore::new(Arc::clone(&store)),
            controller: QrController::new(encoder, store, sink, settings),
        }
    }

    /// Opens a session with the default adapters: a [`FileStore`] in
    /// `data_dir` (or the default data directory), the `qrcode` encoder and a
    /// [`DirectorySink`] writing into the configured output directory.
    ///
    /// Returns the session and an optional warning when the stored
    /// preferences could not be read.
    ///
    /// # Errors
    ///
    /// Returns an error when no data directory can be resolved.
    pub fn open(config: &Config, data_dir: Option<PathBuf>) -> Result<(Self, Option<String>)> {
        let (store, warning) = FileStore::open_in(data_dir)?;
        tracing::debug!(path = %store.path().display(), "opened preference store");
        let session = Self::new(
            Arc::new(store),
            Arc::new(QrCodeEncoder::new()),
            Arc::new(DirectorySink::new(config.output_dir())),
            ControllerSettings::from(config),
        );
        Ok((session, warning))
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeStore {
        &mut self.theme
    }

    #[must_use]
    pub fn controller(&self) -> &QrController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut QrController {
        &mut self.controller
    }

    /// Resets the QR colors to the current theme's primary and background.
    pub fn reset_colors_to_theme(&mut self) {
        let palette = self.theme.effective_palette();
        self.controller.reset_colors_to_theme(&palette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::storage::keys;
    use crate::domain::theme::{light, Mode, PaletteId};
    use crate::infrastructure::MemoryStore;
    use tempfile::tempdir;

    #[tokio::test(start_paused = true)]
    async fn theme_colors_follow_selected_palette() {
        let dir = tempdir().expect("failed to create temp dir");
        let store = Arc::new(MemoryStore::default());
        let mut session = Session::new(
            store.clone(),
            Arc::new(QrCodeEncoder::new()),
            Arc::new(DirectorySink::new(dir.path())),
            ControllerSettings::default(),
        );

        session.theme_mut().select_palette_id(PaletteId::OnePiece);
        session.theme_mut().select_mode(Mode::Light);
        session.reset_colors_to_theme();

        let custom = session.controller().customization();
        assert_eq!(custom.foreground_color, PaletteId::OnePiece.palette().primary);
        assert_eq!(custom.background_color, light::BACKGROUND);
        assert!(store.get(keys::CUSTOMIZATION).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn open_restores_preferences_from_data_dir() {
        let dir = tempdir().expect("failed to create temp dir");
        let config = Config::default();

        {
            let (mut session, warning) =
                Session::open(&config, Some(dir.path().to_path_buf())).unwrap();
            assert!(warning.is_none());
            session.theme_mut().select_palette("attack-titan").unwrap();
        }

        let (session, _) = Session::open(&config, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(session.theme().palette_id(), PaletteId::AttackTitan);
        assert_eq!(session.theme().mode(), Mode::Dark);
    }
}
