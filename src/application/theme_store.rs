// SPDX-License-Identifier: MPL-2.0
//! Theme preference state.
//!
//! [`ThemeStore`] owns the selected palette and display mode, persists each
//! change through the [`KeyValueStore`] port and publishes the recomputed
//! [`EffectivePalette`] to subscribers.

use crate::application::port::storage::keys;
use crate::application::port::KeyValueStore;
use crate::domain::theme::{EffectivePalette, Mode, Palette, PaletteId};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
    palette: PaletteId,
    mode: Mode,
    notifier: watch::Sender<EffectivePalette>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("palette", &self.palette)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    /// Creates the store, restoring the persisted palette and mode.
    ///
    /// Unknown or malformed stored values are ignored in favor of the
    /// defaults (Dragon Ball, dark).
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let palette = store
            .get(keys::PALETTE)
            .and_then(|raw| match raw.parse::<PaletteId>() {
                Ok(id) => Some(id),
                Err(error) => {
                    tracing::debug!(%error, "ignoring stored palette");
                    None
                }
            })
            .unwrap_or_default();
        let mode = store
            .get(keys::MODE)
            .and_then(|raw| raw.parse::<Mode>().ok())
            .unwrap_or_default();

        let (notifier, _) = watch::channel(EffectivePalette::derive(palette.palette(), mode));
        Self {
            store,
            palette,
            mode,
            notifier,
        }
    }

    #[must_use]
    pub fn palette_id(&self) -> PaletteId {
        self.palette
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The built-in palettes, in menu order.
    pub fn palettes(&self) -> impl Iterator<Item = &'static Palette> {
        PaletteId::ALL.into_iter().map(PaletteId::palette)
    }

    /// Derives the palette to render from the current selection.
    #[must_use]
    pub fn effective_palette(&self) -> EffectivePalette {
        EffectivePalette::derive(self.palette.palette(), self.mode)
    }

    /// Receives the effective palette after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EffectivePalette> {
        self.notifier.subscribe()
    }

    /// Selects a palette by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an identifier outside the catalog; the
    /// current selection is kept.
    pub fn select_palette(&mut self, id: &str) -> Result<()> {
        let id = id
            .parse::<PaletteId>()
            .map_err(|error| Error::Config(error.to_string()))?;
        self.select_palette_id(id);
        Ok(())
    }

    pub fn select_palette_id(&mut self, id: PaletteId) {
        self.palette = id;
        self.persist(keys::PALETTE, id.as_str());
        self.publish();
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.persist(keys::MODE, mode.as_str());
        self.publish();
    }

    pub fn toggle_mode(&mut self) {
        self.select_mode(self.mode.toggled());
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(error) = self.store.set(key, value) {
            tracing::warn!(key, %error, "failed to persist theme preference");
        }
    }

    fn publish(&self) {
        self.notifier.send_replace(self.effective_palette());
    }
}
