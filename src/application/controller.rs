// SPDX-License-Identifier: MPL-2.0
//! QR generation controller.
//!
//! [`QrController`] owns the generator input and customization, debounces
//! regeneration, runs the encoder and exports the result. Observers read a
//! [`GeneratorSnapshot`] through [`QrController::subscribe`].
//!
//! # Regeneration
//!
//! Content and customization changes schedule a regeneration after the quiet
//! period; later changes restart the wait. When it fires:
//! - blank content clears the image without calling the encoder;
//! - otherwise the encoder runs, and the image is published once the
//!   minimum display delay has passed.
//!
//! Every fired regeneration takes a generation number. A result whose
//! generation is older than the latest fired one is dropped, so a slow
//! stale encode never overwrites the image of newer input.
//!
//! All methods that schedule work must be called from within a Tokio runtime.

use crate::application::debounce::Debouncer;
use crate::application::export::{self, ExportError};
use crate::application::port::storage::keys;
use crate::application::port::{DownloadSink, EncodeOptions, KeyValueStore, QrEncoder};
use crate::config::{self, Config};
use crate::domain::qr::{
    CustomizationPatch, EncodedImage, ImageKind, QrCustomization, QrFormat, QrInput,
};
use crate::domain::theme::EffectivePalette;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

// =============================================================================
// Settings
// =============================================================================

/// Timing and output settings of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Quiet period before regenerating.
    pub debounce: Duration,
    /// Minimum time between the encoder returning and the image appearing.
    pub min_display: Duration,
    /// Kind of image produced for the preview.
    pub preview_kind: ImageKind,
    /// Smallest side length of a raster export.
    pub min_raster_size: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(config::DEFAULT_DEBOUNCE_MS),
            min_display: Duration::from_millis(config::DEFAULT_MIN_DISPLAY_MS),
            preview_kind: ImageKind::Raster,
            min_raster_size: config::DEFAULT_MIN_RASTER_EXPORT_SIZE,
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            min_display: config.min_display(),
            preview_kind: config.preview_format(),
            min_raster_size: config.min_raster_size(),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Observable generator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSnapshot {
    pub input: QrInput,
    pub customization: QrCustomization,
    pub encoded_image: Option<EncodedImage>,
    /// True while at least one encode is in flight.
    pub is_generating: bool,
    /// True while a debounced regeneration is waiting to fire.
    pub regeneration_pending: bool,
}

impl GeneratorSnapshot {
    /// No regeneration is waiting and nothing is being encoded.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_generating && !self.regeneration_pending
    }
}

// =============================================================================
// Shared state
// =============================================================================

#[derive(Debug, Default)]
struct State {
    input: QrInput,
    customization: QrCustomization,
    image: Option<EncodedImage>,
    latest_generation: u64,
    in_flight: usize,
    regeneration_pending: bool,
}

impl State {
    fn snapshot(&self) -> GeneratorSnapshot {
        GeneratorSnapshot {
            input: self.input.clone(),
            customization: self.customization,
            encoded_image: self.image.clone(),
            is_generating: self.in_flight > 0,
            regeneration_pending: self.regeneration_pending,
        }
    }
}

struct Shared {
    encoder: Arc<dyn QrEncoder>,
    settings: ControllerSettings,
    state: Mutex<State>,
    notifier: watch::Sender<GeneratorSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.notifier.send_replace(state.snapshot());
    }

    /// Runs when the debounce timer fires.
    fn fire(self: Arc<Self>) {
        let job = {
            let mut state = self.lock();
            state.regeneration_pending = false;
            state.latest_generation += 1;

            let job = if state.input.is_blank() {
                state.image = None;
                None
            } else {
                state.in_flight += 1;
                Some((
                    state.latest_generation,
                    state.input.content().to_string(),
                    EncodeOptions::from(&state.customization),
                ))
            };
            self.publish(&state);
            job
        };

        if let Some((generation, content, options)) = job {
            tokio::spawn(self.encode(generation, content, options));
        }
    }

    async fn encode(self: Arc<Self>, generation: u64, content: String, options: EncodeOptions) {
        let result = self
            .encoder
            .encode(self.settings.preview_kind, &content, &options);

        let image = match result {
            Ok(image) => {
                tokio::time::sleep(self.settings.min_display).await;
                Some(image)
            }
            Err(error) => {
                tracing::error!(%error, "QR code generation failed");
                None
            }
        };

        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if let Some(image) = image {
            if generation == state.latest_generation {
                state.image = Some(image);
            } else {
                tracing::debug!(
                    generation,
                    latest = state.latest_generation,
                    "discarding stale QR code"
                );
            }
        }
        self.publish(&state);
    }
}

// =============================================================================
// QrController
// =============================================================================

pub struct QrController {
    shared: Arc<Shared>,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn DownloadSink>,
    debouncer: Debouncer,
}

impl fmt::Debug for QrController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrController")
            .field("settings", &self.shared.settings)
            .field("state", &*self.shared.lock())
            .finish_non_exhaustive()
    }
}

impl QrController {
    /// Creates a controller, restoring the persisted customization.
    ///
    /// A missing or malformed stored record yields the default customization.
    pub fn new(
        encoder: Arc<dyn QrEncoder>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn DownloadSink>,
        settings: ControllerSettings,
    ) -> Self {
        let customization = store
            .get(keys::CUSTOMIZATION)
            .and_then(|json| {
                let restored = QrCustomization::restore(&json);
                if restored.is_none() {
                    tracing::debug!("ignoring malformed stored QR customization");
                }
                restored
            })
            .unwrap_or_default();

        let state = State {
            customization,
            ..State::default()
        };
        let (notifier, _) = watch::channel(state.snapshot());

        Self {
            shared: Arc::new(Shared {
                encoder,
                settings,
                state: Mutex::new(state),
                notifier,
            }),
            store,
            sink,
            debouncer: Debouncer::new(settings.debounce),
        }
    }

    #[must_use]
    pub fn settings(&self) -> ControllerSettings {
        self.shared.settings
    }

    #[must_use]
    pub fn snapshot(&self) -> GeneratorSnapshot {
        self.shared.lock().snapshot()
    }

    /// Receives a fresh snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GeneratorSnapshot> {
        self.shared.notifier.subscribe()
    }

    #[must_use]
    pub fn input(&self) -> QrInput {
        self.shared.lock().input.clone()
    }

    #[must_use]
    pub fn customization(&self) -> QrCustomization {
        self.shared.lock().customization
    }

    #[must_use]
    pub fn encoded_image(&self) -> Option<EncodedImage> {
        self.shared.lock().image.clone()
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.shared.lock().in_flight > 0
    }

    /// Switches the input format. The current content is discarded.
    pub fn set_format(&mut self, format: QrFormat) {
        let had_content = {
            let mut state = self.shared.lock();
            let had_content = !state.input.content().is_empty();
            state.input.set_format(format);
            self.shared.publish(&state);
            had_content
        };
        if had_content {
            self.schedule_regeneration();
        }
    }

    /// Replaces the content verbatim and schedules a regeneration.
    pub fn set_content(&mut self, content: impl Into<String>) {
        {
            let mut state = self.shared.lock();
            state.input.set_content(content);
            self.shared.publish(&state);
        }
        self.schedule_regeneration();
    }

    /// Merges `patch` into the customization, persists the full record and
    /// schedules a regeneration.
    pub fn update_customization(&mut self, patch: &CustomizationPatch) {
        let merged = {
            let mut state = self.shared.lock();
            state.customization = state.customization.merged(patch);
            self.shared.publish(&state);
            state.customization
        };
        self.persist_customization(&merged);
        self.schedule_regeneration();
    }

    /// Uses the theme's primary color on its background color.
    pub fn reset_colors_to_theme(&mut self, palette: &EffectivePalette) {
        self.update_customization(
            &CustomizationPatch::default()
                .foreground(palette.primary)
                .background(palette.background),
        );
    }

    /// Resolves once no regeneration is waiting and no encode is in flight.
    pub async fn settled(&self) -> GeneratorSnapshot {
        let mut receiver = self.subscribe();
        let snapshot = match receiver.wait_for(GeneratorSnapshot::is_settled).await {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives in `self`, so it cannot be dropped while we wait.
            Err(_) => self.snapshot(),
        };
        snapshot
    }

    /// Exports the current QR code through the download sink.
    ///
    /// Vector exports are re-encoded from the current input; raster exports
    /// are composed from the cached preview at no less than the configured
    /// minimum resolution. Returns where the sink stored the file.
    ///
    /// # Errors
    ///
    /// - [`ExportError::NothingToExport`] when the content is blank or no
    ///   image has been generated; nothing is saved.
    /// - [`ExportError::Encode`], [`ExportError::Render`] or
    ///   [`ExportError::Save`] when producing or saving the file fails.
    pub fn export_image(&self, kind: ImageKind) -> Result<PathBuf, ExportError> {
        let (content, customization, image) = {
            let state = self.shared.lock();
            match (&state.image, state.input.is_blank()) {
                (Some(image), false) => (
                    state.input.content().to_string(),
                    state.customization,
                    image.clone(),
                ),
                _ => return Err(ExportError::NothingToExport),
            }
        };

        let payload = match kind {
            ImageKind::Vector => self
                .shared
                .encoder
                .encode_to_vector_markup(&content, &EncodeOptions::from(&customization))?
                .into_bytes(),
            ImageKind::Raster => {
                let side = export::raster_target_size(
                    customization.size,
                    self.shared.settings.min_raster_size,
                );
                export::compose_raster(&image, customization.background_color, side)?
            }
        };

        let filename = export::export_filename(kind, chrono::Utc::now());
        let location = self
            .sink
            .save(&filename, &payload, kind.mime_type())
            .map_err(ExportError::Save)?;
        tracing::info!(path = %location.display(), "exported QR code");
        Ok(location)
    }

    fn schedule_regeneration(&mut self) {
        {
            let mut state = self.shared.lock();
            state.regeneration_pending = true;
            self.shared.publish(&state);
        }
        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(move || shared.fire());
    }

    fn persist_customization(&self, customization: &QrCustomization) {
        let written = customization
            .to_json()
            .and_then(|json| self.store.set(keys::CUSTOMIZATION, &json));
        if let Err(error) = written {
            tracing::warn!(%error, "failed to persist QR customization");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::EncodeError;
    use crate::domain::color::Color;
    use crate::domain::qr::{ErrorCorrectionLevel, PNG_DATA_URI_PREFIX};
    use crate::domain::theme::{Mode, PaletteId};
    use crate::infrastructure::storage::MemoryStore;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use image_rs::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Records every call and returns a valid 40x40 PNG data URI.
    #[derive(Default)]
    struct RecordingEncoder {
        calls: Mutex<Vec<(String, EncodeOptions)>>,
    }

    impl RecordingEncoder {
        fn contents(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(content, _)| content.clone())
                .collect()
        }
    }

    impl QrEncoder for RecordingEncoder {
        fn encode_to_raster(
            &self,
            content: &str,
            options: &EncodeOptions,
        ) -> Result<String, EncodeError> {
            self.calls
                .lock()
                .unwrap()
                .push((content.to_string(), *options));
            let [r, g, b, a] = options.dark_color.to_rgba8();
            let image = RgbaImage::from_pixel(40, 40, Rgba([r, g, b, a]));
            let mut png = Cursor::new(Vec::new());
            DynamicImage::ImageRgba8(image)
                .write_to(&mut png, ImageFormat::Png)
                .unwrap();
            Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png.into_inner())))
        }

        fn encode_to_vector_markup(
            &self,
            content: &str,
            options: &EncodeOptions,
        ) -> Result<String, EncodeError> {
            self.calls
                .lock()
                .unwrap()
                .push((content.to_string(), *options));
            Ok(format!("<svg><!-- {content} --></svg>"))
        }
    }

    struct FailingEncoder;

    impl QrEncoder for FailingEncoder {
        fn encode_to_raster(&self, _: &str, _: &EncodeOptions) -> Result<String, EncodeError> {
            Err(EncodeError::DataTooLong)
        }

        fn encode_to_vector_markup(
            &self,
            _: &str,
            _: &EncodeOptions,
        ) -> Result<String, EncodeError> {
            Err(EncodeError::DataTooLong)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<(String, Vec<u8>, String)>>,
        fail: bool,
    }

    impl DownloadSink for RecordingSink {
        fn save(
            &self,
            filename: &str,
            payload: &[u8],
            mime_type: &str,
        ) -> crate::error::Result<PathBuf> {
            if self.fail {
                return Err(crate::error::Error::Io("disk full".into()));
            }
            self.saved.lock().unwrap().push((
                filename.to_string(),
                payload.to_vec(),
                mime_type.to_string(),
            ));
            Ok(PathBuf::from(filename))
        }
    }

    struct Harness {
        encoder: Arc<RecordingEncoder>,
        store: Arc<MemoryStore>,
        sink: Arc<RecordingSink>,
        controller: QrController,
    }

    fn harness() -> Harness {
        let encoder = Arc::new(RecordingEncoder::default());
        let store = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let controller = QrController::new(
            encoder.clone(),
            store.clone(),
            sink.clone(),
            ControllerSettings::default(),
        );
        Harness {
            encoder,
            store,
            sink,
            controller,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_encodes_once_with_last_content() {
        let mut h = harness();
        for content in ["h", "ht", "htt", "https://example.com"] {
            h.controller.set_content(content);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let snapshot = h.controller.settled().await;

        assert_eq!(h.encoder.contents(), vec!["https://example.com"]);
        assert!(snapshot.encoded_image.is_some());
        assert!(!snapshot.is_generating);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_happens_before_quiet_period() {
        let mut h = harness();
        h.controller.set_content("hello");

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(h.encoder.contents().is_empty());
        assert!(h.controller.snapshot().regeneration_pending);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(h.encoder.contents(), vec!["hello"]);
        assert!(h.controller.is_generating());
    }

    #[tokio::test(start_paused = true)]
    async fn image_appears_after_minimum_display_delay() {
        let mut h = harness();
        h.controller.set_content("hello");

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert!(h.controller.is_generating());
        assert!(h.controller.encoded_image().is_none());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!h.controller.is_generating());
        assert!(h.controller.encoded_image().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_content_clears_image_without_encoding() {
        let mut h = harness();
        h.controller.set_content("hello");
        h.controller.settled().await;
        assert!(h.controller.encoded_image().is_some());

        h.controller.set_content("   \n\t");
        let snapshot = h.controller.settled().await;

        assert_eq!(h.encoder.contents(), vec!["hello"]);
        assert!(snapshot.encoded_image.is_none());
        assert!(!snapshot.is_generating);
    }

    #[tokio::test(start_paused = true)]
    async fn email_content_is_encoded_verbatim() {
        let mut h = harness();
        h.controller.set_format(QrFormat::Email);
        h.controller.set_content("user@example.com");

        let snapshot = h.controller.settled().await;

        assert_eq!(snapshot.input.format(), QrFormat::Email);
        assert_eq!(h.encoder.contents(), vec!["user@example.com"]);
        assert!(matches!(snapshot.encoded_image, Some(EncodedImage::Raster(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn format_switch_clears_content() {
        let mut h = harness();
        h.controller.set_format(QrFormat::Text);
        assert!(!h.controller.snapshot().regeneration_pending);

        h.controller.set_content("hello");
        h.controller.settled().await;

        h.controller.set_format(QrFormat::Contact);
        assert_eq!(h.controller.input().content(), "");
        let snapshot = h.controller.settled().await;

        assert!(snapshot.encoded_image.is_none());
        assert_eq!(h.encoder.contents(), vec!["hello"]);
    }

    #[tokio::test(start_paused = true)]
    async fn customization_change_is_merged_persisted_and_restored() {
        let mut h = harness();
        h.controller
            .update_customization(&CustomizationPatch::default().size(500));

        let custom = h.controller.customization();
        assert_eq!(custom.size.value(), 500);
        assert_eq!(custom.foreground_color, Color::BLACK);
        assert_eq!(custom.background_color, Color::WHITE);
        assert_eq!(custom.margin.value(), 2);
        assert_eq!(custom.error_correction_level, ErrorCorrectionLevel::H);

        let reloaded = QrController::new(
            h.encoder.clone(),
            h.store.clone(),
            h.sink.clone(),
            ControllerSettings::default(),
        );
        assert_eq!(reloaded.customization(), custom);
    }

    #[tokio::test(start_paused = true)]
    async fn customization_change_regenerates_with_new_options() {
        let mut h = harness();
        h.controller.set_content("hello");
        h.controller.settled().await;

        h.controller.update_customization(
            &CustomizationPatch::default().error_correction(ErrorCorrectionLevel::L),
        );
        h.controller.settled().await;

        let calls = h.encoder.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1.error_correction_level, ErrorCorrectionLevel::L);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_stored_customization_is_ignored() {
        let store = Arc::new(MemoryStore::default());
        store.set(keys::CUSTOMIZATION, "{not json").unwrap();

        let controller = QrController::new(
            Arc::new(RecordingEncoder::default()),
            store,
            Arc::new(RecordingSink::default()),
            ControllerSettings::default(),
        );
        assert_eq!(controller.customization(), QrCustomization::default());
    }

    #[tokio::test(start_paused = true)]
    async fn theme_colors_reset_customization() {
        let mut h = harness();
        let palette = EffectivePalette::derive(PaletteId::OnePiece.palette(), Mode::Light);

        h.controller.reset_colors_to_theme(&palette);

        let custom = h.controller.customization();
        assert_eq!(custom.foreground_color, palette.primary);
        assert_eq!(custom.background_color, palette.background);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_result_is_discarded() {
        let mut h = harness();
        h.controller.set_content("first");
        // First encode fires at 300 ms and publishes at 800 ms.
        tokio::time::sleep(Duration::from_millis(350)).await;
        h.controller.set_content("second");
        // Second encode fires at 650 ms and publishes at 1150 ms.
        tokio::time::sleep(Duration::from_millis(550)).await;

        assert!(h.controller.encoded_image().is_none());
        assert!(h.controller.is_generating());

        let snapshot = h.controller.settled().await;
        assert_eq!(h.encoder.contents(), vec!["first", "second"]);
        assert!(snapshot.encoded_image.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn encoder_failure_clears_generating_flag() {
        let mut controller = QrController::new(
            Arc::new(FailingEncoder),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingSink::default()),
            ControllerSettings::default(),
        );
        controller.set_content("too long, supposedly");

        let snapshot = controller.settled().await;

        assert!(!snapshot.is_generating);
        assert!(snapshot.encoded_image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn export_without_image_saves_nothing() {
        let h = harness();
        assert_eq!(
            h.controller.export_image(ImageKind::Raster),
            Err(ExportError::NothingToExport)
        );
        assert!(h.sink.saved.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn export_with_blank_content_saves_nothing() {
        let mut h = harness();
        h.controller.set_content("hello");
        h.controller.settled().await;
        // Content cleared but the regeneration has not fired yet.
        h.controller.set_content("");

        assert_eq!(
            h.controller.export_image(ImageKind::Vector),
            Err(ExportError::NothingToExport)
        );
        assert!(h.sink.saved.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn raster_export_is_at_least_800_pixels() {
        let mut h = harness();
        h.controller.set_content("hello");
        h.controller.settled().await;

        h.controller.export_image(ImageKind::Raster).unwrap();

        let saved = h.sink.saved.lock().unwrap();
        let (filename, payload, mime) = &saved[0];
        assert!(filename.starts_with("qrcode-") && filename.ends_with(".png"));
        assert_eq!(mime, "image/png");
        let image = image_rs::load_from_memory_with_format(payload, ImageFormat::Png).unwrap();
        assert_eq!((image.width(), image.height()), (800, 800));
    }

    #[tokio::test(start_paused = true)]
    async fn vector_export_reencodes_current_content() {
        let mut h = harness();
        h.controller.set_content("hello");
        h.controller.settled().await;

        h.controller.export_image(ImageKind::Vector).unwrap();

        let saved = h.sink.saved.lock().unwrap();
        let (filename, payload, mime) = &saved[0];
        assert!(filename.ends_with(".svg"));
        assert_eq!(mime, "image/svg+xml");
        assert_eq!(payload.as_slice(), b"<svg><!-- hello --></svg>");
    }

    #[tokio::test(start_paused = true)]
    async fn sink_failure_is_reported() {
        let encoder = Arc::new(RecordingEncoder::default());
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..RecordingSink::default()
        });
        let mut controller = QrController::new(
            encoder,
            Arc::new(MemoryStore::default()),
            sink,
            ControllerSettings::default(),
        );
        controller.set_content("hello");
        controller.settled().await;

        let err = controller.export_image(ImageKind::Raster).unwrap_err();
        assert!(matches!(err, ExportError::Save(_)));
        assert_eq!(err.user_message(), "Error downloading QR code. Please try again.");
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_generation() {
        let mut h = harness();
        let mut receiver = h.controller.subscribe();

        h.controller.set_content("hello");
        assert!(receiver.borrow_and_update().regeneration_pending);

        let done = receiver
            .wait_for(|s| s.encoded_image.is_some())
            .await
            .unwrap()
            .clone();
        assert!(!done.is_generating);
    }
}
