//! Session state and the generate / upload / restore workflows.
//!
//! Long-running steps are split into a `begin_*` call that mutates state
//! synchronously and hands back a job or ticket, the async work itself, and a
//! `finish_*`/`complete_*` call that applies the result. Decode tickets carry
//! the image epoch they were issued under; any action that replaces or drops
//! the source image bumps the epoch, so late completions are discarded.

use std::path::Path;

use crate::config::WatermarkConfig;
use crate::error::{Result, StudioError};
use crate::history::HistoryStore;
use crate::imaging;
use crate::lucky;
use crate::models::{HistoryItem, ImagePayload, Mode, PromptOptions, UploadedImage};
use crate::prompt::build_prompt;
use crate::service::PortraitService;
use crate::settings::{self, DisplaySettings};
use crate::viewer::{self, Dimensions, MobileView, Panel, ViewerInput};
use crate::watermark::Watermarker;

const DECODE_FALLBACK_MESSAGE: &str = "Failed to process image.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeSource {
    Upload,
    Restore,
}

/// Pending decode-and-measure of a source image.
#[derive(Debug, Clone)]
pub struct DecodeTicket {
    epoch: u64,
    source: DecodeSource,
    payload: ImagePayload,
}

impl DecodeTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    /// Decodes the image on the blocking pool.
    pub async fn resolve(self) -> DecodeOutcome {
        let DecodeTicket {
            epoch,
            source,
            payload,
        } = self;
        let display_url = imaging::payload_data_url(&payload);
        let result = imaging::measure_async(payload.clone())
            .await
            .map(|(width, height)| UploadedImage {
                base64: payload.base64,
                mime_type: payload.mime_type,
                display_url,
                width,
                height,
            });
        DecodeOutcome {
            epoch,
            source,
            result,
        }
    }
}

#[derive(Debug)]
pub struct DecodeOutcome {
    epoch: u64,
    source: DecodeSource,
    result: Result<UploadedImage>,
}

/// Watermarked result, base64 PNG.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub base64: String,
    pub dims: Option<Dimensions>,
}

/// Everything needed to perform one generation, captured when it started.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    mode: Mode,
    options: PromptOptions,
    prompt: String,
    source: Option<ImagePayload>,
    watermarker: Watermarker,
}

impl GenerationJob {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub async fn run(self, service: &dyn PortraitService) -> GenerationOutcome {
        let result = self.render(service).await;
        GenerationOutcome { job: self, result }
    }

    async fn render(&self, service: &dyn PortraitService) -> Result<RenderedImage> {
        log::info!(
            "🎨 Requesting {} portrait from {}",
            self.mode,
            service.name()
        );
        let raw = match (self.mode, &self.source) {
            (Mode::ImageToImage, Some(source)) => {
                service
                    .edit(&source.base64, &source.mime_type, &self.prompt)
                    .await?
            }
            (Mode::ImageToImage, None) => return Err(StudioError::MissingSourceImage),
            (Mode::TextToImage, _) => service.generate(&self.prompt).await?,
        };

        let watermarker = self.watermarker.clone();
        tokio::task::spawn_blocking(move || {
            let base64 = watermarker.apply(&raw)?;
            let dims = imaging::measure(&ImagePayload::new(base64.as_str(), "image/png"))
                .ok()
                .map(|(w, h)| Dimensions::new(w, h));
            Ok::<_, StudioError>(RenderedImage { base64, dims })
        })
        .await?
    }
}

#[derive(Debug)]
pub struct GenerationOutcome {
    job: GenerationJob,
    result: Result<RenderedImage>,
}

impl GenerationOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct Studio {
    mode: Mode,
    options: PromptOptions,
    uploaded: Option<UploadedImage>,
    generated: Option<String>,
    generated_dims: Option<Dimensions>,
    is_loading: bool,
    error: Option<String>,
    history: HistoryStore,
    settings: DisplaySettings,
    mobile_view: MobileView,
    watermarker: Watermarker,
    image_epoch: u64,
}

impl Studio {
    pub fn new(watermark: WatermarkConfig) -> Self {
        Self {
            mode: Mode::TextToImage,
            options: PromptOptions::new(),
            uploaded: None,
            generated: None,
            generated_dims: None,
            is_loading: false,
            error: None,
            history: HistoryStore::new(),
            settings: DisplaySettings::desktop(),
            mobile_view: MobileView::default(),
            watermarker: Watermarker::new(watermark),
            image_epoch: 0,
        }
    }

    /// Initial state for a viewport of the given width.
    pub fn for_viewport(width: u32, watermark: WatermarkConfig) -> Self {
        Self {
            mode: settings::initial_mode(width),
            settings: DisplaySettings::for_viewport(width),
            ..Self::new(watermark)
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> &PromptOptions {
        &self.options
    }

    pub fn uploaded(&self) -> Option<&UploadedImage> {
        self.uploaded.as_ref()
    }

    /// `data:image/png;base64,...` of the current result.
    pub fn generated_image(&self) -> Option<&str> {
        self.generated.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut DisplaySettings {
        &mut self.settings
    }

    pub fn mobile_view(&self) -> MobileView {
        self.mobile_view
    }

    pub fn toggle_mobile_view(&mut self) {
        self.mobile_view = self.mobile_view.toggled();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("Switching mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.options.clear();
        self.uploaded = None;
        self.clear_generated();
        self.error = None;
        self.image_epoch += 1;
    }

    pub fn set_option(&mut self, category_id: impl Into<String>, value: impl Into<String>) {
        self.options.set(category_id, value);
    }

    pub fn set_supplementary(&mut self, text: impl Into<String>) {
        self.options.supplementary = text.into();
    }

    pub fn set_options(&mut self, options: PromptOptions) {
        self.options = options;
    }

    pub fn clear_options(&mut self) {
        self.options.clear();
    }

    /// Replaces every selection with a random one, keeping the free text.
    pub fn lucky_choice(&mut self) {
        self.options = lucky::lucky_choice(&mut rand::thread_rng(), &self.options);
    }

    /// Starts replacing the source image. Any earlier pending decode is
    /// invalidated.
    pub fn begin_upload(&mut self, payload: ImagePayload) -> DecodeTicket {
        self.clear_generated();
        self.error = None;
        self.issue_ticket(DecodeSource::Upload, payload)
    }

    /// Applies a finished decode. Returns false when the ticket was stale and
    /// the outcome was dropped.
    pub fn complete_decode(&mut self, outcome: DecodeOutcome) -> bool {
        if outcome.epoch != self.image_epoch {
            log::debug!(
                "Dropping stale {:?} decode (epoch {} != {})",
                outcome.source,
                outcome.epoch,
                self.image_epoch
            );
            return false;
        }
        match outcome.result {
            Ok(image) => {
                log::info!("🖼️ Source image ready ({}x{})", image.width, image.height);
                self.uploaded = Some(image);
            }
            Err(e) => {
                log::warn!("Image decode failed: {}", e);
                self.uploaded = None;
                self.error = Some(decode_error_message(&e));
            }
        }
        true
    }

    pub async fn upload_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let payload = match imaging::payload_from_bytes(bytes) {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(decode_error_message(&e));
                return Err(e);
            }
        };
        self.upload_payload(payload).await
    }

    pub async fn upload_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let payload = match imaging::file_to_payload(path).await {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(decode_error_message(&e));
                return Err(e);
            }
        };
        self.upload_payload(payload).await
    }

    async fn upload_payload(&mut self, payload: ImagePayload) -> Result<()> {
        let ticket = self.begin_upload(payload);
        let outcome = ticket.resolve().await;
        self.complete_decode(outcome);
        match &self.error {
            Some(message) => Err(StudioError::ImageError(message.clone())),
            None => Ok(()),
        }
    }

    pub fn clear_image(&mut self) {
        self.uploaded = None;
        self.image_epoch += 1;
    }

    pub fn close_image(&mut self) {
        self.uploaded = None;
        self.clear_generated();
        self.image_epoch += 1;
    }

    pub fn can_generate(&self) -> bool {
        match self.mode {
            Mode::TextToImage => self.options.has_selection(),
            Mode::ImageToImage => self.uploaded.is_some(),
        }
    }

    /// Whether the generate control should be clickable.
    pub fn generate_enabled(&self) -> bool {
        !self.is_loading && self.can_generate()
    }

    pub fn begin_generation(&mut self) -> Result<GenerationJob> {
        if self.is_loading {
            return Err(StudioError::Busy);
        }
        let source = match self.mode {
            Mode::ImageToImage => Some(
                self.uploaded
                    .as_ref()
                    .map(UploadedImage::payload)
                    .ok_or(StudioError::MissingSourceImage)?,
            ),
            Mode::TextToImage => None,
        };

        self.is_loading = true;
        self.error = None;
        if self.mode == Mode::TextToImage {
            self.clear_generated();
        }

        let prompt = build_prompt(self.mode, &self.options);
        log::debug!("Prompt: {}", prompt);
        Ok(GenerationJob {
            mode: self.mode,
            options: self.options.clone(),
            prompt,
            source,
            watermarker: self.watermarker.clone(),
        })
    }

    pub fn finish_generation(&mut self, outcome: GenerationOutcome) {
        let GenerationOutcome { job, result } = outcome;
        match result {
            Ok(rendered) => {
                let image_url = imaging::data_url("image/png", &rendered.base64);
                let id = self
                    .history
                    .next_id(chrono::Utc::now().timestamp_millis());
                self.history.push(HistoryItem {
                    id,
                    image_url: image_url.clone(),
                    options: job.options,
                    mode: job.mode,
                    original_image: job.source,
                });
                self.generated = Some(image_url);
                self.generated_dims = rendered.dims;
                log::info!("✅ Generation {} stored ({} in history)", id, self.history.len());
            }
            Err(e) => {
                log::error!("❌ Generation failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Runs a full generation against `service`. Failures are recorded in
    /// [`Studio::error`] and also returned.
    pub async fn generate(&mut self, service: &dyn PortraitService) -> Result<()> {
        let job = self.begin_generation()?;
        let outcome = job.run(service).await;
        self.finish_generation(outcome);
        match &self.error {
            Some(message) => Err(StudioError::Remote(message.clone())),
            None => Ok(()),
        }
    }

    /// Restores mode, options and result from a history entry. Image-to-image
    /// entries return a ticket that repopulates the source image.
    pub fn begin_restore(&mut self, id: i64) -> Result<Option<DecodeTicket>> {
        let item = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| StudioError::NotFound(format!("history item {}", id)))?;

        self.mode = item.mode;
        self.options = item.options;
        self.generated = Some(item.image_url);
        self.generated_dims = None;
        self.uploaded = None;
        self.error = None;
        self.image_epoch += 1;

        match (item.mode, item.original_image) {
            (Mode::ImageToImage, Some(original)) => {
                Ok(Some(self.issue_ticket(DecodeSource::Restore, original)))
            }
            _ => Ok(None),
        }
    }

    pub async fn restore_history(&mut self, id: i64) -> Result<()> {
        if let Some(ticket) = self.begin_restore(id)? {
            let outcome = ticket.resolve().await;
            self.complete_decode(outcome);
        }
        Ok(())
    }

    pub fn panel(&self) -> Panel {
        if self.mode == Mode::ImageToImage && self.uploaded.is_none() {
            return Panel::Uploader;
        }
        let original_dims = self
            .uploaded
            .as_ref()
            .map(|u| Dimensions::new(u.width, u.height));
        Panel::Viewer(viewer::layout(&ViewerInput {
            mode: self.mode,
            is_loading: self.is_loading,
            generated_url: self.generated.as_deref(),
            original_url: self.uploaded.as_ref().map(|u| u.display_url.as_str()),
            original_dims,
            generated_dims: self.generated_dims,
        }))
    }

    fn issue_ticket(&mut self, source: DecodeSource, payload: ImagePayload) -> DecodeTicket {
        self.image_epoch += 1;
        DecodeTicket {
            epoch: self.image_epoch,
            source,
            payload,
        }
    }

    fn clear_generated(&mut self) {
        self.generated = None;
        self.generated_dims = None;
    }
}

fn decode_error_message(err: &StudioError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        DECODE_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::test_images;
    use crate::models::{CATEGORY_AGE, CATEGORY_GENDER};
    use crate::viewer::ViewerLayout;
    use async_trait::async_trait;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Generate(String),
        Edit { mime_type: String, prompt: String },
    }

    struct MockService {
        reply: std::result::Result<String, String>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockService {
        fn ok(base64: String) -> Self {
            Self {
                reply: Ok(base64),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn reply(&self) -> Result<String> {
            self.reply.clone().map_err(StudioError::Remote)
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PortraitService for MockService {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Generate(prompt.to_string()));
            self.reply()
        }

        async fn edit(&self, _image_base64: &str, mime_type: &str, prompt: &str) -> Result<String> {
            self.calls.lock().unwrap().push(Call::Edit {
                mime_type: mime_type.to_string(),
                prompt: prompt.to_string(),
            });
            self.reply()
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn studio() -> Studio {
        Studio::new(WatermarkConfig::disabled())
    }

    fn png_base64(width: u32, height: u32) -> String {
        BASE64.encode(test_images::png(width, height))
    }

    #[tokio::test]
    async fn network_error_leaves_history_untouched() {
        let mut studio = studio();
        studio.set_option(CATEGORY_AGE, "30s");
        let service = MockService::failing("network error");

        let result = studio.generate(&service).await;

        assert!(result.is_err());
        assert_eq!(studio.error(), Some("network error"));
        assert!(!studio.is_loading());
        assert!(studio.history().is_empty());
        assert!(studio.generated_image().is_none());
    }

    #[tokio::test]
    async fn text_generation_records_history() {
        let mut studio = studio();
        studio.set_option(CATEGORY_GENDER, "female");
        let service = MockService::ok(png_base64(6, 8));

        studio.generate(&service).await.unwrap();

        let url = studio.generated_image().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(studio.history().len(), 1);
        let item = studio.history().latest().unwrap();
        assert_eq!(item.image_url, url);
        assert_eq!(item.mode, Mode::TextToImage);
        assert_eq!(item.options.get(CATEGORY_GENDER), Some("female"));
        assert!(item.original_image.is_none());
        assert!(matches!(service.calls()[0], Call::Generate(_)));
        assert_eq!(
            studio.panel(),
            Panel::Viewer(ViewerLayout::Generated {
                image_url: url.to_string(),
                aspect_ratio: "6 / 8".into()
            })
        );
    }

    #[tokio::test]
    async fn newest_history_entry_comes_first() {
        let mut studio = studio();
        studio.set_option(CATEGORY_AGE, "30s");
        let service = MockService::ok(png_base64(2, 2));
        studio.generate(&service).await.unwrap();
        studio.set_option(CATEGORY_AGE, "child");
        studio.generate(&service).await.unwrap();

        let ids: Vec<i64> = studio.history().iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids[0] > ids[1]);
        assert_eq!(
            studio.history().latest().unwrap().options.get(CATEGORY_AGE),
            Some("child")
        );
    }

    #[test]
    fn text_mode_clears_previous_result_when_starting() {
        let mut studio = studio();
        studio.generated = Some("data:image/png;base64,AA".into());
        studio.set_option(CATEGORY_AGE, "30s");

        let job = studio.begin_generation().unwrap();

        assert!(studio.is_loading());
        assert!(studio.generated_image().is_none());
        assert!(job.prompt().contains("masterpiece portrait of 30s."));
        assert!(matches!(studio.begin_generation(), Err(StudioError::Busy)));
    }

    #[test]
    fn image_mode_requires_a_source() {
        let mut studio = studio();
        studio.set_mode(Mode::ImageToImage);
        assert!(!studio.can_generate());
        assert!(matches!(
            studio.begin_generation(),
            Err(StudioError::MissingSourceImage)
        ));
        assert!(!studio.is_loading());
    }

    #[tokio::test]
    async fn image_mode_edits_and_keeps_source() {
        let mut studio = studio();
        studio.set_mode(Mode::ImageToImage);
        studio.upload_bytes(&test_images::png(30, 40)).await.unwrap();
        assert_eq!(
            studio.panel(),
            Panel::Viewer(ViewerLayout::Original {
                image_url: studio.uploaded().unwrap().display_url.clone(),
                aspect_ratio: "30 / 40".into(),
            })
        );

        let service = MockService::ok(png_base64(30, 40));
        let job = studio.begin_generation().unwrap();
        assert!(studio.uploaded().is_some());
        let outcome = job.run(&service).await;
        assert!(outcome.is_ok());
        studio.finish_generation(outcome);

        match &service.calls()[0] {
            Call::Edit { mime_type, prompt } => {
                assert_eq!(mime_type, "image/png");
                assert!(prompt.contains("Preserve the person's identity"));
            }
            other => panic!("unexpected call {:?}", other),
        }
        let item = studio.history().latest().unwrap();
        assert_eq!(item.mode, Mode::ImageToImage);
        assert_eq!(item.original_image.as_ref().unwrap().mime_type, "image/png");
        assert!(matches!(studio.panel(), Panel::Viewer(ViewerLayout::TwoUp { .. })));
    }

    #[tokio::test]
    async fn mode_switch_resets_everything() {
        let mut studio = studio();
        studio.set_mode(Mode::ImageToImage);
        studio.upload_bytes(&test_images::png(4, 4)).await.unwrap();
        studio.set_option(CATEGORY_AGE, "30s");
        studio.error = Some("old".into());
        studio.generated = Some("data:image/png;base64,AA".into());

        studio.set_mode(Mode::TextToImage);

        assert_eq!(studio.mode(), Mode::TextToImage);
        assert!(!studio.options().has_selection());
        assert!(studio.uploaded().is_none());
        assert!(studio.generated_image().is_none());
        assert!(studio.error().is_none());
        assert_eq!(studio.panel(), Panel::Viewer(ViewerLayout::Placeholder));
    }

    #[tokio::test]
    async fn stale_decode_is_dropped() {
        let mut studio = studio();
        studio.set_mode(Mode::ImageToImage);
        let first = studio.begin_upload(imaging::payload_from_bytes(&test_images::png(10, 10)).unwrap());
        let second = studio.begin_upload(imaging::payload_from_bytes(&test_images::png(20, 10)).unwrap());

        let second_outcome = second.resolve().await;
        let first_outcome = first.resolve().await;
        assert!(studio.complete_decode(second_outcome));
        assert!(!studio.complete_decode(first_outcome));
        assert_eq!(studio.uploaded().unwrap().width, 20);

        let pending = studio.begin_upload(imaging::payload_from_bytes(&test_images::png(5, 5)).unwrap());
        studio.set_mode(Mode::TextToImage);
        assert!(!studio.complete_decode(pending.resolve().await));
        assert!(studio.uploaded().is_none());
    }

    #[tokio::test]
    async fn undecodable_upload_reports_error() {
        let mut studio = studio();
        studio.set_mode(Mode::ImageToImage);
        let ticket = studio.begin_upload(ImagePayload::new("bm90IGFuIGltYWdl", "image/png"));
        assert!(studio.complete_decode(ticket.resolve().await));
        assert!(studio.uploaded().is_none());
        assert!(studio.error().is_some());
        assert_eq!(studio.panel(), Panel::Uploader);
    }

    #[tokio::test]
    async fn restore_recovers_source_dimensions() {
        let mut studio = studio();
        studio.set_mode(Mode::ImageToImage);
        studio.upload_bytes(&test_images::png(12, 16)).await.unwrap();
        studio.set_option(CATEGORY_AGE, "30s");
        let service = MockService::ok(png_base64(12, 16));
        studio.generate(&service).await.unwrap();
        let id = studio.history().latest().unwrap().id;

        studio.set_mode(Mode::TextToImage);
        let ticket = studio.begin_restore(id).unwrap().expect("image entry yields a ticket");
        assert_eq!(studio.mode(), Mode::ImageToImage);
        assert_eq!(studio.options().get(CATEGORY_AGE), Some("30s"));
        assert!(studio.generated_image().is_some());
        assert!(studio.uploaded().is_none());

        assert!(studio.complete_decode(ticket.resolve().await));
        let uploaded = studio.uploaded().unwrap();
        assert_eq!((uploaded.width, uploaded.height), (12, 16));
    }

    #[tokio::test]
    async fn restore_text_entry_clears_upload() {
        let mut studio = studio();
        studio.set_option(CATEGORY_AGE, "30s");
        studio.generate(&MockService::ok(png_base64(2, 2))).await.unwrap();
        let id = studio.history().latest().unwrap().id;

        studio.set_mode(Mode::ImageToImage);
        studio.upload_bytes(&test_images::png(3, 3)).await.unwrap();
        studio.restore_history(id).await.unwrap();

        assert_eq!(studio.mode(), Mode::TextToImage);
        assert!(studio.uploaded().is_none());
        assert!(studio.generated_image().is_some());
    }

    #[test]
    fn restore_unknown_id_fails() {
        let mut studio = studio();
        assert!(matches!(
            studio.begin_restore(42),
            Err(StudioError::NotFound(_))
        ));
    }

    #[test]
    fn lucky_choice_keeps_supplementary_text() {
        let mut studio = studio();
        studio.set_supplementary("wearing a red scarf");
        studio.lucky_choice();
        assert!(studio.options().has_selection());
        assert_eq!(studio.options().supplementary, "wearing a red scarf");
        assert!(studio.generate_enabled());
    }

    #[tokio::test]
    async fn image_mode_without_source_offers_uploader() {
        let mut studio = studio();
        studio.set_mode(Mode::ImageToImage);
        studio.upload_bytes(&test_images::png(8, 8)).await.unwrap();
        studio.generate(&MockService::ok(png_base64(8, 8))).await.unwrap();
        let id = studio.history().latest().unwrap().id;

        studio.clear_image();
        assert!(studio.generated_image().is_some());
        assert_eq!(studio.panel(), Panel::Uploader);

        let ticket = studio.begin_restore(id).unwrap().unwrap();
        assert!(!studio.can_generate());
        assert_eq!(studio.panel(), Panel::Uploader);
        studio.complete_decode(ticket.resolve().await);
        assert!(matches!(studio.panel(), Panel::Viewer(ViewerLayout::TwoUp { .. })));
    }

    #[tokio::test]
    async fn failed_restore_decode_offers_uploader() {
        let mut studio = studio();
        studio.history.push(HistoryItem {
            id: 1,
            image_url: "data:image/png;base64,AA".into(),
            options: PromptOptions::new(),
            mode: Mode::ImageToImage,
            original_image: Some(ImagePayload::new("bm90IGFuIGltYWdl", "image/png")),
        });

        let ticket = studio.begin_restore(1).unwrap().unwrap();
        assert!(studio.complete_decode(ticket.resolve().await));
        assert!(studio.error().is_some());
        assert_eq!(studio.panel(), Panel::Uploader);
    }

    #[test]
    fn blank_supplementary_does_not_enable_generate() {
        let mut studio = studio();
        studio.set_supplementary("   ");
        assert!(!studio.can_generate());
        assert!(!studio.generate_enabled());
    }

    #[tokio::test]
    async fn generated_image_is_watermarked() {
        let mut studio = Studio::new(WatermarkConfig::default());
        studio.set_option(CATEGORY_AGE, "30s");
        let raw = test_images::png(120, 90);
        let service = MockService::ok(BASE64.encode(&raw));

        studio.generate(&service).await.unwrap();

        let original = image::load_from_memory(&raw).unwrap().to_rgba8();
        let decode = |url: &str| {
            let payload = imaging::parse_data_url(url).unwrap();
            image::load_from_memory(&BASE64.decode(payload.base64).unwrap())
                .unwrap()
                .to_rgba8()
        };
        let shown = decode(studio.generated_image().unwrap());
        let stored = decode(&studio.history().latest().unwrap().image_url);

        assert_eq!(shown.dimensions(), (120, 90));
        assert_eq!(stored.dimensions(), (120, 90));
        assert_ne!(shown, original);
        assert_eq!(shown, stored);
        // top-left stays untouched, the bottom-right corner carries the badge
        assert_eq!(shown.get_pixel(0, 0), original.get_pixel(0, 0));
        assert!(shown
            .enumerate_pixels()
            .filter(|(x, y, _)| *x >= 60 && *y >= 45)
            .any(|(x, y, p)| p != original.get_pixel(x, y)));
    }

    #[test]
    fn viewport_picks_initial_mode() {
        let phone = Studio::for_viewport(390, WatermarkConfig::disabled());
        assert_eq!(phone.mode(), Mode::ImageToImage);
        assert_eq!(phone.panel(), Panel::Uploader);
        assert!(!phone.settings().history_visible);
    }
}
