use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::debounce::{DebounceState, Debouncer};
use crate::events::{EventQueue, OutputTarget, PreviewImage, UiEvent};
use crate::languages::LanguageRegistry;
use crate::pipeline::{Dispatcher, SequenceGate};
use crate::translate::TranslateRequest;

/// Source and target display names as selected in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    fn defaults(registry: &LanguageRegistry) -> Self {
        Self {
            source: registry.default_source().name.clone(),
            target: registry.default_target().name.clone(),
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
    }
}

#[derive(Debug)]
pub struct TextTab {
    pub input: String,
    pub output: String,
    pub languages: LanguagePair,
    pub last_translated_at: Option<DateTime<Local>>,
    /// True only while `output` holds a successful translation.
    output_is_translation: bool,
    gate: SequenceGate,
}

#[derive(Debug)]
pub struct ImageTab {
    pub image_text: String,
    pub languages: LanguagePair,
    pub image_label: String,
    pub preview: Option<PreviewImage>,
    /// Bumped whenever `preview` is replaced.
    pub preview_generation: u64,
    pending_ocr: Option<u64>,
    gate: SequenceGate,
}

impl ImageTab {
    pub fn is_extracting(&self) -> bool {
        self.pending_ocr.is_some()
    }
}

/// UI-thread state for both tabs. Background work only reaches it through
/// the event queue drained by [`Session::pump`].
pub struct Session {
    registry: LanguageRegistry,
    dispatcher: Dispatcher,
    debouncer: Debouncer,
    events: EventQueue,
    pub text: TextTab,
    pub image: ImageTab,
}

impl Session {
    pub fn new(
        registry: LanguageRegistry,
        dispatcher: Dispatcher,
        debouncer: Debouncer,
        events: EventQueue,
    ) -> Self {
        let sink = dispatcher.events().clone();
        debouncer.on_fire(move || sink.post(UiEvent::DebounceElapsed));
        info!(
            "Translating after {:?} of typing inactivity",
            debouncer.delay()
        );

        let text = TextTab {
            input: String::new(),
            output: String::new(),
            languages: LanguagePair::defaults(&registry),
            last_translated_at: None,
            output_is_translation: false,
            gate: SequenceGate::default(),
        };
        let image = ImageTab {
            image_text: String::new(),
            languages: LanguagePair::defaults(&registry),
            image_label: "Uploaded Image: None".to_string(),
            preview: None,
            preview_generation: 0,
            pending_ocr: None,
            gate: SequenceGate::default(),
        };

        Self {
            registry,
            dispatcher,
            debouncer,
            events,
            text,
            image,
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Called on every edit of the input text.
    pub fn on_input_changed(&self) {
        self.debouncer.notify();
    }

    /// True while typing has not yet settled long enough to translate.
    pub fn is_debouncing(&self) -> bool {
        self.debouncer.state() == DebounceState::Waiting
    }

    pub fn translate_text(&mut self) {
        let Some(request) = self.build_request(&self.text.languages, &self.text.input, "input text")
        else {
            return;
        };
        let seq = self.text.gate.issue();
        self.dispatcher.translate(OutputTarget::TextOutput, seq, request);
    }

    pub fn translate_image_text(&mut self) {
        let Some(request) =
            self.build_request(&self.image.languages, &self.image.image_text, "image text")
        else {
            return;
        };
        let seq = self.image.gate.issue();
        self.dispatcher.translate(OutputTarget::ImageText, seq, request);
    }

    fn build_request(
        &self,
        languages: &LanguagePair,
        text: &str,
        area: &str,
    ) -> Option<TranslateRequest> {
        let text = text.trim();
        if text.is_empty() {
            warn!("No {} to translate.", area);
            return None;
        }

        let source = self.registry.code_for(&languages.source);
        let target = self.registry.code_for(&languages.target);
        let (Some(source), Some(target)) = (source, target) else {
            error!(
                "Unknown language selection: {:?} -> {:?}",
                languages.source, languages.target
            );
            return None;
        };

        Some(TranslateRequest {
            text: text.to_string(),
            source_lang: source.to_string(),
            target_lang: target.to_string(),
        })
    }

    /// Start OCR on `path` using the image tab's source language.
    pub fn load_image(&mut self, path: PathBuf) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.image.image_label = format!("Uploaded Image: {}", file_name);
        self.image.image_text.clear();
        self.image.gate.invalidate();

        let Some(language) = self.registry.ocr_code_for(&self.image.languages.source) else {
            error!("Unknown OCR language: {:?}", self.image.languages.source);
            return;
        };
        let language = language.to_string();

        let seq = self.image.gate.issue();
        self.image.pending_ocr = Some(seq);
        info!("Extracting text from {} ({})", path.display(), language);
        self.dispatcher.extract_text(seq, path, language);
    }

    /// Empty input and output, dropping any pending or in-flight translation.
    pub fn clear_text(&mut self) {
        self.debouncer.cancel();
        self.text.input.clear();
        self.text.output.clear();
        self.text.output_is_translation = false;
        self.text.gate.invalidate();
    }

    pub fn clear_image_text(&mut self) {
        self.image.image_text.clear();
        self.image.gate.invalidate();
        self.image.pending_ocr = None;
    }

    /// Swap source and target; a successful translation becomes the new input.
    pub fn swap_text_languages(&mut self) {
        self.text.languages.swap();
        if self.text.output_is_translation && !self.text.output.trim().is_empty() {
            self.text.input = std::mem::take(&mut self.text.output);
            self.text.output_is_translation = false;
        }
        self.translate_text();
    }

    /// Apply every queued background result. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.try_next() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::DebounceElapsed => self.translate_text(),
            UiEvent::TranslationFinished {
                target,
                seq,
                result,
            } => {
                let gate = match target {
                    OutputTarget::TextOutput => &mut self.text.gate,
                    OutputTarget::ImageText => &mut self.image.gate,
                };
                if !gate.accept(seq) {
                    debug!("Discarding stale translation #{} for {:?}", seq, target);
                    return;
                }

                let succeeded = result.is_ok();
                let display = match result {
                    Ok(response) => response.translated_text,
                    Err(e) => format!("Translation error: {}", e),
                };
                match target {
                    OutputTarget::TextOutput => {
                        self.text.output = display;
                        self.text.output_is_translation = succeeded;
                        if succeeded {
                            self.text.last_translated_at = Some(Local::now());
                        }
                    }
                    OutputTarget::ImageText => self.image.image_text = display,
                }
            }
            UiEvent::ImageLoaded { seq, preview } => {
                if self.image.gate.is_live(seq) {
                    self.image.preview = Some(preview);
                    self.image.preview_generation += 1;
                }
            }
            UiEvent::OcrFinished { seq, result } => {
                if self.image.pending_ocr == Some(seq) {
                    self.image.pending_ocr = None;
                }
                if !self.image.gate.accept(seq) {
                    debug!("Discarding stale OCR result #{}", seq);
                    return;
                }
                self.image.image_text = match result {
                    Ok(text) => text,
                    Err(e) => format!("OCR Error: {}", e),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use image::{GrayImage, Rgb, RgbImage};
    use tokio::runtime::Handle;
    use tokio::time::sleep;

    use crate::config_manager::ocr::OcrConfig;
    use crate::events;
    use crate::ocr::{OcrError, OcrInterface, OcrOptions};
    use crate::translate::{TranslateError, TranslateInterface, TranslateResponse};

    #[derive(Default)]
    struct StubTranslator {
        calls: Mutex<Vec<TranslateRequest>>,
    }

    #[async_trait]
    impl TranslateInterface for StubTranslator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn translate(
            &self,
            request: &TranslateRequest,
        ) -> Result<TranslateResponse, TranslateError> {
            self.calls.lock().unwrap().push(request.clone());
            let text = match (
                request.text.as_str(),
                request.source_lang.as_str(),
                request.target_lang.as_str(),
            ) {
                ("Hello", "en", "es") => "Hola".to_string(),
                ("Hola", "es", "en") => "Hello".to_string(),
                ("slow", _, _) => {
                    sleep(Duration::from_millis(500)).await;
                    "SLOW".to_string()
                }
                ("fast", _, _) => "FAST".to_string(),
                ("boom", _, _) => {
                    return Err(TranslateError::Service("backend exploded".into()));
                }
                (other, _, target) => format!("[{}] {}", target, other),
            };
            Ok(TranslateResponse {
                translated_text: text,
                detected_source_lang: None,
            })
        }
    }

    struct StubOcr {
        result: Result<String, String>,
        seen: Mutex<Vec<OcrOptions>>,
    }

    impl StubOcr {
        fn returning(result: Result<&str, &str>) -> Self {
            Self {
                result: result.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OcrInterface for StubOcr {
        fn name(&self) -> &str {
            "stub"
        }

        async fn extract_text(
            &self,
            _image: &GrayImage,
            options: &OcrOptions,
        ) -> Result<String, OcrError> {
            self.seen.lock().unwrap().push(options.clone());
            self.result.clone().map_err(OcrError::Engine)
        }
    }

    fn session_with(translator: Arc<StubTranslator>, ocr: Arc<StubOcr>) -> Session {
        let runtime = Handle::current();
        let (sink, queue) = events::channel();
        let dispatcher = Dispatcher::new(translator, ocr, runtime.clone(), sink, &OcrConfig::default());
        let debouncer = Debouncer::new(Duration::from_millis(200), &runtime);
        Session::new(LanguageRegistry::builtin(), dispatcher, debouncer, queue)
    }

    fn text_session() -> (Session, Arc<StubTranslator>) {
        let translator = Arc::new(StubTranslator::default());
        let ocr = Arc::new(StubOcr::returning(Ok("")));
        (session_with(translator.clone(), ocr), translator)
    }

    fn select(pair: &mut LanguagePair, source: &str, target: &str) {
        pair.source = source.to_string();
        pair.target = target.to_string();
    }

    async fn pump_until(session: &mut Session, done: impl Fn(&Session) -> bool) {
        for _ in 0..300 {
            session.pump();
            if done(session) {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test(start_paused = true)]
    async fn typing_translates_only_after_inactivity() {
        let (mut session, translator) = text_session();
        select(&mut session.text.languages, "English", "Spanish");

        session.text.input = "Hel".into();
        session.on_input_changed();
        assert!(session.is_debouncing());
        sleep(Duration::from_millis(150)).await;
        session.text.input = "Hello".into();
        session.on_input_changed();

        sleep(Duration::from_millis(199)).await;
        session.pump();
        assert!(session.text.output.is_empty());
        assert!(translator.calls.lock().unwrap().is_empty());

        sleep(Duration::from_millis(2)).await;
        pump_until(&mut session, |s| !s.text.output.is_empty()).await;

        assert_eq!(session.text.output, "Hola");
        assert!(session.text.last_translated_at.is_some());
        assert!(!session.is_debouncing());
        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            TranslateRequest {
                text: "Hello".into(),
                source_lang: "en".into(),
                target_lang: "es".into(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failure_replaces_output_with_error_message() {
        let (mut session, _) = text_session();
        session.text.output = "previous".into();
        session.text.input = "boom".into();
        session.translate_text();

        pump_until(&mut session, |s| s.text.output != "previous").await;
        assert_eq!(session.text.output, "Translation error: backend exploded");
        assert!(session.text.last_translated_at.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_issues_no_request() {
        let (mut session, translator) = text_session();
        session.text.input = "  \n\t".into();
        session.translate_text();
        session.on_input_changed();

        sleep(Duration::from_millis(400)).await;
        session.pump();
        sleep(Duration::from_millis(10)).await;
        session.pump();

        assert!(translator.calls.lock().unwrap().is_empty());
        assert!(session.text.output.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_result_does_not_overwrite_newer_one() {
        let (mut session, _) = text_session();
        session.text.input = "slow".into();
        session.translate_text();
        session.text.input = "fast".into();
        session.translate_text();

        pump_until(&mut session, |s| !s.text.output.is_empty()).await;
        assert_eq!(session.text.output, "FAST");

        sleep(Duration::from_millis(600)).await;
        session.pump();
        assert_eq!(session.text.output, "FAST");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties_both_areas_despite_in_flight_work() {
        let (mut session, translator) = text_session();
        session.text.input = "slow".into();
        session.translate_text();
        session.text.output = "stale output".into();

        // A debounce pending at the moment of clearing must not fire either.
        session.on_input_changed();
        session.clear_text();

        sleep(Duration::from_millis(700)).await;
        session.pump();

        assert!(session.text.input.is_empty());
        assert!(session.text.output.is_empty());
        assert_eq!(translator.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn swapping_translates_back_without_touching_registry() {
        let (mut session, _) = text_session();
        let registry_before = session.registry().clone();
        select(&mut session.text.languages, "English", "Spanish");
        session.text.input = "Hello".into();
        session.translate_text();
        pump_until(&mut session, |s| s.text.output == "Hola").await;

        session.swap_text_languages();
        assert_eq!(session.text.input, "Hola");
        assert_eq!(session.text.languages.source, "Spanish");
        assert_eq!(session.text.languages.target, "English");

        pump_until(&mut session, |s| s.text.output == "Hello").await;
        assert_eq!(session.registry(), &registry_before);
    }

    #[tokio::test(start_paused = true)]
    async fn swapping_after_an_error_keeps_the_original_input() {
        let (mut session, translator) = text_session();
        select(&mut session.text.languages, "English", "Spanish");
        session.text.input = "Hello".into();
        session.translate_text();
        pump_until(&mut session, |s| s.text.output == "Hola").await;

        session.text.input = "boom".into();
        session.translate_text();
        pump_until(&mut session, |s| s.text.output.starts_with("Translation error")).await;
        assert!(session.text.last_translated_at.is_some());

        session.swap_text_languages();
        assert_eq!(session.text.input, "boom");

        pump_until(&mut session, |_| translator.calls.lock().unwrap().len() == 3).await;
        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls[2].text, "boom");
        assert_eq!((calls[2].source_lang.as_str(), calls[2].target_lang.as_str()), ("es", "en"));
    }

    fn sample_image() -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .prefix("lingua-img-")
            .suffix(".png")
            .tempfile()
            .unwrap();
        RgbImage::from_pixel(40, 20, Rgb([240, 240, 240]))
            .save(file.path())
            .unwrap();
        file
    }

    #[tokio::test]
    async fn uploaded_image_text_is_extracted_then_translated() {
        let translator = Arc::new(StubTranslator::default());
        let ocr = Arc::new(StubOcr::returning(Ok("Good morning")));
        let mut session = session_with(translator, ocr.clone());
        select(&mut session.image.languages, "English", "French");

        let image = sample_image();
        session.image.image_text = "old text".into();
        session.load_image(image.path().to_path_buf());

        let name = image.path().file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(session.image.image_label, format!("Uploaded Image: {}", name));
        assert!(session.image.image_text.is_empty());
        assert!(session.image.is_extracting());

        pump_until(&mut session, |s| !s.image.image_text.is_empty()).await;
        assert_eq!(session.image.image_text, "Good morning");
        assert!(!session.image.is_extracting());
        assert_eq!(session.image.preview_generation, 1);
        assert_eq!(session.image.preview.as_ref().map(|p| (p.width, p.height)), Some((40, 20)));
        assert_eq!(
            ocr.seen.lock().unwrap()[0],
            OcrOptions {
                page_segmentation_mode: 6,
                language: "eng".into(),
            }
        );

        session.translate_image_text();
        pump_until(&mut session, |s| s.image.image_text != "Good morning").await;
        assert_eq!(session.image.image_text, "[fr] Good morning");
    }

    #[tokio::test]
    async fn ocr_failure_is_shown_in_image_area() {
        let translator = Arc::new(StubTranslator::default());
        let ocr = Arc::new(StubOcr::returning(Err("Failed loading language 'tam'")));
        let mut session = session_with(translator.clone(), ocr.clone());
        select(&mut session.image.languages, "Tamil", "English");

        let image = sample_image();
        session.load_image(image.path().to_path_buf());

        pump_until(&mut session, |s| !s.image.image_text.is_empty()).await;
        assert_eq!(
            session.image.image_text,
            "OCR Error: Failed loading language 'tam'"
        );
        assert_eq!(ocr.seen.lock().unwrap()[0].language, "tam");
        assert!(translator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_image_reports_without_running_ocr() {
        let translator = Arc::new(StubTranslator::default());
        let ocr = Arc::new(StubOcr::returning(Ok("never")));
        let mut session = session_with(translator, ocr.clone());

        session.load_image(PathBuf::from("/no/such/scan.png"));

        pump_until(&mut session, |s| !s.image.image_text.is_empty()).await;
        assert!(session.image.image_text.starts_with("OCR Error: "));
        assert!(ocr.seen.lock().unwrap().is_empty());
        assert!(session.image.preview.is_none());
    }

    #[tokio::test]
    async fn clearing_image_text_discards_pending_ocr() {
        let translator = Arc::new(StubTranslator::default());
        let ocr = Arc::new(StubOcr::returning(Ok("late text")));
        let mut session = session_with(translator, ocr.clone());

        let image = sample_image();
        session.load_image(image.path().to_path_buf());
        session.clear_image_text();
        assert!(!session.image.is_extracting());

        pump_until(&mut session, |_| !ocr.seen.lock().unwrap().is_empty()).await;
        sleep(Duration::from_millis(50)).await;
        session.pump();
        assert!(session.image.image_text.is_empty());
    }
}
