use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config_manager::Config;
use crate::debounce::Debouncer;
use crate::events;
use crate::languages::LanguageRegistry;
use crate::ocr::{OcrFactory, OcrInterface};
use crate::pipeline::Dispatcher;
use crate::session::Session;
use crate::translate::{TranslateFactory, TranslateInterface};

/// Long-lived services shared by the UI.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: LanguageRegistry,
    pub translator: Arc<dyn TranslateInterface>,
    pub ocr: Arc<dyn OcrInterface>,
    pub runtime: Handle,
}

impl AppState {
    pub fn new(config: Config, runtime: Handle) -> anyhow::Result<Self> {
        let registry = config.language_registry()?;
        let translator = TranslateFactory::create_translator(&config.translate_config)?;
        let ocr = OcrFactory::create_ocr(&config.ocr_config)?;

        Ok(Self {
            config,
            registry,
            translator,
            ocr,
            runtime,
        })
    }

    /// Build the UI session; `wake` is called whenever background work posts a result.
    pub fn session<F>(&self, wake: F) -> Session
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (sink, queue) = events::channel();
        let dispatcher = Dispatcher::new(
            self.translator.clone(),
            self.ocr.clone(),
            self.runtime.clone(),
            sink.with_waker(wake),
            &self.config.ocr_config,
        );
        let debouncer = Debouncer::new(self.config.debounce_config.delay(), &self.runtime);
        Session::new(self.registry.clone(), dispatcher, debouncer, queue)
    }
}
