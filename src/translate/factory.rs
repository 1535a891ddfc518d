use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::google::GoogleTranslateClient;
use super::interface::TranslateInterface;
use super::libre::LibreTranslateClient;
use crate::config_manager::translate::TranslateConfig;

/// Factory for translation backends
pub struct TranslateFactory;

impl TranslateFactory {
    /// Create the backend named by `translate_model`.
    pub fn create_translator(config: &TranslateConfig) -> Result<Arc<dyn TranslateInterface>> {
        info!("Initializing translation backend: {}", config.translate_model);

        match config.translate_model.as_str() {
            "google" => Ok(Arc::new(GoogleTranslateClient::new(&config.google)?)),
            "libretranslate" => Ok(Arc::new(LibreTranslateClient::new(&config.libretranslate)?)),
            other => anyhow::bail!(
                "Unknown translate_model {:?}; expected \"google\" or \"libretranslate\"",
                other
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_known_backends() {
        let mut config = TranslateConfig::default();
        assert_eq!(TranslateFactory::create_translator(&config).unwrap().name(), "google");

        config.translate_model = "libretranslate".into();
        assert_eq!(
            TranslateFactory::create_translator(&config).unwrap().name(),
            "libretranslate"
        );
    }

    #[test]
    fn rejects_unknown_backend() {
        let config = TranslateConfig {
            translate_model: "babelfish".into(),
            ..TranslateConfig::default()
        };
        let err = TranslateFactory::create_translator(&config).err().unwrap();
        assert!(err.to_string().contains("babelfish"));
    }
}
