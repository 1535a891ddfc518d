use serde::{Deserialize, Serialize};

use crate::config_manager::debounce::DebounceConfig;
use crate::config_manager::ocr::OcrConfig;
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translate::TranslateConfig;
use crate::languages::{Language, LanguageRegistry, RegistryError};

/// Root configuration. Every section is optional in the file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub system_config: SystemConfig,
    pub translate_config: TranslateConfig,
    pub ocr_config: OcrConfig,
    pub debounce_config: DebounceConfig,
    /// Replaces the built-in language list when present.
    pub languages: Option<Vec<Language>>,
}

impl Config {
    pub fn language_registry(&self) -> Result<LanguageRegistry, RegistryError> {
        match &self.languages {
            Some(languages) => LanguageRegistry::from_languages(languages.clone()),
            None => Ok(LanguageRegistry::builtin()),
        }
    }
}
