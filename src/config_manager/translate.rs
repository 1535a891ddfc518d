use serde::{Deserialize, Serialize};

/// Translation backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// `google` or `libretranslate`
    pub translate_model: String,
    pub google: GoogleTranslateConfig,
    pub libretranslate: LibreTranslateConfig,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            translate_model: "google".to_string(),
            google: GoogleTranslateConfig::default(),
            libretranslate: LibreTranslateConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleTranslateConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GoogleTranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibreTranslateConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LibreTranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}
