use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A selectable language: display name, translation code and OCR traineddata name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub ocr_code: Option<String>,
}

impl Language {
    fn new(name: &str, code: &str, ocr_code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            ocr_code: Some(ocr_code.to_string()),
        }
    }

    /// Code handed to the OCR engine; falls back to the translation code.
    pub fn ocr_code(&self) -> &str {
        self.ocr_code.as_deref().unwrap_or(&self.code)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("language list is empty")]
    Empty,
    #[error("language entry {0} has an empty name or code")]
    BlankEntry(usize),
    #[error("language {0:?} is listed more than once")]
    DuplicateName(String),
}

/// Ordered, immutable name -> code mapping. Entry 0 is the default source,
/// entry 1 the default target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    languages: Arc<[Language]>,
}

impl LanguageRegistry {
    pub fn builtin() -> Self {
        let languages = vec![
            Language::new("English", "en", "eng"),
            Language::new("Tamil", "ta", "tam"),
            Language::new("Hindi", "hi", "hin"),
            Language::new("Spanish", "es", "spa"),
            Language::new("French", "fr", "fra"),
            Language::new("German", "de", "deu"),
            Language::new("Chinese (Simplified)", "zh-cn", "chi_sim"),
            Language::new("Japanese", "ja", "jpn"),
            Language::new("Korean", "ko", "kor"),
        ];
        Self {
            languages: languages.into(),
        }
    }

    pub fn from_languages(languages: Vec<Language>) -> Result<Self, RegistryError> {
        if languages.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, language) in languages.iter().enumerate() {
            if language.name.trim().is_empty() || language.code.trim().is_empty() {
                return Err(RegistryError::BlankEntry(index));
            }
            if !seen.insert(language.name.as_str()) {
                return Err(RegistryError::DuplicateName(language.name.clone()));
            }
        }

        Ok(Self {
            languages: languages.into(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.name == name)
    }

    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.get(name).map(|l| l.code.as_str())
    }

    pub fn ocr_code_for(&self, name: &str) -> Option<&str> {
        self.get(name).map(Language::ocr_code)
    }

    pub fn default_source(&self) -> &Language {
        &self.languages[0]
    }

    pub fn default_target(&self) -> &Language {
        self.languages.get(1).unwrap_or(&self.languages[0])
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.languages.len()
    }
}
