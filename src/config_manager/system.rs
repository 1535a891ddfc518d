use serde::{Deserialize, Serialize};

/// Window and logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub window_title: String,
    pub window_width: f32,
    pub window_height: f32,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            window_title: "Language Translator".to_string(),
            window_width: 700.0,
            window_height: 600.0,
            log_filter: "lingua_desk=info".to_string(),
        }
    }
}
