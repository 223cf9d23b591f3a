use crate::api::DEFAULT_BASE_URL;
use crate::core::config::data::Config;
use std::time::Duration;

pub const DEFAULT_PREFERRED_MODELS: &[&str] = &[
    "models/gemini-1.5-flash",
    "models/gemini-1.5-flash-latest",
    "models/gemini-1.5-pro",
    "models/gemini-pro",
];
pub const DEFAULT_MODEL_FAMILY_MARKER: &str = "gemini";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_EXIT_PHRASE: &str = "그만";

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn preferred_models(&self) -> Vec<String> {
        if self.preferred_models.is_empty() {
            DEFAULT_PREFERRED_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect()
        } else {
            self.preferred_models.clone()
        }
    }

    pub fn model_family_marker(&self) -> &str {
        self.model_family_marker
            .as_deref()
            .filter(|marker| !marker.is_empty())
            .unwrap_or(DEFAULT_MODEL_FAMILY_MARKER)
    }

    pub fn pinned_model(&self) -> Option<&str> {
        self.pinned_model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn exit_phrase(&self) -> &str {
        self.exit_phrase
            .as_deref()
            .map(str::trim)
            .filter(|phrase| !phrase.is_empty())
            .unwrap_or(DEFAULT_EXIT_PHRASE)
    }
}
