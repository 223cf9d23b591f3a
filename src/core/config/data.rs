use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Field-by-field override of a built-in persona.
///
/// Any field left unset keeps the built-in value.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PersonaOverride {
    pub display_name: Option<String>,
    pub system_prompt: Option<String>,
    pub greeting: Option<String>,
    pub farewell: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// API key stored in plain text. The keyring is preferred; see `sarangbang auth`.
    pub api_key: Option<String>,
    /// Base URL of the generative language API
    pub base_url: Option<String>,
    /// Models tried in order before falling back to the family marker
    #[serde(default)]
    pub preferred_models: Vec<String>,
    /// Substring that identifies an acceptable fallback model (e.g. "gemini")
    pub model_family_marker: Option<String>,
    /// Skip model discovery and always use this model
    pub pinned_model: Option<String>,
    /// Per-request timeout for model calls, in seconds
    pub request_timeout_secs: Option<u64>,
    /// Persona selected at startup (e.g. "family-father")
    pub default_persona: Option<String>,
    /// Typing this phrase on its own ends the chat, like `/quit`
    pub exit_phrase: Option<String>,
    /// Image embedded behind exported HTML transcripts
    pub background_image: Option<PathBuf>,
    /// Overrides keyed by persona id
    #[serde(default)]
    pub personas: BTreeMap<String, PersonaOverride>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    /// Keys match persona ids case-insensitively; an exact key wins.
    pub fn persona_override(&self, id: &str) -> Option<&PersonaOverride> {
        self.personas.get(id).or_else(|| {
            self.personas
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(id))
                .map(|(_, persona)| persona)
        })
    }
}
