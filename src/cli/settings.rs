//! `sarangbang set` / `sarangbang unset`.

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::core::config::{path_display, Config};
use crate::core::persona::PersonaId;

pub const SETTABLE_KEYS: &[&str] = &[
    "default-persona",
    "pinned-model",
    "model-family-marker",
    "exit-phrase",
    "background-image",
    "request-timeout",
];

/// Apply `key = value` (or clear `key` when `value` is `None`) and return a
/// confirmation line.
pub fn apply_setting(config: &mut Config, key: &str, value: Option<&str>) -> Result<String, String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());

    match key {
        "default-persona" => {
            let parsed = value
                .map(|v| v.parse::<PersonaId>().map_err(|err| err.to_string()))
                .transpose()?;
            config.default_persona = parsed.map(|id| id.as_str().to_string());
        }
        "pinned-model" => config.pinned_model = value.map(str::to_string),
        "model-family-marker" => config.model_family_marker = value.map(str::to_string),
        "exit-phrase" => config.exit_phrase = value.map(str::to_string),
        "background-image" => config.background_image = value.map(PathBuf::from),
        "request-timeout" => {
            config.request_timeout_secs = value
                .map(|v| {
                    v.parse::<u64>()
                        .map_err(|_| format!("request-timeout must be a number of seconds, got '{v}'"))
                })
                .transpose()?;
        }
        _ => {
            return Err(format!(
                "Unknown config key: {key}. Known keys: {}",
                SETTABLE_KEYS.join(", ")
            ))
        }
    }

    Ok(match value {
        Some(value) => format!("✅ Set {key} to: {value}"),
        None => format!("✅ Unset {key}"),
    })
}

pub fn run_setting(
    config_path: Option<&Path>,
    key: &str,
    value: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path().ok_or("No config directory available on this system")?,
    };
    let mut config = Config::load_from_path(&path)?;

    match apply_setting(&mut config, key, value) {
        Ok(message) => {
            config.save_to_path(&path)?;
            println!("{message}");
            println!("   ({})", path_display(&path));
            Ok(())
        }
        Err(message) => {
            eprintln!("❌ {message}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_persona_is_validated_and_normalized() {
        let mut config = Config::default();
        apply_setting(&mut config, "default-persona", Some("Family-Father")).expect("valid");
        assert_eq!(config.default_persona.as_deref(), Some("family-father"));

        let err = apply_setting(&mut config, "default-persona", Some("uncle")).unwrap_err();
        assert!(err.contains("uncle"));
        assert_eq!(config.default_persona.as_deref(), Some("family-father"));

        apply_setting(&mut config, "default-persona", None).expect("unset");
        assert!(config.default_persona.is_none());
    }

    #[test]
    fn timeout_must_be_numeric() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "request-timeout", Some("soon")).is_err());
        apply_setting(&mut config, "request-timeout", Some("15")).expect("numeric");
        assert_eq!(config.request_timeout_secs, Some(15));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = apply_setting(&mut Config::default(), "theme", Some("dark")).unwrap_err();
        assert!(err.contains("Unknown config key: theme"));
    }

    #[test]
    fn run_setting_persists_to_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");

        run_setting(Some(&path), "exit-phrase", Some("잘 자")).expect("saved");
        let config = Config::load_from_path(&path).expect("reload");
        assert_eq!(config.exit_phrase(), "잘 자");
    }
}
