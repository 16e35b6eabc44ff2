//! Engine settings loaded from TOML.
//!
//! Defaults are embedded via `include_str!`; adapters overlay a user
//! configuration on top. Parsed settings are plain values passed explicitly
//! into the engine constructor — nothing here is a global.

use serde::Deserialize;

use crate::session::{Key, KeyBindings, KeyHandling, SessionConfig};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub request: RequestSettings,
    pub keybindings: KeybindingSettings,
    pub editor: EditorHandlingSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            request: RequestSettings::default(),
            keybindings: KeybindingSettings::default(),
            editor: EditorHandlingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    pub base_url: String,
    pub api_key: String,
    pub debounce_ms: u64,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            debounce_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingSettings {
    pub accept: String,
    pub dismiss: String,
}

impl Default for KeybindingSettings {
    fn default() -> Self {
        Self {
            accept: "Tab".to_string(),
            dismiss: "Escape".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorHandlingSettings {
    pub handle_accept: bool,
    pub handle_dismiss: bool,
}

impl Default for EditorHandlingSettings {
    fn default() -> Self {
        Self {
            handle_accept: true,
            handle_dismiss: true,
        }
    }
}

impl EngineSettings {
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: EngineSettings =
            toml::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("keybindings.accept", &self.keybindings.accept),
            ("keybindings.dismiss", &self.keybindings.dismiss),
        ] {
            if let Key::Other(_) = Key::from_event_key(value) {
                return Err(SettingsError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("unknown key name {value:?}"),
                });
            }
        }
        Ok(())
    }

    /// Session behavior derived from these settings.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            bindings: KeyBindings {
                accept: Key::from_event_key(&self.keybindings.accept),
                dismiss: Key::from_event_key(&self.keybindings.dismiss),
            },
            handling: KeyHandling {
                accept: self.editor.handle_accept,
                dismiss: self.editor.handle_dismiss,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let settings = EngineSettings::from_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(settings.request.debounce_ms, 0);
        assert!(settings.request.api_key.is_empty());
        assert!(settings.editor.handle_accept);
        let config = settings.session_config();
        assert_eq!(config.bindings.accept, Key::Tab);
        assert_eq!(config.bindings.dismiss, Key::Escape);
    }

    #[test]
    fn test_partial_overlay_keeps_defaults() {
        let settings = EngineSettings::from_toml(
            r#"
            [request]
            api_key = "k"
            debounce_ms = 75
            "#,
        )
        .unwrap();
        assert_eq!(settings.request.api_key, "k");
        assert_eq!(settings.request.debounce_ms, 75);
        assert_eq!(settings.keybindings.accept, "Tab");
    }

    #[test]
    fn test_unknown_binding_rejected() {
        let err = EngineSettings::from_toml(
            r#"
            [keybindings]
            accept = "Hyper"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn test_single_character_binding_allowed() {
        let settings = EngineSettings::from_toml(
            r#"
            [keybindings]
            dismiss = "`"
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.session_config().bindings.dismiss,
            Key::Char('`')
        );
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        assert!(matches!(
            EngineSettings::from_toml("[request"),
            Err(SettingsError::Parse(_))
        ));
    }
}
