//! Completion settings
//!
//! Settings are read from TOML files and layered with a fixed precedence:
//! project file > user file (`~/.sqltools/settings.toml`) > package defaults.
//! The result is resolved once and handed to the completion engine; nothing
//! in the engine reads configuration on its own.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How much work the completion engine does per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawMode", rename_all = "lowercase")]
pub enum CompletionMode {
    /// Never produce completions
    Disabled,
    /// Fuzzy match against the whole catalog only
    Basic,
    /// Statement-aware completion with aliases and join inference
    #[default]
    Smart,
}

/// `autocompletion` accepts `false` to disable, or a mode name.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMode {
    Flag(bool),
    Name(String),
}

impl From<RawMode> for CompletionMode {
    fn from(raw: RawMode) -> Self {
        match raw {
            RawMode::Flag(false) => CompletionMode::Disabled,
            RawMode::Flag(true) => CompletionMode::Smart,
            RawMode::Name(name) => match name.trim().to_ascii_lowercase().as_str() {
                "" | "disabled" | "false" | "none" => CompletionMode::Disabled,
                "basic" => CompletionMode::Basic,
                _ => CompletionMode::Smart,
            },
        }
    }
}

/// Letter case used for keyword completions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum KeywordCase {
    #[default]
    Upper,
    Lower,
}

impl From<String> for KeywordCase {
    fn from(value: String) -> Self {
        if value.to_ascii_lowercase().starts_with("upper") {
            KeywordCase::Upper
        } else {
            KeywordCase::Lower
        }
    }
}

impl KeywordCase {
    pub fn apply(self, keyword: &str) -> String {
        match self {
            KeywordCase::Upper => keyword.to_uppercase(),
            KeywordCase::Lower => keyword.to_lowercase(),
        }
    }
}

/// Formatting-related settings (only keyword case matters for completion)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSettings {
    #[serde(default)]
    pub keyword_case: KeywordCase,
}

/// Fully resolved completion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSettings {
    #[serde(default)]
    pub autocompletion: CompletionMode,

    /// Editor scopes where completion may trigger
    #[serde(default = "default_active_selectors")]
    pub autocomplete_selectors_active: Vec<String>,

    /// Editor scopes where completion must never trigger
    #[serde(default = "default_ignore_selectors")]
    pub autocomplete_selectors_ignore: Vec<String>,

    #[serde(default)]
    pub format: FormatSettings,
}

fn default_active_selectors() -> Vec<String> {
    vec!["source.sql".to_string()]
}

fn default_ignore_selectors() -> Vec<String> {
    vec!["string.quoted.single.sql".to_string()]
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            autocompletion: CompletionMode::default(),
            autocomplete_selectors_active: default_active_selectors(),
            autocomplete_selectors_ignore: default_ignore_selectors(),
            format: FormatSettings::default(),
        }
    }
}

/// One settings file: every field is optional so that a layer only
/// overrides what it mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsLayer {
    #[serde(default)]
    pub autocompletion: Option<CompletionMode>,
    /// Older name for `autocomplete_selectors_active`; wins when non-empty
    #[serde(default)]
    pub selectors: Option<Vec<String>>,
    #[serde(default)]
    pub autocomplete_selectors_active: Option<Vec<String>>,
    #[serde(default)]
    pub autocomplete_selectors_ignore: Option<Vec<String>>,
    #[serde(default)]
    pub format: Option<FormatLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormatLayer {
    #[serde(default)]
    pub keyword_case: Option<KeywordCase>,
}

impl SettingsLayer {
    /// Parse a layer from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl CompletionSettings {
    /// Resolve settings from the package defaults, then `user`, then `project`.
    pub fn resolve(user: &SettingsLayer, project: &SettingsLayer) -> Self {
        let mut settings = Self::default();
        settings.apply(user);
        settings.apply(project);
        settings
    }

    /// Override every field that `layer` sets.
    pub fn apply(&mut self, layer: &SettingsLayer) {
        if let Some(mode) = layer.autocompletion {
            self.autocompletion = mode;
        }

        match (&layer.selectors, &layer.autocomplete_selectors_active) {
            (Some(legacy), _) if !legacy.is_empty() => {
                self.autocomplete_selectors_active = legacy.clone();
            }
            (_, Some(active)) => self.autocomplete_selectors_active = active.clone(),
            _ => {}
        }

        if let Some(ignore) = &layer.autocomplete_selectors_ignore {
            self.autocomplete_selectors_ignore = ignore.clone();
        }

        if let Some(case) = layer.format.as_ref().and_then(|f| f.keyword_case) {
            self.format.keyword_case = case;
        }
    }
}

/// Get the config directory path (~/.sqltools/)
pub fn config_dir() -> ConfigResult<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".sqltools"))
}

/// Get the user settings file path
pub fn user_settings_path() -> ConfigResult<PathBuf> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Load one settings layer. A missing file is an empty layer.
pub fn load_layer(path: &Path) -> ConfigResult<SettingsLayer> {
    if !path.exists() {
        return Ok(SettingsLayer::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::NotFound(format!("Failed to read {}: {}", path.display(), e))
    })?;
    SettingsLayer::from_toml(&content)
}

/// Load and resolve settings: defaults, then the user file, then `project`.
pub fn load_settings(project: Option<&Path>) -> ConfigResult<CompletionSettings> {
    let user = match user_settings_path() {
        Ok(path) => load_layer(&path)?,
        Err(ConfigError::NoHomeDir) => SettingsLayer::default(),
        Err(e) => return Err(e),
    };
    let project = match project {
        Some(path) => load_layer(path)?,
        None => SettingsLayer::default(),
    };
    Ok(CompletionSettings::resolve(&user, &project))
}
