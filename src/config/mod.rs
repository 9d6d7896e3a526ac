//! Configuration management
//!
//! Completion settings and their layered resolution (package default, user
//! file, project file).

pub mod settings;

pub use settings::{
    CompletionMode, CompletionSettings, KeywordCase, SettingsLayer, load_layer, load_settings,
};
