use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SettingsError;
use crate::page::Page;

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// User preferences that affect editing behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Size of new pages, in points (A4 by default)
    pub page_width: f32,
    pub page_height: f32,
    /// Name shown for layer 0
    pub background_name: String,
    /// Fallback name of unnamed layers; `{}` is replaced by the layer id
    pub layer_name_template: String,
    /// Switching layers shows the layers below and hides the ones above
    pub auto_hide_layers: bool,
    /// Log both undo stacks at `trace` level after every change
    pub undo_trace: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            background_name: "Background".to_owned(),
            layer_name_template: "Layer {}".to_owned(),
            auto_hide_layers: false,
            undo_trace: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.page_width.is_finite() && self.page_width > 0.0) {
            return Err(SettingsError::Invalid(format!("page width {}", self.page_width)));
        }
        if !(self.page_height.is_finite() && self.page_height > 0.0) {
            return Err(SettingsError::Invalid(format!("page height {}", self.page_height)));
        }
        Ok(())
    }

    /// Blank page of the configured size, without layers
    pub fn new_page(&self) -> Page {
        Page::new(self.page_width, self.page_height)
    }

    /// Display name of an unnamed layer
    pub fn layer_name(&self, layer_id: usize) -> String {
        if self.layer_name_template.contains("{}") {
            self.layer_name_template.replace("{}", &layer_id.to_string())
        } else {
            format!("{} {layer_id}", self.layer_name_template)
        }
    }
}
