//! Application settings read from `settings.toml` in the app config directory.
//!
//! Every field has a default, so a missing file simply yields the default
//! English setup with the model expected under `<app data>/models/`.

use crate::error::AppError;
use crate::models::locale::Locale;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SETTINGS_FILE: &str = "settings.toml";

const DEFAULT_MODEL_PATH: &str = "models/product_classifier.onnx";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub locale: Locale,
    pub model_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    /// Overrides the locale's default for showing the raw score dump.
    pub show_scores: Option<bool>,
    pub use_gpu: bool,
    pub intra_threads: usize,
    pub score_sum_tolerance: f32,
    pub preview_width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::English,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            catalog_path: None,
            show_scores: None,
            use_gpu: false,
            intra_threads: 4,
            score_sum_tolerance: 0.01,
            preview_width: 400,
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| AppError::config(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read settings file {}: {}", path.display(), e))
        })?;
        let settings = Self::from_toml_str(&content)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Anchor relative model and catalog paths at `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.model_path.is_relative() {
            self.model_path = base.join(&self.model_path);
        }
        if let Some(catalog) = self.catalog_path.take() {
            self.catalog_path = Some(if catalog.is_relative() {
                base.join(catalog)
            } else {
                catalog
            });
        }
        self
    }

    pub fn show_scores(&self) -> bool {
        self.show_scores
            .unwrap_or_else(|| self.locale.shows_scores_by_default())
    }

    fn validate(&self) -> Result<(), AppError> {
        if !(self.score_sum_tolerance > 0.0 && self.score_sum_tolerance < 1.0) {
            return Err(AppError::config(format!(
                "score_sum_tolerance must be between 0 and 1, got {}",
                self.score_sum_tolerance
            )));
        }
        if self.intra_threads == 0 {
            return Err(AppError::config("intra_threads must be at least 1"));
        }
        if self.preview_width == 0 {
            return Err(AppError::config("preview_width must be at least 1"));
        }
        Ok(())
    }
}
