use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const API_URL_ENV: &str = "CHALK_API_URL";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_theme() -> String {
    "chalkboard".to_string()
}
fn default_languages() -> Vec<String> {
    ["English", "French", "Spanish", "Hindi", "Nepali"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_speech_enabled() -> bool {
    true
}
fn default_speech_command() -> String {
    "espeak-ng".to_string()
}
fn default_speech_rate() -> f32 {
    0.9
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_canvas_size() -> u32 {
    300
}
fn default_stroke_width() -> f32 {
    8.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            theme: default_theme(),
            languages: default_languages(),
            speech_enabled: default_speech_enabled(),
            speech_command: default_speech_command(),
            speech_rate: default_speech_rate(),
            request_timeout_secs: default_request_timeout_secs(),
            canvas_size: default_canvas_size(),
            stroke_width: default_stroke_width(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str::<Config>(&content)?
        } else {
            let config = Config::default();
            // first run: leave an editable file behind
            if let Err(e) = config.save() {
                log::warn!("could not write {}: {e}", path.display());
            }
            config
        };
        config.apply_env_api_url(std::env::var(API_URL_ENV).ok());
        config.validate();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chalk")
            .join("config.toml")
    }

    /// Replace the backend base URL. Blank values are ignored and a trailing
    /// slash is dropped so endpoint paths can be appended directly.
    pub fn override_api_url(&mut self, url: &str) {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            self.api_url = url.to_string();
        }
    }

    /// Apply the value of `CHALK_API_URL`, if it was set.
    pub fn apply_env_api_url(&mut self, value: Option<String>) {
        if let Some(url) = value {
            log::debug!("{API_URL_ENV} set, using {url}");
            self.override_api_url(&url);
        }
    }

    /// Clamp values read from disk into ranges the UI can work with.
    pub fn validate(&mut self) {
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        if self.api_url.is_empty() {
            self.api_url = default_api_url();
        }
        self.languages.retain(|l| !l.trim().is_empty());
        if self.languages.is_empty() {
            self.languages = default_languages();
        }
        self.speech_rate = self.speech_rate.clamp(0.1, 2.0);
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 300);
        self.canvas_size = self.canvas_size.clamp(64, 1024);
        self.stroke_width = self.stroke_width.clamp(1.0, 64.0);
    }
}
