use std::env;

use crate::error::{Result, StudioError};
use crate::watermark::WatermarkAnchor;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "bananaface-portrait";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());
        let model = env::var("GEMINI_MODEL").ok().filter(|m| !m.is_empty());
        let base_url = env::var("GEMINI_BASE_URL").ok().filter(|u| !u.is_empty());

        GeminiConfig {
            api_key,
            model,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            StudioError::ConfigError("GEMINI_API_KEY (or API_KEY) is not set".into())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    pub enabled: bool,
    pub text: String,
    pub anchor: WatermarkAnchor,
    /// Badge width as a percentage of the image's shorter side.
    pub scale: f32,
    /// 0-100.
    pub opacity: f32,
    /// Distance from the anchored edges, percentage of the shorter side.
    pub margin: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        WatermarkConfig {
            enabled: true,
            text: "BANANAFACE".to_string(),
            anchor: WatermarkAnchor::BottomRight,
            scale: 30.0,
            opacity: 70.0,
            margin: 3.0,
        }
    }
}

impl WatermarkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(text) = env::var("WATERMARK_TEXT") {
            if !text.trim().is_empty() {
                config.text = text;
            }
        }
        if let Ok(enabled) = env::var("WATERMARK_ENABLED") {
            config.enabled = !matches!(enabled.as_str(), "false" | "0" | "off");
        }
        config
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_anchor(mut self, anchor: WatermarkAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.clamp(1.0, 100.0);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 100.0);
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.clamp(0.0, 50.0);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub watermark: WatermarkConfig,
    pub download_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            watermark: WatermarkConfig::default(),
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let download_prefix = env::var("DOWNLOAD_PREFIX")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOWNLOAD_PREFIX.to_string());

        Config {
            gemini: GeminiConfig::from_env(),
            watermark: WatermarkConfig::from_env(),
            download_prefix,
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_watermark(mut self, config: WatermarkConfig) -> Self {
        self.watermark = config;
        self
    }

    pub fn with_download_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.download_prefix = prefix.into();
        self
    }
}
