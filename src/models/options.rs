use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    TextToImage,
    ImageToImage,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::TextToImage => "text-to-image",
            Mode::ImageToImage => "image-to-image",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-to-image" | "t2i" | "text" => Ok(Mode::TextToImage),
            "image-to-image" | "i2i" | "image" => Ok(Mode::ImageToImage),
            other => Err(StudioError::ConfigError(format!("unknown mode: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    #[default]
    Zh,
}

impl Lang {
    pub fn toggled(self) -> Self {
        match self {
            Lang::En => Lang::Zh,
            Lang::Zh => Lang::En,
        }
    }
}

impl FromStr for Lang {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "zh" => Ok(Lang::Zh),
            other => Err(StudioError::ConfigError(format!("unknown language: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Selected option value per category id, plus free-form extra instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOptions {
    #[serde(default)]
    pub selections: BTreeMap<String, String>,
    #[serde(default)]
    pub supplementary: String,
}

impl PromptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(category_id, value);
        self
    }

    pub fn with_supplementary(mut self, text: impl Into<String>) -> Self {
        self.supplementary = text.into();
        self
    }

    /// An empty value clears the category.
    pub fn set(&mut self, category_id: impl Into<String>, value: impl Into<String>) {
        let category_id = category_id.into();
        let value = value.into();
        if value.is_empty() {
            self.selections.remove(&category_id);
        } else {
            self.selections.insert(category_id, value);
        }
    }

    pub fn get(&self, category_id: &str) -> Option<&str> {
        self.selections
            .get(category_id)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Blank supplementary text does not count; the prompt builder trims it.
    pub fn has_selection(&self) -> bool {
        !self.supplementary.trim().is_empty() || self.selections.values().any(|v| !v.is_empty())
    }

    pub fn clear(&mut self) {
        self.selections.clear();
        self.supplementary.clear();
    }

    /// Parses `category=value`.
    pub fn parse_assignment(raw: &str) -> Result<(String, String), StudioError> {
        let (key, value) = raw.split_once('=').ok_or_else(|| {
            StudioError::ConfigError(format!("expected category=value, got '{}'", raw))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(StudioError::ConfigError(format!("missing category in '{}'", raw)));
        }
        Ok((key.to_string(), value.trim().to_string()))
    }
}
