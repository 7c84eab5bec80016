use serde::{Deserialize, Serialize};

use crate::models::{Lang, Mode, Theme};

/// Viewports narrower than this get the handheld defaults.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub lang: Lang,
    pub theme: Theme,
    pub history_visible: bool,
}

impl DisplaySettings {
    pub fn desktop() -> Self {
        Self {
            lang: Lang::Zh,
            theme: Theme::Dark,
            history_visible: true,
        }
    }

    pub fn mobile() -> Self {
        Self {
            lang: Lang::Zh,
            theme: Theme::Light,
            history_visible: false,
        }
    }

    pub fn for_viewport(width: u32) -> Self {
        if is_mobile(width) {
            Self::mobile()
        } else {
            Self::desktop()
        }
    }

    pub fn toggle_lang(&mut self) {
        self.lang = self.lang.toggled();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn toggle_history(&mut self) {
        self.history_visible = !self.history_visible;
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::desktop()
    }
}

pub fn is_mobile(viewport_width: u32) -> bool {
    viewport_width < MOBILE_BREAKPOINT_PX
}

/// Handheld users mostly edit their own photos; desktop starts from text.
pub fn initial_mode(viewport_width: u32) -> Mode {
    if is_mobile(viewport_width) {
        Mode::ImageToImage
    } else {
        Mode::TextToImage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_defaults() {
        let phone = DisplaySettings::for_viewport(390);
        assert_eq!(phone.theme, Theme::Light);
        assert!(!phone.history_visible);
        assert_eq!(initial_mode(390), Mode::ImageToImage);

        let desk = DisplaySettings::for_viewport(1440);
        assert_eq!(desk.theme, Theme::Dark);
        assert!(desk.history_visible);
        assert_eq!(initial_mode(768), Mode::TextToImage);
        assert_eq!(desk.lang, Lang::Zh);
    }

    #[test]
    fn toggles() {
        let mut settings = DisplaySettings::desktop();
        settings.toggle_lang();
        settings.toggle_theme();
        settings.toggle_history();
        assert_eq!(settings.lang, Lang::En);
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.history_visible);
    }
}
