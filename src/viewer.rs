use serde::Serialize;

use crate::models::Mode;

pub const DEFAULT_ASPECT_RATIO: &str = "3 / 4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> String {
        format!("{} / {}", self.width, self.height)
    }
}

/// Presentation of a two-up result on narrow screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MobileView {
    #[default]
    Slider,
    Stacked,
}

impl MobileView {
    pub fn toggled(self) -> Self {
        match self {
            MobileView::Slider => MobileView::Stacked,
            MobileView::Stacked => MobileView::Slider,
        }
    }
}

/// What the image viewer shows for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViewerLayout {
    Loading {
        aspect_ratio: String,
    },
    /// Result alone, with a download action.
    Generated {
        image_url: String,
        aspect_ratio: String,
    },
    Placeholder,
    /// Source image before any edit, with a remove action.
    Original {
        image_url: String,
        aspect_ratio: String,
    },
    /// Source and result side by side (or slider/stacked on mobile).
    TwoUp {
        original_url: String,
        generated_url: String,
        original_aspect_ratio: String,
        generated_aspect_ratio: String,
        comparator_aspect_ratio: String,
    },
}

/// Centre column content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Panel {
    Uploader,
    Viewer(ViewerLayout),
}

#[derive(Debug, Clone, Copy)]
pub struct ViewerInput<'a> {
    pub mode: Mode,
    pub is_loading: bool,
    pub generated_url: Option<&'a str>,
    pub original_url: Option<&'a str>,
    pub original_dims: Option<Dimensions>,
    /// Measured size of the generated image, once known.
    pub generated_dims: Option<Dimensions>,
}

pub fn layout(input: &ViewerInput<'_>) -> ViewerLayout {
    let original_ratio = input
        .original_dims
        .map(|d| d.aspect_ratio())
        .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string());
    let generated_ratio = input
        .generated_dims
        .map(|d| d.aspect_ratio())
        .unwrap_or_else(|| original_ratio.clone());

    if input.mode == Mode::ImageToImage {
        if let (Some(original), Some(generated)) = (input.original_url, input.generated_url) {
            return ViewerLayout::TwoUp {
                original_url: original.to_string(),
                generated_url: generated.to_string(),
                original_aspect_ratio: original_ratio.clone(),
                generated_aspect_ratio: generated_ratio,
                comparator_aspect_ratio: original_ratio,
            };
        }
    }

    if input.is_loading {
        return ViewerLayout::Loading {
            aspect_ratio: generated_ratio,
        };
    }
    if let Some(generated) = input.generated_url {
        return ViewerLayout::Generated {
            image_url: generated.to_string(),
            aspect_ratio: generated_ratio,
        };
    }
    match (input.mode, input.original_url) {
        (Mode::ImageToImage, Some(original)) => ViewerLayout::Original {
            image_url: original.to_string(),
            aspect_ratio: original_ratio,
        },
        _ => ViewerLayout::Placeholder,
    }
}
