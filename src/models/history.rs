use serde::{Deserialize, Serialize};

use super::image::ImagePayload;
use super::options::{Mode, PromptOptions};

/// Snapshot of one completed generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub id: i64,
    /// `data:image/png;base64,...` of the watermarked result.
    pub image_url: String,
    pub options: PromptOptions,
    pub mode: Mode,
    pub original_image: Option<ImagePayload>,
}
