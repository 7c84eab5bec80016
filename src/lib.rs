pub mod comparator;
pub mod config;
pub mod error;
pub mod gemini;
pub mod history;
pub mod imaging;
pub mod logger;
pub mod lucky;
pub mod models;
pub mod prompt;
pub mod service;
pub mod settings;
pub mod studio;
pub mod viewer;
pub mod watermark;

pub use config::{Config, GeminiConfig, WatermarkConfig};
pub use error::{Result, StudioError};
pub use gemini::{GeminiClient, ImageClient};
pub use history::HistoryStore;
pub use models::{
    HistoryItem, ImagePayload, Lang, Mode, PromptOptions, Theme, UploadedImage, CONTROL_GROUPS,
};
pub use prompt::build_prompt;
pub use service::PortraitService;
pub use studio::{DecodeTicket, GenerationJob, GenerationOutcome, Studio};
pub use watermark::{WatermarkAnchor, Watermarker};
