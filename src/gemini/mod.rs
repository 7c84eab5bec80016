pub mod image_client;

use crate::{config::GeminiConfig, error::Result};
use reqwest::Client;

pub use image_client::ImageClient;

#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("portraitgen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        log::info!(
            "Gemini client ready (model: {}, endpoint: {})",
            config.model(),
            config.base_url()
        );

        Ok(Self {
            image_client: ImageClient::new(client, &config)?,
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
