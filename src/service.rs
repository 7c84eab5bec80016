use crate::error::Result;
use async_trait::async_trait;

/// Remote image model. Both calls return the produced image as base64.
#[async_trait]
pub trait PortraitService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    async fn edit(&self, image_base64: &str, mime_type: &str, prompt: &str) -> Result<String>;

    fn name(&self) -> &str {
        "portrait-service"
    }
}
