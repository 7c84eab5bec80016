use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    logger,
    models::{
        ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
        ImagePayload, Part,
    },
    service::PortraitService,
};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ImageClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client,
            api_key: config.require_api_key()?.to_string(),
            model: config.model().to_string(),
            base_url: config.base_url().to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn invoke(&self, request: &GenerateContentRequest) -> Result<String> {
        let _timer = logger::timer(&format!("gemini {}", self.model));

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini transport error: {:?}", e);
                StudioError::Remote(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StudioError::Remote(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            log::error!("Gemini returned {}: {}", status, body);
            return Err(StudioError::Remote(api_error_message(status.as_u16(), &body)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| StudioError::ResponseError(format!("Unexpected Gemini response: {}", e)))?;
        extract_image(&parsed)
    }
}

#[async_trait]
impl PortraitService for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        log::info!("Generating portrait with model: {}", self.model);
        log::debug!("Prompt: {}", prompt);
        self.invoke(&build_request(prompt, None)).await
    }

    async fn edit(&self, image_base64: &str, mime_type: &str, prompt: &str) -> Result<String> {
        log::info!(
            "Editing {} portrait ({} base64 chars) with model: {}",
            mime_type,
            image_base64.len(),
            self.model
        );
        log::debug!("Prompt: {}", prompt);
        let source = ImagePayload::new(image_base64, mime_type);
        self.invoke(&build_request(prompt, Some(&source))).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Edit requests carry the source image before the instruction text.
pub fn build_request(prompt: &str, source: Option<&ImagePayload>) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = source {
        parts.push(Part::image(image));
    }
    parts.push(Part::text(prompt));

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: GenerationConfig::default(),
    }
}

/// First inline image in the response, as base64.
pub fn extract_image(response: &GenerateContentResponse) -> Result<String> {
    let parts = response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter());

    let mut texts = Vec::new();
    for part in parts {
        if let Some(inline) = &part.inline_data {
            if !inline.data.is_empty() {
                return Ok(inline.data.clone());
            }
        }
        if let Some(text) = part.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            texts.push(text.to_string());
        }
    }

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(StudioError::Remote(format!(
            "The request was blocked by the model: {}",
            reason
        )));
    }

    if texts.is_empty() {
        let finish = response
            .candidates
            .iter()
            .find_map(|c| c.finish_reason.as_deref())
            .map(|r| format!(" (finish reason: {})", r))
            .unwrap_or_default();
        Err(StudioError::Remote(format!(
            "The model returned no image{}.",
            finish
        )))
    } else {
        Err(StudioError::Remote(format!(
            "The model returned no image: {}",
            texts.join(" ")
        )))
    }
}

fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => {
            format!("Gemini API error ({}): {}", status, parsed.error.message)
        }
        _ if body.trim().is_empty() => format!("Gemini API error ({})", status),
        _ => format!("Gemini API error ({}): {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn generate_request_shape() {
        let value = serde_json::to_value(build_request("a portrait", None)).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "a portrait" }] }],
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })
        );
    }

    #[test]
    fn edit_request_puts_image_first() {
        let source = ImagePayload::new("QUJD", "image/jpeg");
        let value = serde_json::to_value(build_request("make it warmer", Some(&source))).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], json!("image/jpeg"));
        assert_eq!(parts[0]["inlineData"]["data"], json!("QUJD"));
        assert_eq!(parts[1]["text"], json!("make it warmer"));
    }

    #[test]
    fn extracts_first_inline_image() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": "SU1H" } }
                ]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(extract_image(&response).unwrap(), "SU1H");
    }

    #[test]
    fn accepts_snake_case_inline_data() {
        let response = parse(json!({
            "candidates": [{ "content": { "parts": [
                { "inline_data": { "mime_type": "image/png", "data": "U05B" } }
            ]}}]
        }));
        assert_eq!(extract_image(&response).unwrap(), "U05B");
    }

    #[test]
    fn text_only_response_is_an_error_with_the_text() {
        let response = parse(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I can't help with that." }] } }]
        }));
        let err = extract_image(&response).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The model returned no image: I can't help with that."
        );
    }

    #[test]
    fn blocked_and_empty_responses() {
        let blocked = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert!(extract_image(&blocked).unwrap_err().to_string().contains("SAFETY"));

        let empty = parse(json!({ "candidates": [{ "finishReason": "IMAGE_SAFETY" }] }));
        assert_eq!(
            extract_image(&empty).unwrap_err().to_string(),
            "The model returned no image (finish reason: IMAGE_SAFETY)."
        );
    }

    #[test]
    fn api_error_messages() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            api_error_message(400, body),
            "Gemini API error (400): API key not valid."
        );
        assert_eq!(api_error_message(503, ""), "Gemini API error (503)");
        assert_eq!(api_error_message(500, "boom"), "Gemini API error (500): boom");
    }

    #[test]
    fn requires_api_key() {
        assert!(ImageClient::new(Client::new(), &GeminiConfig::new()).is_err());
    }

    /// Serves one canned HTTP response and hands back the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: String,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + length {
                        break;
                    }
                }
            }
            let reply = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn generate_round_trip_against_local_server() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "T0s=" } }
            ]}}]
        })
        .to_string();
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", body).await;
        let config = GeminiConfig::new()
            .with_api_key("secret")
            .with_model("test-model")
            .with_base_url(base_url);
        let client = ImageClient::new(Client::new(), &config).unwrap();

        let image = client.generate("a portrait").await.unwrap();
        assert_eq!(image, "T0s=");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /models/test-model:generateContent"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: secret"));
        assert!(request.contains("\"text\":\"a portrait\""));
    }

    #[tokio::test]
    async fn http_errors_surface_the_api_message() {
        let body = json!({ "error": { "code": 429, "message": "Quota exceeded" } }).to_string();
        let (base_url, server) = serve_once("HTTP/1.1 429 Too Many Requests", body).await;
        let config = GeminiConfig::new().with_api_key("k").with_base_url(base_url);
        let client = ImageClient::new(Client::new(), &config).unwrap();

        let err = client.edit("QUJD", "image/png", "warmer").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API error (429): Quota exceeded");
        let request = server.await.unwrap();
        assert!(request.contains("\"inlineData\""));
    }
}
