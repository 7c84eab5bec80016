use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::ImageFormat;

use crate::error::{Result, StudioError};
use crate::models::ImagePayload;

/// Formats accepted for upload.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Reads an image file into a base64 payload.
pub async fn file_to_payload(path: impl AsRef<Path>) -> Result<ImagePayload> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        StudioError::ImageError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    payload_from_bytes(&bytes)
}

pub fn payload_from_bytes(bytes: &[u8]) -> Result<ImagePayload> {
    let mime_type = sniff_mime_type(bytes)?;
    Ok(ImagePayload::new(BASE64.encode(bytes), mime_type))
}

fn sniff_mime_type(bytes: &[u8]) -> Result<&'static str> {
    let format = image::guess_format(bytes)?;
    match format {
        ImageFormat::Png => Ok("image/png"),
        ImageFormat::Jpeg => Ok("image/jpeg"),
        ImageFormat::WebP => Ok("image/webp"),
        other => Err(StudioError::ImageError(format!(
            "Unsupported image format {:?}; expected one of {}",
            other,
            ACCEPTED_MIME_TYPES.join(", ")
        ))),
    }
}

/// Decodes the payload and reports its pixel size.
pub fn measure(payload: &ImagePayload) -> Result<(u32, u32)> {
    let bytes = BASE64.decode(payload.base64.trim())?;
    let decoded = image::load_from_memory(&bytes)?;
    Ok((decoded.width(), decoded.height()))
}

/// [`measure`] on the blocking pool.
pub async fn measure_async(payload: ImagePayload) -> Result<(u32, u32)> {
    tokio::task::spawn_blocking(move || measure(&payload)).await?
}

pub fn data_url(mime_type: &str, base64: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64)
}

pub fn payload_data_url(payload: &ImagePayload) -> String {
    data_url(&payload.mime_type, &payload.base64)
}

pub fn parse_data_url(url: &str) -> Result<ImagePayload> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| StudioError::ImageError("not a data URL".into()))?;
    let (mime_type, data) = rest
        .split_once(";base64,")
        .ok_or_else(|| StudioError::ImageError("data URL is not base64 encoded".into()))?;
    Ok(ImagePayload::new(data, mime_type))
}

pub fn download_file_name(prefix: &str, timestamp_ms: i64) -> String {
    format!("{}-{}.png", prefix, timestamp_ms)
}

/// Writes a generated image to `dir` as `<prefix>-<timestamp>.png`.
pub async fn save_data_url(dir: impl AsRef<Path>, prefix: &str, url: &str) -> Result<PathBuf> {
    let payload = parse_data_url(url)?;
    let bytes = BASE64.decode(payload.base64.as_bytes())?;
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(download_file_name(
        prefix,
        chrono::Utc::now().timestamp_millis(),
    ));
    tokio::fs::write(&path, bytes).await?;
    log::info!("💾 Saved image to {}", path.display());
    Ok(path)
}

#[cfg(test)]
pub(crate) mod test_images {
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 120, 40, 255]));
        let img = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
            _ => DynamicImage::ImageRgba8(img),
        };
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encoded(width, height, ImageFormat::Png)
    }
}

#[cfg(test)]
mod tests {
    use super::test_images;
    use super::*;

    #[test]
    fn payload_detects_png_and_jpeg() {
        let png = payload_from_bytes(&test_images::png(3, 2)).unwrap();
        assert_eq!(png.mime_type, "image/png");
        let jpeg =
            payload_from_bytes(&test_images::encoded(3, 2, ImageFormat::Jpeg)).unwrap();
        assert_eq!(jpeg.mime_type, "image/jpeg");
    }

    #[test]
    fn payload_rejects_unsupported_data() {
        assert!(payload_from_bytes(b"plain text").is_err());
        let bmp = test_images::encoded(2, 2, ImageFormat::Bmp);
        let err = payload_from_bytes(&bmp).unwrap_err();
        assert!(err.to_string().contains("Unsupported image format"));
    }

    #[test]
    fn measure_reads_dimensions() {
        let payload = payload_from_bytes(&test_images::png(7, 5)).unwrap();
        assert_eq!(measure(&payload).unwrap(), (7, 5));
    }

    #[tokio::test]
    async fn measure_async_matches() {
        let payload = payload_from_bytes(&test_images::png(11, 4)).unwrap();
        assert_eq!(measure_async(payload).await.unwrap(), (11, 4));
    }

    #[test]
    fn data_url_round_trip() {
        let url = data_url("image/png", "QUJD");
        assert_eq!(url, "data:image/png;base64,QUJD");
        let payload = parse_data_url(&url).unwrap();
        assert_eq!(payload, ImagePayload::new("QUJD", "image/png"));
        assert!(parse_data_url("https://example.com/a.png").is_err());
        assert!(parse_data_url("data:image/png,raw").is_err());
    }

    #[test]
    fn download_name() {
        assert_eq!(
            download_file_name("bananaface-portrait", 1700000000123),
            "bananaface-portrait-1700000000123.png"
        );
    }

    #[tokio::test]
    async fn file_payload_and_save() {
        let dir = std::env::temp_dir().join(format!("portraitgen-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let source = dir.join("face.png");
        tokio::fs::write(&source, test_images::png(4, 6)).await.unwrap();

        let payload = file_to_payload(&source).await.unwrap();
        assert_eq!(payload.mime_type, "image/png");

        let saved = save_data_url(&dir, "portrait", &payload_data_url(&payload))
            .await
            .unwrap();
        let name = saved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("portrait-") && name.ends_with(".png"));
        assert_eq!(
            tokio::fs::read(&saved).await.unwrap(),
            tokio::fs::read(&source).await.unwrap()
        );

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = file_to_payload("/definitely/not/here.png").await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }
}
