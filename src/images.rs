//! Decoding and validation of base64-embedded image payloads.
//!
//! Avatars and recipe images arrive inline in JSON as data URLs
//! (`data:image/png;base64,...`). The bytes are validated with the `image`
//! crate before anything is persisted.

use base64::Engine;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("expected a base64 data URL (data:image/...;base64,...)")]
    NotADataUrl,
    #[error("invalid base64 payload")]
    Base64(#[from] base64::DecodeError),
    #[error("image too large, maximum is {MAX_IMAGE_BYTES} bytes")]
    TooLarge,
    #[error("unsupported image format, allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat,
    #[error("could not decode image: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Decodes a `data:image/...;base64,` payload, sniffing the real format
/// from the bytes rather than trusting the declared mime type.
pub fn decode_data_url(input: &str) -> Result<DecodedImage, ImageError> {
    if !input.starts_with("data:image") {
        return Err(ImageError::NotADataUrl);
    }
    let (_, encoded) = input.split_once(";base64,").ok_or(ImageError::NotADataUrl)?;

    let data = base64::engine::general_purpose::STANDARD.decode(encoded)?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge);
    }

    let reader = ImageReader::new(Cursor::new(data.as_slice()))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let format = reader.format().ok_or(ImageError::UnsupportedFormat)?;
    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat);
    }

    let content_type = format.to_mime_type().to_string();

    // Fully decode once so corrupt files are rejected up front.
    reader
        .decode()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok(DecodedImage { content_type, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_data_url() -> String {
        let img = image::RgbImage::new(1, 1);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        let encoded = base64::engine::general_purpose::STANDARD.encode(buf.into_inner());
        format!("data:image/png;base64,{encoded}")
    }

    #[test]
    fn decodes_png_data_url() {
        let decoded = decode_data_url(&png_data_url()).expect("decode failed");
        assert_eq!(decoded.content_type, "image/png");
        assert!(!decoded.data.is_empty());
    }

    #[test]
    fn sniffs_format_from_bytes_not_label() {
        // PNG bytes mislabeled as jpeg still come back as image/png
        let url = png_data_url().replace("data:image/png", "data:image/jpeg");
        let decoded = decode_data_url(&url).expect("decode failed");
        assert_eq!(decoded.content_type, "image/png");
    }

    #[test]
    fn rejects_plain_strings() {
        assert!(matches!(
            decode_data_url("not an image"),
            Err(ImageError::NotADataUrl)
        ));
    }

    #[test]
    fn rejects_garbage_bytes() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"hello world");
        let url = format!("data:image/png;base64,{encoded}");
        assert!(matches!(
            decode_data_url(&url),
            Err(ImageError::UnsupportedFormat)
        ));
    }

    #[test]
    fn rejects_oversized_payloads() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES + 1]);
        let url = format!("data:image/png;base64,{encoded}");
        assert!(matches!(decode_data_url(&url), Err(ImageError::TooLarge)));
    }
}
