// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Embedded image handling.
//!
//! Images placed on a page are stored inline as `data:` URLs in the page's
//! file attachments. This module turns image files into attachments and
//! decodes attachment payloads back into pixels.

use crate::models::page::FileAttachment;
use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// Decoded RGBA pixels of an image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Read an image file and wrap it as a page attachment.
///
/// The file is decoded once to make sure it is a readable image; the
/// original bytes are embedded unchanged.
pub fn load_image_attachment(path: &Path) -> Result<(FileAttachment, u32, u32)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let format = image::guess_format(&bytes)
        .with_context(|| format!("Unrecognized image format: {}", path.display()))?;
    let decoded = image::load_from_memory_with_format(&bytes, format)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;

    let mime_type = format.to_mime_type().to_string();
    let attachment = FileAttachment {
        id: uuid::Uuid::new_v4().to_string(),
        data_url: format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes)),
        mime_type,
        created: chrono::Utc::now().timestamp_millis(),
    };
    Ok((attachment, decoded.width(), decoded.height()))
}

/// Decode a base64 `data:` URL into RGBA pixels.
pub fn decode_data_url(data_url: &str) -> Result<LoadedImage> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("Not a data URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("Data URL has no payload"))?;
    if !header.ends_with(";base64") {
        bail!("Unsupported data URL encoding: {}", header);
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .context("Invalid base64 image payload")?;
    let rgba = image::load_from_memory(&bytes)
        .context("Failed to decode image payload")?
        .to_rgba8();

    Ok(LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_attachment_from_file_decodes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let (attachment, width, height) = load_image_attachment(&path).unwrap();
        assert_eq!((width, height), (3, 2));
        assert_eq!(attachment.mime_type, "image/png");
        assert!(attachment.data_url.starts_with("data:image/png;base64,"));

        let image = decode_data_url(&attachment.data_url).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(&image.pixels[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_rejects_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert!(load_image_attachment(&path).is_err());
    }

    #[test]
    fn test_rejects_bad_data_urls() {
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:image/png,rawbytes").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }
}
