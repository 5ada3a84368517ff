//! Persistence — turns a composed frame into PNG bytes, a file, base64,
//! or a clipboard image. The session engine itself never touches disk.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbaImage};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encodes a frame as PNG bytes.
pub fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    frame
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(png_bytes)
}

/// PNG bytes, base64-encoded for tool-protocol responses.
pub fn encode_png_base64(frame: &RgbaImage) -> Result<String, EncodeError> {
    Ok(STANDARD.encode(encode_png(frame)?))
}

/// Writes a frame to `path`. The format follows the file extension;
/// a path without one is written as PNG.
pub fn save_frame(frame: &RgbaImage, path: &Path) -> Result<PathBuf, EncodeError> {
    let path = if path.extension().is_none() {
        path.with_extension("png")
    } else {
        path.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EncodeError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let format =
        ImageFormat::from_path(&path).map_err(|e| EncodeError::UnsupportedFormat(e.to_string()))?;

    // JPEG and friends have no alpha channel.
    let result = match format {
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Tiff | ImageFormat::Bmp => {
            frame.save_with_format(&path, format)
        }
        _ => image::DynamicImage::ImageRgba8(frame.clone())
            .to_rgb8()
            .save_with_format(&path, format),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    log::info!(
        "[OUTPUT] Saved {}x{} image to {}",
        frame.width(),
        frame.height(),
        path.display()
    );
    Ok(path)
}

/// Places the frame on the system clipboard as an image.
pub fn copy_to_clipboard(frame: &RgbaImage) -> Result<(), EncodeError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| EncodeError::Clipboard(e.to_string()))?;
    clipboard
        .set_image(arboard::ImageData {
            width: frame.width() as usize,
            height: frame.height() as usize,
            bytes: Cow::Borrowed(crate::stitch::pixel_bytes(frame)),
        })
        .map_err(|e| EncodeError::Clipboard(e.to_string()))?;
    log::info!(
        "[OUTPUT] Copied {}x{} image to clipboard",
        frame.width(),
        frame.height()
    );
    Ok(())
}

/// `<Pictures>/long-capture-<unix-seconds>.png`, or the working directory
/// when the platform has no pictures folder.
pub fn default_output_path() -> PathBuf {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(format!("long-capture-{}.png", stamp))
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Image encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}
