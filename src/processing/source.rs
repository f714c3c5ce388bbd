//! Loading user-picked files into `SourceImage`s.

use iced::widget::image::Handle;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::embedded;
use super::histogram::Histogram;
use super::run_blocking;
use crate::error::{ToolError, ToolResult};
use crate::state::data::SourceImage;

/// Largest input we accept
pub const MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Extensions offered in the open dialog
pub const OPEN_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff", "ico",
];

/// Read and decode a file without blocking the UI thread
pub async fn open(path: PathBuf) -> ToolResult<SourceImage> {
    let bytes = tokio::fs::read(&path).await?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    tracing::info!("📂 Loading {} ({} bytes)", name, bytes.len());

    run_blocking(move || decode(&name, Some(path), bytes)).await
}

/// Decode in-memory file contents.
///
/// RAW files are read through their largest embedded JPEG preview.
pub fn decode(name: &str, path: Option<PathBuf>, bytes: Vec<u8>) -> ToolResult<SourceImage> {
    let size = bytes.len() as u64;
    if size == 0 {
        return Err(ToolError::EmptyInput);
    }
    if size > MAX_INPUT_BYTES {
        return Err(ToolError::InputTooLarge {
            size,
            limit: MAX_INPUT_BYTES,
        });
    }

    let (format, pixel_bytes, from_raw) = match image::guess_format(&bytes) {
        Ok(format) => (format, None, false),
        Err(_) if has_raw_extension(name) => {
            let preview = embedded::extract_largest_jpeg(&bytes).ok_or_else(|| {
                ToolError::Decode(format!("No embedded preview found in {}", name))
            })?;
            tracing::info!("🔍 Using {}KB embedded preview of {}", preview.len() / 1024, name);
            (ImageFormat::Jpeg, Some(preview), true)
        }
        Err(_) => return Err(ToolError::UnsupportedFormat(name.to_string())),
    };

    let decodable = pixel_bytes.as_deref().unwrap_or(&bytes[..]);
    let image = image::load_from_memory_with_format(decodable, format).map_err(ToolError::decode)?;
    let histogram = Histogram::from_image(&image);
    let preview = Handle::from_bytes(decodable.to_vec());

    tracing::debug!(
        "decoded {} as {:?}: {}x{}",
        name,
        format,
        image.width(),
        image.height()
    );

    Ok(SourceImage {
        name: name.to_string(),
        path,
        bytes: Arc::new(bytes),
        size,
        format,
        from_raw,
        image: Arc::new(image),
        preview,
        histogram: Arc::new(histogram),
    })
}

fn has_raw_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| embedded::is_raw_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::test_support::{jpeg_bytes, png_bytes};

    #[test]
    fn test_decode_png() {
        let source = decode("a.png", None, png_bytes(20, 10)).unwrap();
        assert_eq!(source.format, ImageFormat::Png);
        assert_eq!((source.width(), source.height()), (20, 10));
        assert_eq!(source.size, source.bytes.len() as u64);
        assert_eq!(source.mime_type(), "image/png");
        assert!(!source.from_raw);
    }

    #[test]
    fn test_format_comes_from_content_not_name() {
        let source = decode("mislabeled.png", None, jpeg_bytes(8, 8)).unwrap();
        assert_eq!(source.format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(decode("a.png", None, Vec::new()).unwrap_err(), ToolError::EmptyInput);
    }

    #[test]
    fn test_unknown_bytes_rejected() {
        let err = decode("notes.txt", None, b"hello world".to_vec()).unwrap_err();
        assert_eq!(err, ToolError::UnsupportedFormat("notes.txt".to_string()));
    }

    #[test]
    fn test_raw_reads_embedded_preview() {
        let mut raw = b"XRAWHEADER".to_vec();
        raw.extend_from_slice(&jpeg_bytes(32, 24));
        raw.extend_from_slice(&[0x11; 64]);

        let source = decode("DSC_0001.NEF", None, raw).unwrap();
        assert!(source.from_raw);
        assert_eq!(source.format, ImageFormat::Jpeg);
        assert_eq!((source.width(), source.height()), (32, 24));
    }

    #[test]
    fn test_raw_without_preview_fails_to_decode() {
        let err = decode("DSC_0002.CR2", None, vec![0x42; 128]).unwrap_err();
        assert!(matches!(err, ToolError::Decode(_)));
    }

    #[tokio::test]
    async fn test_open_missing_file_is_io_error() {
        let result = open(PathBuf::from("/nonexistent/pixelforge/missing.png")).await;
        assert!(matches!(result, Err(ToolError::Io(_))));
    }

    #[tokio::test]
    async fn test_open_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("pixelforge-{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, png_bytes(6, 4)).await.unwrap();

        let source = open(path.clone()).await.unwrap();
        assert_eq!(source.path.as_deref(), Some(path.as_path()));
        assert_eq!((source.width(), source.height()), (6, 4));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
