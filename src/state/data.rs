//! Shared data structures for the image tools
//!
//! These structs represent the data that flows between the processing
//! layer and the UI layer: a loaded input and a processed result.

use iced::widget::image::Handle;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::processing::codec::OutputFormat;
use crate::processing::histogram::Histogram;

/// An image picked by the user and decoded into memory
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Filename only (e.g., "IMG_0001.jpg")
    pub name: String,
    /// Where the file came from, if it came from disk
    pub path: Option<PathBuf>,
    /// Original file bytes, untouched
    pub bytes: Arc<Vec<u8>>,
    /// Original file size in bytes
    pub size: u64,
    /// Format of the decoded pixels (JPEG for RAW files)
    pub format: ImageFormat,
    /// True when the pixels come from a RAW file's embedded preview
    pub from_raw: bool,
    /// Decoded pixels
    pub image: Arc<DynamicImage>,
    /// Display handle for the preview widget
    pub preview: Handle,
    /// RGB histogram of the decoded pixels
    pub histogram: Arc<Histogram>,
}

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Encodable format matching the input
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::for_source(self.format)
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }
}

/// The result of running a tool on a `SourceImage`
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Unique id of this result
    pub id: String,
    /// Name of the file it was made from
    pub original_name: String,
    /// Size of the input in bytes
    pub original_size: u64,
    /// Size of `blob` in bytes
    pub new_size: u64,
    /// Display handle for the result (what a browser would call an object URL)
    pub preview: Handle,
    /// Encoded output
    pub blob: Arc<Vec<u8>>,
    /// MIME type of `blob`
    pub mime_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// RGB histogram of the output, for tools that show one
    pub histogram: Option<Arc<Histogram>>,
}

impl ProcessedImage {
    /// Wrap encoded bytes produced from `source`
    pub fn new(
        source: &SourceImage,
        blob: Vec<u8>,
        mime_type: impl Into<String>,
        dimensions: Option<(u32, u32)>,
    ) -> Self {
        let preview = Handle::from_bytes(blob.clone());

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            original_name: source.name.clone(),
            original_size: source.size,
            new_size: blob.len() as u64,
            preview,
            blob: Arc::new(blob),
            mime_type: mime_type.into(),
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
            histogram: None,
        }
    }

    pub fn with_histogram(mut self, histogram: Histogram) -> Self {
        self.histogram = Some(Arc::new(histogram));
        self
    }

    /// Signed size change relative to the original, in percent
    pub fn size_change_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.new_size as f64 - self.original_size as f64) / self.original_size as f64 * 100.0
    }

    /// `<stem>-<suffix>.<ext>` with the extension taken from the MIME type
    pub fn suggested_file_name(&self, suffix: &str) -> String {
        let original = Path::new(&self.original_name);
        let stem = original
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());

        let extension = OutputFormat::ALL
            .into_iter()
            .find(|format| format.mime_type() == self.mime_type)
            .map(|format| format.extension().to_string())
            .or_else(|| {
                original
                    .extension()
                    .map(|e| e.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| "img".to_string());

        format!("{}-{}.{}", stem, suffix, extension)
    }
}

/// Human readable byte count ("512 B", "1.5 KB", "2.25 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let value = bytes as f64;
    if value >= MB {
        format!("{:.2} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{} B", bytes)
    }
}
