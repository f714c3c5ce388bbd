//! Compression: re-encode with a quality setting or towards a target size.

use super::codec::{encode, OutputFormat};
use crate::error::{ToolError, ToolResult};
use crate::state::data::{ProcessedImage, SourceImage};

/// Lowest quality the target-size search will go to
const MIN_SEARCH_QUALITY: u8 = 5;

/// Output choice for the compressor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressFormat {
    /// PNG when the source has transparency, JPEG otherwise
    Auto,
    Jpeg,
    Png,
}

impl CompressFormat {
    pub const ALL: [CompressFormat; 3] = [
        CompressFormat::Auto,
        CompressFormat::Jpeg,
        CompressFormat::Png,
    ];

    pub fn resolve(&self, source: &SourceImage) -> OutputFormat {
        match self {
            Self::Auto if source.has_alpha() => OutputFormat::Png,
            Self::Auto | Self::Jpeg => OutputFormat::Jpeg,
            Self::Png => OutputFormat::Png,
        }
    }
}

impl std::fmt::Display for CompressFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Auto => "Automatic",
            Self::Jpeg => "JPEG",
            Self::Png => "PNG (lossless)",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressOptions {
    /// Encoder quality, 1..=100 (ignored for PNG)
    pub quality: u8,
    /// Optional upper bound for the output, in KiB
    pub target_kb: Option<u32>,
    pub format: CompressFormat,
}

impl CompressOptions {
    pub fn validate(&self) -> ToolResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ToolError::invalid("Quality must be between 1 and 100"));
        }
        if self.target_kb == Some(0) {
            return Err(ToolError::invalid("Target size must be at least 1 KB"));
        }
        Ok(())
    }
}

pub fn compress(source: &SourceImage, options: &CompressOptions) -> ToolResult<ProcessedImage> {
    options.validate()?;

    let format = options.format.resolve(source);
    let blob = match options.target_kb {
        Some(kb) if format.is_lossy() => {
            search_quality(source, format, options.quality, kb as usize * 1024)?
        }
        _ => encode(&source.image, format, options.quality)?,
    };

    tracing::info!(
        "🗜️  Compressed {}: {} → {} bytes",
        source.name,
        source.size,
        blob.len()
    );

    Ok(ProcessedImage::new(
        source,
        blob,
        format.mime_type(),
        Some((source.width(), source.height())),
    ))
}

/// Binary search for the highest quality whose output fits `target` bytes.
///
/// Falls back to the smallest output when nothing fits.
fn search_quality(
    source: &SourceImage,
    format: OutputFormat,
    max_quality: u8,
    target: usize,
) -> ToolResult<Vec<u8>> {
    let mut low = MIN_SEARCH_QUALITY.min(max_quality);
    let mut high = max_quality;
    let mut fitting: Option<Vec<u8>> = None;
    let mut smallest: Option<Vec<u8>> = None;

    while low <= high {
        let quality = low + (high - low) / 2;
        let blob = encode(&source.image, format, quality)?;
        tracing::debug!("quality {} → {} bytes (target {})", quality, blob.len(), target);

        if blob.len() <= target {
            fitting = Some(blob);
            low = quality + 1;
        } else {
            if smallest.as_ref().map_or(true, |s| blob.len() < s.len()) {
                smallest = Some(blob);
            }
            if quality == 0 {
                break;
            }
            high = quality - 1;
        }
    }

    match fitting.or(smallest) {
        Some(blob) => Ok(blob),
        None => Err(ToolError::encode("quality search produced no output")),
    }
}
