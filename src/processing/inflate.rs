//! File size increase without touching the pixels.
//!
//! JPEG files are padded with comment segments right after SOI so the file
//! stays well-formed; everything else gets trailing zero bytes, which
//! decoders stop reading before.

use image::ImageFormat;

use crate::error::{ToolError, ToolResult};
use crate::state::data::{ProcessedImage, SourceImage};

/// Largest file we will produce
pub const MAX_TARGET_BYTES: u64 = 100 * 1024 * 1024;

/// Marker (2) + length field (2)
const COM_HEADER: usize = 4;
/// The length field counts itself, so a segment holds at most 65533 bytes
const COM_MAX_PAYLOAD: usize = 65_533;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeUnit {
    #[default]
    Kb,
    Mb,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 2] = [SizeUnit::Kb, SizeUnit::Mb];

    pub fn bytes(&self) -> u64 {
        match self {
            Self::Kb => 1024,
            Self::Mb => 1024 * 1024,
        }
    }
}

impl std::fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Kb => "KB",
            Self::Mb => "MB",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InflateOptions {
    pub amount: u32,
    pub unit: SizeUnit,
}

impl InflateOptions {
    pub fn target_bytes(&self) -> u64 {
        self.amount as u64 * self.unit.bytes()
    }
}

pub fn inflate(source: &SourceImage, options: &InflateOptions) -> ToolResult<ProcessedImage> {
    let target = options.target_bytes();
    let is_jpeg = !source.from_raw && source.format == ImageFormat::Jpeg;
    let blob = pad_to(&source.bytes, is_jpeg, target)?;

    // RAW inputs keep their container, which has no image MIME type
    let mime_type = if source.from_raw {
        "application/octet-stream"
    } else {
        source.mime_type()
    };

    tracing::info!("➕ Padded {} from {} to {} bytes", source.name, source.size, blob.len());

    Ok(ProcessedImage::new(
        source,
        blob,
        mime_type,
        Some((source.width(), source.height())),
    ))
}

/// Check that a file of `current` bytes can be grown to `target` bytes
pub fn check_target(current: u64, target: u64) -> ToolResult<()> {
    if target <= current {
        return Err(ToolError::TargetTooSmall { current, target });
    }
    if target > MAX_TARGET_BYTES {
        return Err(ToolError::TargetTooLarge {
            target,
            limit: MAX_TARGET_BYTES,
        });
    }
    Ok(())
}

/// Grow `bytes` to exactly `target` bytes
pub fn pad_to(bytes: &[u8], is_jpeg: bool, target: u64) -> ToolResult<Vec<u8>> {
    let current = bytes.len() as u64;
    check_target(current, target)?;

    let mut padding = (target - current) as usize;
    let mut output = Vec::with_capacity(target as usize);

    if is_jpeg && bytes.starts_with(&[0xFF, 0xD8]) {
        output.extend_from_slice(&bytes[..2]);

        while padding >= COM_HEADER {
            let payload = (padding - COM_HEADER).min(COM_MAX_PAYLOAD);
            let length = (payload + 2) as u16;
            output.extend_from_slice(&[0xFF, 0xFE]);
            output.extend_from_slice(&length.to_be_bytes());
            output.resize(output.len() + payload, 0);
            padding -= payload + COM_HEADER;
        }

        output.extend_from_slice(&bytes[2..]);
    } else {
        output.extend_from_slice(bytes);
    }

    // Whatever is too small for a segment goes at the end
    output.resize(target as usize, 0);
    Ok(output)
}
