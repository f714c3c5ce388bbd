//! Format conversion.

use super::codec::{encode, OutputFormat};
use crate::error::{ToolError, ToolResult};
use crate::state::data::{ProcessedImage, SourceImage};

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    /// Only used for lossy targets
    pub quality: u8,
}

pub fn convert(source: &SourceImage, options: &ConvertOptions) -> ToolResult<ProcessedImage> {
    if !(1..=100).contains(&options.quality) {
        return Err(ToolError::invalid("Quality must be between 1 and 100"));
    }

    let blob = encode(&source.image, options.format, options.quality)?;

    tracing::info!(
        "🔁 Converted {} ({:?}) to {}",
        source.name,
        source.format,
        options.format
    );

    Ok(ProcessedImage::new(
        source,
        blob,
        options.format.mime_type(),
        Some((source.width(), source.height())),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::test_support::{decode_blob, gradient, source_from, translucent};

    #[test]
    fn test_convert_to_every_format() {
        let source = source_from(&gradient(24, 12), OutputFormat::Png);

        for format in OutputFormat::ALL {
            let result = convert(&source, &ConvertOptions { format, quality: 85 }).unwrap();
            let (detected, image) = decode_blob(&result.blob);

            assert_eq!(detected, format.image_format());
            assert_eq!(result.mime_type, format.mime_type());
            assert_eq!((image.width(), image.height()), (24, 12));
        }
    }

    #[test]
    fn test_jpeg_target_drops_alpha() {
        let source = source_from(&translucent(8, 8), OutputFormat::Png);
        let result = convert(
            &source,
            &ConvertOptions {
                format: OutputFormat::Jpeg,
                quality: 90,
            },
        )
        .unwrap();

        let (_, image) = decode_blob(&result.blob);
        assert!(!image.color().has_alpha());
    }

    #[test]
    fn test_png_target_keeps_alpha() {
        let source = source_from(&translucent(8, 8), OutputFormat::Png);
        let result = convert(
            &source,
            &ConvertOptions {
                format: OutputFormat::Webp,
                quality: 90,
            },
        )
        .unwrap();

        let (_, image) = decode_blob(&result.blob);
        assert!(image.color().has_alpha());
    }
}
