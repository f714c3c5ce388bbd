//! Output formats and encoding.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

use crate::error::{ToolError, ToolResult};

/// Formats the tools can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Bmp,
    Gif,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Webp,
        OutputFormat::Bmp,
        OutputFormat::Gif,
        OutputFormat::Tiff,
    ];

    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Tiff => ImageFormat::Tiff,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Webp => "WebP",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Tiff => "TIFF",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
        }
    }

    /// Whether transparency survives encoding
    pub fn keeps_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// Whether the quality setting has any effect
    pub fn is_lossy(&self) -> bool {
        matches!(self, Self::Jpeg)
    }

    /// Encodable counterpart of a decoded format, PNG when we cannot write it
    pub fn for_source(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => Self::Jpeg,
            ImageFormat::WebP => Self::Webp,
            ImageFormat::Bmp => Self::Bmp,
            ImageFormat::Gif => Self::Gif,
            ImageFormat::Tiff => Self::Tiff,
            _ => Self::Png,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Encode `image` as `format`.
///
/// `quality` only matters for JPEG and is clamped to 1..=100.
pub fn encode(image: &DynamicImage, format: OutputFormat, quality: u8) -> ToolResult<Vec<u8>> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(flatten_onto_white(image));
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
            rgb.write_with_encoder(encoder).map_err(ToolError::encode)?;
        }
        OutputFormat::Png => {
            let prepared = prepare_pixels(image, format);
            let encoder = PngEncoder::new_with_quality(
                &mut buffer,
                CompressionType::Best,
                PngFilter::Adaptive,
            );
            prepared.write_with_encoder(encoder).map_err(ToolError::encode)?;
        }
        _ => {
            let prepared = prepare_pixels(image, format);
            prepared
                .write_to(&mut Cursor::new(&mut buffer), format.image_format())
                .map_err(ToolError::encode)?;
        }
    }

    Ok(buffer)
}

/// Normalise to 8-bit RGB or RGBA, the layouts every encoder accepts
fn prepare_pixels(image: &DynamicImage, format: OutputFormat) -> DynamicImage {
    let wants_alpha = format == OutputFormat::Gif || image.color().has_alpha();

    if wants_alpha && format.keeps_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(flatten_onto_white(image))
    }
}

/// Composite over a white background, dropping the alpha channel
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn transparent_square() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])))
    }

    #[test]
    fn test_flatten_transparent_becomes_white() {
        let flat = flatten_onto_white(&transparent_square());
        assert_eq!(flat.get_pixel(3, 3).0, [255, 255, 255]);
    }

    #[test]
    fn test_flatten_opaque_is_unchanged() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255])));
        assert_eq!(flatten_onto_white(&image).get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_every_format_encodes_and_is_detected() {
        let image = transparent_square();
        for format in OutputFormat::ALL {
            let bytes = encode(&image, format, 80).unwrap();
            assert!(!bytes.is_empty(), "{} produced no bytes", format);
            assert_eq!(image::guess_format(&bytes).unwrap(), format.image_format());
        }
    }

    #[test]
    fn test_lower_quality_gives_smaller_jpeg() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(128, 128, |x, y| {
            Rgb([(x * 2) as u8, (y * 2) as u8, ((x * y) % 256) as u8])
        }));
        let high = encode(&image, OutputFormat::Jpeg, 95).unwrap();
        let low = encode(&image, OutputFormat::Jpeg, 10).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_source_mapping_falls_back_to_png() {
        assert_eq!(OutputFormat::for_source(ImageFormat::Jpeg), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::for_source(ImageFormat::Ico), OutputFormat::Png);
    }
}
