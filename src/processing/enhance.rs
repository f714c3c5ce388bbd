//! Quality enhancement: upscale, sharpen, contrast and brightness.

use image::imageops::FilterType;

use super::codec::encode;
use super::histogram::Histogram;
use crate::error::{ToolError, ToolResult};
use crate::state::data::{ProcessedImage, SourceImage};

/// Output pixel budget (64 megapixels)
pub const MAX_OUTPUT_PIXELS: u64 = 64_000_000;

const ENHANCE_QUALITY: u8 = 95;

/// Unsharp-mask threshold; differences below this are left alone
const SHARPEN_THRESHOLD: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Upscale {
    #[default]
    X1,
    X2,
    X4,
}

impl Upscale {
    pub const ALL: [Upscale; 3] = [Upscale::X1, Upscale::X2, Upscale::X4];

    pub fn factor(&self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
        }
    }
}

impl std::fmt::Display for Upscale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

/// Enhancement settings
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceOptions {
    pub upscale: Upscale,
    /// Unsharp mask sigma (0.0 to 5.0, 0 = off)
    pub sharpen: f32,
    /// Contrast adjustment (-50.0 to +50.0)
    pub contrast: f32,
    /// Brightness adjustment (-50 to +50)
    pub brightness: i32,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            upscale: Upscale::X2,
            sharpen: 1.0,
            contrast: 10.0,
            brightness: 0,
        }
    }
}

impl EnhanceOptions {
    pub fn validate(&self) -> ToolResult<()> {
        if !(0.0..=5.0).contains(&self.sharpen) {
            return Err(ToolError::invalid("Sharpen must be between 0 and 5"));
        }
        if !(-50.0..=50.0).contains(&self.contrast) {
            return Err(ToolError::invalid("Contrast must be between -50 and 50"));
        }
        if !(-50..=50).contains(&self.brightness) {
            return Err(ToolError::invalid("Brightness must be between -50 and 50"));
        }
        Ok(())
    }

    /// Check if these settings would leave the image unchanged
    pub fn is_identity(&self) -> bool {
        self.upscale == Upscale::X1
            && self.sharpen == 0.0
            && self.contrast == 0.0
            && self.brightness == 0
    }
}

/// Output size for a source of `width` x `height`, or `TooLarge`
pub fn output_dimensions(width: u32, height: u32, upscale: Upscale) -> ToolResult<(u32, u32)> {
    let factor = upscale.factor() as u64;
    let (out_w, out_h) = (width as u64 * factor, height as u64 * factor);

    if out_w * out_h > MAX_OUTPUT_PIXELS {
        return Err(ToolError::TooLarge {
            width: out_w.min(u32::MAX as u64) as u32,
            height: out_h.min(u32::MAX as u64) as u32,
        });
    }

    Ok((out_w as u32, out_h as u32))
}

pub fn enhance(source: &SourceImage, options: &EnhanceOptions) -> ToolResult<ProcessedImage> {
    options.validate()?;
    let (width, height) = output_dimensions(source.width(), source.height(), options.upscale)?;

    let mut image = if options.upscale == Upscale::X1 {
        (*source.image).clone()
    } else {
        source.image.resize_exact(width, height, FilterType::CatmullRom)
    };

    if options.sharpen > 0.0 {
        image = image.unsharpen(options.sharpen, SHARPEN_THRESHOLD);
    }
    if options.contrast != 0.0 {
        image = image.adjust_contrast(options.contrast);
    }
    if options.brightness != 0 {
        image = image.brighten(options.brightness);
    }

    let histogram = Histogram::from_image(&image);
    let format = source.output_format();
    let blob = encode(&image, format, ENHANCE_QUALITY)?;

    tracing::info!(
        "⚡ Enhanced {}: {}x{} → {}x{}, mean red {:.0} → {:.0}",
        source.name,
        source.width(),
        source.height(),
        width,
        height,
        source.histogram.mean(0),
        histogram.mean(0)
    );

    Ok(
        ProcessedImage::new(source, blob, format.mime_type(), Some((width, height)))
            .with_histogram(histogram),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::codec::OutputFormat;
    use crate::processing::test_support::{decode_blob, gradient, source_from};

    #[test]
    fn test_upscale_multiplies_dimensions() {
        let source = source_from(&gradient(30, 20), OutputFormat::Png);
        let options = EnhanceOptions {
            upscale: Upscale::X4,
            ..EnhanceOptions::default()
        };

        let result = enhance(&source, &options).unwrap();
        let (_, image) = decode_blob(&result.blob);
        assert_eq!((image.width(), image.height()), (120, 80));
        assert!(result.histogram.is_some());
    }

    #[test]
    fn test_brightness_raises_mean() {
        let source = source_from(&gradient(32, 32), OutputFormat::Png);
        let options = EnhanceOptions {
            upscale: Upscale::X1,
            sharpen: 0.0,
            contrast: 0.0,
            brightness: 40,
        };

        let result = enhance(&source, &options).unwrap();
        let after = result.histogram.unwrap();
        assert!(after.mean(0) > source.histogram.mean(0));
    }

    #[test]
    fn test_identity_settings_keep_pixels() {
        let source = source_from(&gradient(16, 16), OutputFormat::Png);
        let options = EnhanceOptions {
            upscale: Upscale::X1,
            sharpen: 0.0,
            contrast: 0.0,
            brightness: 0,
        };
        assert!(options.is_identity());

        let result = enhance(&source, &options).unwrap();
        let (_, image) = decode_blob(&result.blob);
        assert_eq!(image.to_rgb8(), source.image.to_rgb8());
    }

    #[test]
    fn test_pixel_budget() {
        assert_eq!(output_dimensions(4000, 3000, Upscale::X2), Ok((8000, 6000)));
        assert!(matches!(
            output_dimensions(4000, 3000, Upscale::X4),
            Err(ToolError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_out_of_range_settings() {
        let options = EnhanceOptions {
            sharpen: 9.0,
            ..EnhanceOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
