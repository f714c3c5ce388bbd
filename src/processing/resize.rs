//! Resizing by pixel box or percentage.

use image::imageops::FilterType;

use super::codec::encode;
use crate::error::{ToolError, ToolResult};
use crate::state::data::{ProcessedImage, SourceImage};

/// Longest side we will produce
pub const MAX_SIDE: u32 = 16_384;

/// Largest scale factor, in percent
pub const MAX_PERCENT: u32 = 1000;

/// JPEG quality used when the source is re-encoded as JPEG
const RESAMPLE_QUALITY: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Target box in pixels; 0 means "derive from the other side"
    Pixels { width: u32, height: u32 },
    /// Scale both sides by a percentage
    Percent(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    Lanczos3,
    Triangle,
    Nearest,
}

impl ResizeFilter {
    pub const ALL: [ResizeFilter; 3] = [
        ResizeFilter::Lanczos3,
        ResizeFilter::Triangle,
        ResizeFilter::Nearest,
    ];

    pub fn filter_type(&self) -> FilterType {
        match self {
            Self::Lanczos3 => FilterType::Lanczos3,
            Self::Triangle => FilterType::Triangle,
            Self::Nearest => FilterType::Nearest,
        }
    }
}

impl std::fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Lanczos3 => "Lanczos (sharp)",
            Self::Triangle => "Bilinear (smooth)",
            Self::Nearest => "Nearest (pixel art)",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeOptions {
    pub mode: ResizeMode,
    pub keep_aspect: bool,
    pub filter: ResizeFilter,
}

/// Compute the output size for an image of `width` x `height`
pub fn target_dimensions(
    width: u32,
    height: u32,
    options: &ResizeOptions,
) -> ToolResult<(u32, u32)> {
    let (w, h) = (width as f64, height as f64);

    let (out_w, out_h) = match options.mode {
        ResizeMode::Percent(percent) => {
            if !(1..=MAX_PERCENT).contains(&percent) {
                return Err(ToolError::InvalidOptions(format!(
                    "Percentage must be between 1 and {}",
                    MAX_PERCENT
                )));
            }
            let scale = percent as f64 / 100.0;
            (scaled(w, scale), scaled(h, scale))
        }
        ResizeMode::Pixels { width: 0, height: 0 } => {
            return Err(ToolError::invalid("Enter a width or a height"));
        }
        ResizeMode::Pixels { width: tw, height: th } if options.keep_aspect => {
            let scale = match (tw, th) {
                (0, th) => th as f64 / h,
                (tw, 0) => tw as f64 / w,
                (tw, th) => (tw as f64 / w).min(th as f64 / h),
            };
            (scaled(w, scale), scaled(h, scale))
        }
        ResizeMode::Pixels { width: tw, height: th } => {
            let out_w = if tw == 0 { width } else { tw };
            let out_h = if th == 0 { height } else { th };
            (out_w, out_h)
        }
    };

    if out_w > MAX_SIDE || out_h > MAX_SIDE {
        return Err(ToolError::InvalidOptions(format!(
            "Output would be {} × {} px; sides are limited to {} px",
            out_w, out_h, MAX_SIDE
        )));
    }

    Ok((out_w, out_h))
}

fn scaled(side: f64, scale: f64) -> u32 {
    (side * scale).round().clamp(1.0, u32::MAX as f64) as u32
}

pub fn resize(source: &SourceImage, options: &ResizeOptions) -> ToolResult<ProcessedImage> {
    let (width, height) = target_dimensions(source.width(), source.height(), options)?;

    let resized = source
        .image
        .resize_exact(width, height, options.filter.filter_type());
    let format = source.output_format();
    let blob = encode(&resized, format, RESAMPLE_QUALITY)?;

    tracing::info!(
        "📐 Resized {} from {}x{} to {}x{}",
        source.name,
        source.width(),
        source.height(),
        width,
        height
    );

    Ok(ProcessedImage::new(source, blob, format.mime_type(), Some((width, height))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::codec::OutputFormat;
    use crate::processing::test_support::{decode_blob, gradient, source_from};

    fn pixels(width: u32, height: u32, keep_aspect: bool) -> ResizeOptions {
        ResizeOptions {
            mode: ResizeMode::Pixels { width, height },
            keep_aspect,
            filter: ResizeFilter::Lanczos3,
        }
    }

    fn percent(percent: u32) -> ResizeOptions {
        ResizeOptions {
            mode: ResizeMode::Percent(percent),
            keep_aspect: true,
            filter: ResizeFilter::Triangle,
        }
    }

    #[test]
    fn test_percent_scales_both_sides() {
        assert_eq!(target_dimensions(400, 300, &percent(50)), Ok((200, 150)));
        assert_eq!(target_dimensions(400, 300, &percent(250)), Ok((1000, 750)));
    }

    #[test]
    fn test_percent_never_collapses_to_zero() {
        assert_eq!(target_dimensions(3, 3, &percent(1)), Ok((1, 1)));
    }

    #[test]
    fn test_percent_out_of_range() {
        assert!(target_dimensions(10, 10, &percent(0)).is_err());
        assert!(target_dimensions(10, 10, &percent(1001)).is_err());
    }

    #[test]
    fn test_keep_aspect_derives_missing_side() {
        assert_eq!(target_dimensions(400, 300, &pixels(200, 0, true)), Ok((200, 150)));
        assert_eq!(target_dimensions(400, 300, &pixels(0, 600, true)), Ok((800, 600)));
    }

    #[test]
    fn test_keep_aspect_fits_inside_box() {
        assert_eq!(target_dimensions(400, 300, &pixels(100, 100, true)), Ok((100, 75)));
    }

    #[test]
    fn test_free_aspect_uses_exact_box() {
        assert_eq!(target_dimensions(400, 300, &pixels(50, 80, false)), Ok((50, 80)));
        assert_eq!(target_dimensions(400, 300, &pixels(50, 0, false)), Ok((50, 300)));
    }

    #[test]
    fn test_empty_box_rejected() {
        let err = target_dimensions(400, 300, &pixels(0, 0, true)).unwrap_err();
        assert!(matches!(err, ToolError::InvalidOptions(_)));
    }

    #[test]
    fn test_oversized_output_rejected() {
        let err = target_dimensions(10_000, 10_000, &percent(200)).unwrap_err();
        assert_eq!(
            err,
            ToolError::invalid("Output would be 20000 × 20000 px; sides are limited to 16384 px")
        );
        assert!(target_dimensions(1_000, 1_000, &percent(1000)).is_ok());
    }

    #[test]
    fn test_resize_keeps_source_format() {
        let source = source_from(&gradient(40, 20), OutputFormat::Png);
        let result = resize(&source, &pixels(20, 0, true)).unwrap();

        let (format, image) = decode_blob(&result.blob);
        assert_eq!(format, image::ImageFormat::Png);
        assert_eq!((image.width(), image.height()), (20, 10));
        assert_eq!((result.width, result.height), (Some(20), Some(10)));
    }
}
