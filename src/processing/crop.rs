//! Cropping with free or fixed aspect ratios.

use super::codec::encode;
use crate::error::{ToolError, ToolResult};
use crate::state::data::{ProcessedImage, SourceImage};

const CROP_QUALITY: u8 = 95;

/// Selection in source pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// The whole image
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Rectangle spanned by two corner points, in any order
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: a.0.abs_diff(b.0),
            height: a.1.abs_diff(b.1),
        }
    }

    /// Intersection with a `width` x `height` image
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectPreset {
    #[default]
    Free,
    Square,
    FourThree,
    ThreeTwo,
    SixteenNine,
}

impl AspectPreset {
    pub const ALL: [AspectPreset; 5] = [
        AspectPreset::Free,
        AspectPreset::Square,
        AspectPreset::FourThree,
        AspectPreset::ThreeTwo,
        AspectPreset::SixteenNine,
    ];

    /// Width:height ratio, `None` for free selection
    pub fn ratio(&self) -> Option<(u32, u32)> {
        match self {
            Self::Free => None,
            Self::Square => Some((1, 1)),
            Self::FourThree => Some((4, 3)),
            Self::ThreeTwo => Some((3, 2)),
            Self::SixteenNine => Some((16, 9)),
        }
    }

    /// Largest centered rectangle of this ratio inside the image
    pub fn centered_rect(&self, width: u32, height: u32) -> CropRect {
        let Some((rw, rh)) = self.ratio() else {
            return CropRect::full(width, height);
        };

        let (w, h) = (width as u64, height as u64);
        let (crop_w, crop_h) = if w * rh as u64 >= h * rw as u64 {
            (h * rw as u64 / rh as u64, h)
        } else {
            (w, w * rh as u64 / rw as u64)
        };

        CropRect {
            x: ((w - crop_w) / 2) as u32,
            y: ((h - crop_h) / 2) as u32,
            width: crop_w as u32,
            height: crop_h as u32,
        }
    }

    /// Force a dragged selection to this ratio, keeping its origin and width
    pub fn constrain(&self, rect: CropRect, width: u32, height: u32) -> CropRect {
        let Some((rw, rh)) = self.ratio() else {
            return rect.clamp_to(width, height);
        };

        let rect = rect.clamp_to(width, height);
        let max_h = (height - rect.y) as u64;
        let mut crop_w = rect.width as u64;
        let mut crop_h = crop_w * rh as u64 / rw as u64;
        if crop_h > max_h {
            crop_h = max_h;
            crop_w = crop_h * rw as u64 / rh as u64;
        }

        CropRect {
            width: crop_w as u32,
            height: crop_h as u32,
            ..rect
        }
    }
}

impl std::fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Free => "Free",
            Self::Square => "1:1",
            Self::FourThree => "4:3",
            Self::ThreeTwo => "3:2",
            Self::SixteenNine => "16:9",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropOptions {
    pub rect: CropRect,
    pub preset: AspectPreset,
}

pub fn crop(source: &SourceImage, options: &CropOptions) -> ToolResult<ProcessedImage> {
    let rect = options.rect.clamp_to(source.width(), source.height());
    if rect.is_empty() {
        return Err(ToolError::EmptyCrop);
    }

    let cropped = source.image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    let format = source.output_format();
    let blob = encode(&cropped, format, CROP_QUALITY)?;

    tracing::info!(
        "✂️  Cropped {} to {}x{} at ({}, {})",
        source.name,
        rect.width,
        rect.height,
        rect.x,
        rect.y
    );

    Ok(ProcessedImage::new(
        source,
        blob,
        format.mime_type(),
        Some((rect.width, rect.height)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::codec::OutputFormat;
    use crate::processing::test_support::{decode_blob, gradient, source_from};

    #[test]
    fn test_from_corners_any_order() {
        let rect = CropRect::from_corners((30, 5), (10, 25));
        assert_eq!(
            rect,
            CropRect {
                x: 10,
                y: 5,
                width: 20,
                height: 20
            }
        );
    }

    #[test]
    fn test_clamp_to_image() {
        let rect = CropRect {
            x: 80,
            y: 50,
            width: 100,
            height: 100,
        };
        assert_eq!(
            rect.clamp_to(100, 60),
            CropRect {
                x: 80,
                y: 50,
                width: 20,
                height: 10
            }
        );
    }

    #[test]
    fn test_clamp_outside_is_empty() {
        let rect = CropRect {
            x: 500,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(rect.clamp_to(100, 100).is_empty());
    }

    #[test]
    fn test_centered_presets() {
        assert_eq!(
            AspectPreset::Square.centered_rect(400, 300),
            CropRect {
                x: 50,
                y: 0,
                width: 300,
                height: 300
            }
        );
        assert_eq!(
            AspectPreset::SixteenNine.centered_rect(160, 160),
            CropRect {
                x: 0,
                y: 35,
                width: 160,
                height: 90
            }
        );
        assert_eq!(AspectPreset::Free.centered_rect(7, 9), CropRect::full(7, 9));
    }

    #[test]
    fn test_constrain_keeps_ratio_inside_image() {
        let dragged = CropRect {
            x: 0,
            y: 80,
            width: 90,
            height: 10,
        };
        let rect = AspectPreset::Square.constrain(dragged, 100, 100);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.width, 20);
    }

    #[test]
    fn test_crop_output_dimensions() {
        let source = source_from(&gradient(50, 40), OutputFormat::Png);
        let options = CropOptions {
            rect: CropRect {
                x: 10,
                y: 10,
                width: 20,
                height: 15,
            },
            preset: AspectPreset::Free,
        };

        let result = crop(&source, &options).unwrap();
        let (_, image) = decode_blob(&result.blob);
        assert_eq!((image.width(), image.height()), (20, 15));

        // Pixels come from the selected region
        let expected = source.image.crop_imm(10, 10, 20, 15).to_rgb8();
        assert_eq!(image.to_rgb8().get_pixel(0, 0), expected.get_pixel(0, 0));
    }

    #[test]
    fn test_empty_selection_rejected() {
        let source = source_from(&gradient(10, 10), OutputFormat::Png);
        let options = CropOptions {
            rect: CropRect::default(),
            preset: AspectPreset::Free,
        };
        assert_eq!(crop(&source, &options).unwrap_err(), ToolError::EmptyCrop);
    }
}
