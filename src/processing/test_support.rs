//! Synthetic images for tests.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use super::codec::{encode, OutputFormat};
use super::source;
use crate::state::data::SourceImage;

/// Smooth RGB gradient
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    }))
}

/// Deterministic pseudo-random pixels, hard to compress
pub fn noise(width: u32, height: u32) -> DynamicImage {
    let mut state: u32 = 0x9E37_79B9;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgb([next(), next(), next()])
    }))
}

/// Half-transparent RGBA square
pub fn translucent(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([40, 80, 120, 128])))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), OutputFormat::Png, 100).unwrap()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), OutputFormat::Jpeg, 90).unwrap()
}

/// Encode `image` as `format` and load it back as a source
pub fn source_from(image: &DynamicImage, format: OutputFormat) -> SourceImage {
    let bytes = encode(image, format, 90).unwrap();
    let name = format!("sample.{}", format.extension());
    source::decode(&name, None, bytes).unwrap()
}

/// Decode a result blob to check what the tool produced
pub fn decode_blob(blob: &[u8]) -> (ImageFormat, DynamicImage) {
    let format = image::guess_format(blob).unwrap();
    (format, image::load_from_memory_with_format(blob, format).unwrap())
}
