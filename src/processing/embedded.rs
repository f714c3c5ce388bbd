//! Embedded JPEG extraction for camera RAW files
//!
//! Most RAW formats carry a full-size JPEG preview next to the sensor data.
//! We cannot decode sensor data, so RAW inputs are read through that preview.

use image::ImageFormat;

/// RAW extensions we try to read through their embedded preview
pub const RAW_EXTENSIONS: [&str; 16] = [
    "nef", "dng", "cr2", "cr3", "arw", "raf", "orf", "rw2",
    "pef", "srw", "erf", "kdc", "dcr", "mos", "raw", "rwl",
];

/// JPEG Start Of Image (SOI) followed by the first marker prefix
const JPEG_START: [u8; 3] = [0xFF, 0xD8, 0xFF];

// Marker codes that follow an 0xFF byte
const TEM: u8 = 0x01;
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;

/// Check whether a file extension names a RAW format
pub fn is_raw_extension(extension: &str) -> bool {
    let extension = extension.to_lowercase();
    RAW_EXTENSIONS.contains(&extension.as_str())
}

/// Find the largest embedded JPEG that actually decodes
pub fn extract_largest_jpeg(data: &[u8]) -> Option<Vec<u8>> {
    let mut candidates = Vec::new();

    let mut pos = 0;
    while pos + JPEG_START.len() <= data.len() {
        if !data[pos..].starts_with(&JPEG_START) {
            pos += 1;
            continue;
        }

        // Thumbnails are often nested inside the preview's EXIF block, so keep
        // scanning from the next byte instead of jumping past this candidate
        if let Some(end) = jpeg_end(data, pos) {
            candidates.push(pos..end);
        }
        pos += 1;
    }

    // Try JPEGs from largest to smallest
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));

    candidates.into_iter().find_map(|range| {
        let jpeg = &data[range];
        image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)
            .ok()
            .map(|_| jpeg.to_vec())
    })
}

/// End (exclusive) of the JPEG whose SOI is at `start`.
///
/// Marker segments are skipped by their length field, so an EOI inside an
/// APPn payload does not end the image. Inside entropy-coded data only a
/// marker other than stuffing (`FF 00`), a restart or a fill byte counts.
fn jpeg_end(data: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + 2;

    loop {
        while *data.get(pos)? == 0xFF && *data.get(pos + 1)? == 0xFF {
            pos += 1;
        }
        if *data.get(pos)? != 0xFF {
            return None;
        }

        let marker = *data.get(pos + 1)?;
        pos += 2;
        match marker {
            EOI => return Some(pos),
            TEM | RST0..=RST7 => continue,
            _ => {}
        }

        let length = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]) as usize;
        if length < 2 || pos + length > data.len() {
            return None;
        }
        pos += length;
        if marker != SOS {
            continue;
        }

        // Scan data runs until the next real marker
        loop {
            pos += data.get(pos..)?.iter().position(|&b| b == 0xFF)?;
            match *data.get(pos + 1)? {
                0x00 | RST0..=RST7 => pos += 2,
                0xFF => pos += 1,
                _ => break,
            }
        }
    }
}
