//! RGB histogram of decoded pixels.

use image::DynamicImage;

/// Per-channel counts: [R[256], G[256], B[256]]
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub data: [[u32; 256]; 3],
}

impl Histogram {
    pub fn from_image(image: &DynamicImage) -> Self {
        let mut data = [[0u32; 256]; 3];

        // Sample large images on a grid; the shape is what matters for display
        let pixel_count = image.width() as u64 * image.height() as u64;
        let step = ((pixel_count / 1_000_000) as f64).sqrt().ceil().max(1.0) as u32;

        let rgb = image.to_rgb8();
        for y in (0..rgb.height()).step_by(step as usize) {
            for x in (0..rgb.width()).step_by(step as usize) {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                data[0][r as usize] += 1;
                data[1][g as usize] += 1;
                data[2][b as usize] += 1;
            }
        }

        Self { data }
    }

    /// Highest bin across all channels
    pub fn peak(&self) -> u32 {
        self.data
            .iter()
            .flat_map(|channel| channel.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Mean value of a channel (0 = red, 1 = green, 2 = blue)
    pub fn mean(&self, channel: usize) -> f32 {
        let bins = &self.data[channel];
        let total: u64 = bins.iter().map(|&count| count as u64).sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: u64 = bins
            .iter()
            .enumerate()
            .map(|(value, &count)| value as u64 * count as u64)
            .sum();
        weighted as f32 / total as f32
    }
}
