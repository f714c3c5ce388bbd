//! RGB histogram chart, used for before/after comparison in the enhancer
use iced::widget::canvas::{self, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Theme};

use crate::processing::histogram::Histogram;

/// Canvas program drawing a borrowed histogram
pub struct HistogramChart<'a> {
    pub histogram: &'a Histogram,
}

impl<Message> canvas::Program<Message> for HistogramChart<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        // Normalize against the tallest bin across all channels
        let max_value = self.histogram.peak() as f32;
        if max_value < 1.0 {
            return vec![frame.into_geometry()];
        }

        let width = bounds.width;
        let height = bounds.height;
        let bar_width = width / 256.0;

        let colors = [
            Color::from_rgba(1.0, 0.0, 0.0, 0.5), // Red
            Color::from_rgba(0.0, 0.8, 0.0, 0.5), // Green
            Color::from_rgba(0.0, 0.0, 1.0, 0.5), // Blue
        ];

        for (channel_idx, channel_data) in self.histogram.data.iter().enumerate() {
            let mut path_builder = canvas::path::Builder::new();

            for (i, &count) in channel_data.iter().enumerate() {
                if count > 0 {
                    let bar_height = count as f32 / max_value * height;
                    let x = i as f32 * bar_width;

                    path_builder.move_to(Point::new(x, height));
                    path_builder.line_to(Point::new(x, height - bar_height));
                }
            }

            frame.stroke(
                &path_builder.build(),
                Stroke::default()
                    .with_color(colors[channel_idx])
                    .with_width(bar_width.max(1.0)),
            );
        }

        vec![frame.into_geometry()]
    }
}
