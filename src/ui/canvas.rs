use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::processing::crop::CropRect;
use crate::ui::theme::ACCENT;

/// Crop selection drawn over an image preview
///
/// The preview underneath is laid out with `ContentFit::Contain`, so the
/// overlay computes the same letterboxed rectangle to map between screen
/// and image pixels.
pub struct CropOverlay<Message> {
    /// Source size in pixels
    pub image_size: (u32, u32),
    /// Current selection in source pixels
    pub selection: CropRect,
    /// Message emitted while dragging a new selection
    pub on_select: fn(CropRect) -> Message,
}

impl<Message> Program<Message> for CropOverlay<Message> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let fit = fit_rect(self.image_size, bounds.size());
        let selection = to_screen_rect(self.selection, fit, self.image_size);

        // Dim everything outside the selection
        let shade = Color::from_rgba(0.0, 0.0, 0.0, 0.45);
        let sel_bottom = selection.y + selection.height;
        let fit_bottom = fit.y + fit.height;
        frame.fill_rectangle(fit.position(), Size::new(fit.width, selection.y - fit.y), shade);
        frame.fill_rectangle(
            Point::new(fit.x, sel_bottom),
            Size::new(fit.width, fit_bottom - sel_bottom),
            shade,
        );
        frame.fill_rectangle(
            Point::new(fit.x, selection.y),
            Size::new(selection.x - fit.x, selection.height),
            shade,
        );
        frame.fill_rectangle(
            Point::new(selection.x + selection.width, selection.y),
            Size::new(fit.x + fit.width - selection.x - selection.width, selection.height),
            shade,
        );

        frame.stroke(
            &Path::rectangle(selection.position(), selection.size()),
            Stroke::default().with_color(ACCENT).with_width(2.0),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let fit = fit_rect(self.image_size, bounds.size());

        match event {
            // Mouse button press - anchor a new selection
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    if fit.contains(position) {
                        state.anchor = Some(to_image_point(position, fit, self.image_size));
                        return (canvas::event::Status::Captured, None);
                    }
                }
            }

            // Mouse button release - stop dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.anchor.take().is_some() {
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse move - stretch the selection while dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let (Some(anchor), Some(position)) = (state.anchor, cursor.position_in(bounds)) {
                    let corner = to_image_point(position, fit, self.image_size);
                    let rect = CropRect::from_corners(anchor, corner);
                    return (canvas::event::Status::Captured, Some((self.on_select)(rect)));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        let fit = fit_rect(self.image_size, bounds.size());
        match cursor.position_in(bounds) {
            _ if state.anchor.is_some() => mouse::Interaction::Crosshair,
            Some(position) if fit.contains(position) => mouse::Interaction::Crosshair,
            _ => mouse::Interaction::default(),
        }
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Image-space point where the current drag started
    pub anchor: Option<(u32, u32)>,
}

/// Where an image of `image` pixels lands inside `bounds` when letterboxed
pub fn fit_rect(image: (u32, u32), bounds: Size) -> Rectangle {
    let (iw, ih) = (image.0.max(1) as f32, image.1.max(1) as f32);
    let scale = (bounds.width / iw).min(bounds.height / ih);
    let size = Size::new(iw * scale, ih * scale);

    Rectangle::new(
        Point::new((bounds.width - size.width) / 2.0, (bounds.height - size.height) / 2.0),
        size,
    )
}

/// Map a point inside `fit` to image pixel coordinates, clamped to the image
pub fn to_image_point(point: Point, fit: Rectangle, image: (u32, u32)) -> (u32, u32) {
    let scale = image.0 as f32 / fit.width.max(f32::EPSILON);
    let x = ((point.x - fit.x) * scale).round().clamp(0.0, image.0 as f32);
    let y = ((point.y - fit.y) * scale).round().clamp(0.0, image.1 as f32);
    (x as u32, y as u32)
}

/// Map an image-space selection to screen space
pub fn to_screen_rect(rect: CropRect, fit: Rectangle, image: (u32, u32)) -> Rectangle {
    let scale = fit.width / image.0.max(1) as f32;
    let rect = rect.clamp_to(image.0, image.1);

    Rectangle::new(
        Point::new(fit.x + rect.x as f32 * scale, fit.y + rect.y as f32 * scale),
        Size::new(rect.width as f32 * scale, rect.height as f32 * scale),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_letterboxes_wide_bounds() {
        let fit = fit_rect((100, 50), Size::new(400.0, 100.0));
        assert_eq!(fit, Rectangle::new(Point::new(100.0, 0.0), Size::new(200.0, 100.0)));
    }

    #[test]
    fn test_fit_pillarboxes_tall_bounds() {
        let fit = fit_rect((100, 100), Size::new(100.0, 300.0));
        assert_eq!(fit, Rectangle::new(Point::new(0.0, 100.0), Size::new(100.0, 100.0)));
    }

    #[test]
    fn test_point_mapping_round_trips_corners() {
        let fit = fit_rect((100, 50), Size::new(400.0, 100.0));
        assert_eq!(to_image_point(Point::new(100.0, 0.0), fit, (100, 50)), (0, 0));
        assert_eq!(to_image_point(Point::new(300.0, 100.0), fit, (100, 50)), (100, 50));
        // Outside the image clamps to the edge
        assert_eq!(to_image_point(Point::new(0.0, 0.0), fit, (100, 50)), (0, 0));
    }

    #[test]
    fn test_selection_to_screen() {
        let fit = fit_rect((100, 50), Size::new(400.0, 100.0));
        let rect = CropRect {
            x: 10,
            y: 5,
            width: 20,
            height: 10,
        };
        assert_eq!(
            to_screen_rect(rect, fit, (100, 50)),
            Rectangle::new(Point::new(120.0, 10.0), Size::new(40.0, 20.0))
        );
    }
}
