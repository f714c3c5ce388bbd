use iced::widget::{
    button, canvas, column, pick_list, row, stack, text, text_input, Column, Image,
};
use iced::{Alignment, ContentFit, Element, Length};

use super::{Tool, PREVIEW_HEIGHT};
use crate::config::Settings;
use crate::error::{ToolError, ToolResult};
use crate::processing::crop::{crop, AspectPreset, CropOptions, CropRect};
use crate::state::data::{ProcessedImage, SourceImage};
use crate::state::tool::ToolType;
use crate::ui::canvas::CropOverlay;
use crate::ui::theme;

#[derive(Debug, Clone)]
pub struct Crop;

/// Selection value that can be typed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropField {
    X,
    Y,
    Width,
    Height,
}

#[derive(Debug, Clone)]
pub enum Edit {
    /// Selection dragged on the preview, in source pixels
    Select(CropRect),
    /// One selection value typed in, in source pixels
    Field(CropField, String),
    Preset(AspectPreset),
    /// Largest selection for the current preset
    Reset,
}

impl Tool for Crop {
    const TOOL: ToolType = ToolType::Crop;
    const TITLE: &'static str = "Crop Image";

    type Options = CropOptions;
    type Edit = Edit;

    fn defaults(_settings: &Settings) -> CropOptions {
        CropOptions {
            rect: CropRect::default(),
            preset: AspectPreset::Free,
        }
    }

    fn on_source(options: &mut CropOptions, source: &SourceImage) {
        options.rect = options.preset.centered_rect(source.width(), source.height());
    }

    fn apply(options: &mut CropOptions, edit: Edit, source: Option<&SourceImage>) {
        let Some(source) = source else {
            if let Edit::Preset(preset) = edit {
                options.preset = preset;
            }
            return;
        };
        let (width, height) = (source.width(), source.height());

        match edit {
            Edit::Select(rect) => options.rect = options.preset.constrain(rect, width, height),
            Edit::Field(field, input) => {
                let value = parse_pixels(&input);
                let mut rect = options.rect;
                match field {
                    CropField::X => rect.x = value,
                    CropField::Y => rect.y = value,
                    CropField::Width => rect.width = value,
                    CropField::Height => {
                        rect.height = value;
                        // `constrain` keeps the width, so derive it from the typed height
                        if let Some((rw, rh)) = options.preset.ratio() {
                            rect.width = (value as u64 * rw as u64 / rh as u64) as u32;
                        }
                    }
                }
                options.rect = options.preset.constrain(rect, width, height);
            }
            Edit::Preset(preset) => {
                options.preset = preset;
                options.rect = preset.centered_rect(width, height);
            }
            Edit::Reset => options.rect = options.preset.centered_rect(width, height),
        }
    }

    fn validate(options: &CropOptions, source: &SourceImage) -> ToolResult<()> {
        if options.rect.clamp_to(source.width(), source.height()).is_empty() {
            return Err(ToolError::EmptyCrop);
        }
        Ok(())
    }

    fn run(source: &SourceImage, options: &CropOptions) -> ToolResult<ProcessedImage> {
        crop(source, options)
    }

    fn source_view<'a>(options: &'a CropOptions, source: &'a SourceImage) -> Element<'a, Edit> {
        let overlay = CropOverlay {
            image_size: (source.width(), source.height()),
            selection: options.rect,
            on_select: Edit::Select,
        };

        stack![
            Image::new(source.preview.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT)),
            canvas(overlay)
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT)),
        ]
        .into()
    }

    fn options_view<'a>(
        options: &'a CropOptions,
        source: Option<&'a SourceImage>,
    ) -> Element<'a, Edit> {
        let rect = options.rect;
        let fields = source.map(|_| {
            column![
                row![
                    field_input("X", rect.x, CropField::X),
                    field_input("Y", rect.y, CropField::Y),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
                row![
                    field_input("W", rect.width, CropField::Width),
                    field_input("H", rect.height, CropField::Height),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            ]
            .spacing(8)
        });

        let reset = button(text("Select whole area"))
            .on_press_maybe(source.map(|_| Edit::Reset))
            .style(button::secondary);

        Column::new()
            .spacing(14)
            .push(text("Aspect ratio"))
            .push(
                pick_list(AspectPreset::ALL, Some(options.preset), Edit::Preset)
                    .width(Length::Fill),
            )
            .push(
                text("Drag on the image or type the area to keep, in pixels.")
                    .size(13)
                    .style(theme::muted),
            )
            .push_maybe(fields)
            .push(reset)
            .into()
    }
}

fn field_input<'a>(label: &'a str, value: u32, field: CropField) -> Element<'a, Edit> {
    row![
        text(label).width(Length::Fixed(16.0)),
        text_input(label, &value.to_string())
            .on_input(move |input| Edit::Field(field, input))
            .width(Length::Fixed(90.0)),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

fn parse_pixels(input: &str) -> u32 {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(6).collect();
    digits.parse().unwrap_or(0)
}
