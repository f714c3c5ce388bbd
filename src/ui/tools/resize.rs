use iced::widget::{checkbox, column, pick_list, row, slider, text, text_input, Column};
use iced::{Alignment, Element, Length};

use super::Tool;
use crate::config::Settings;
use crate::error::ToolResult;
use crate::processing::resize::{
    resize, target_dimensions, ResizeFilter, ResizeMode, ResizeOptions, MAX_PERCENT,
};
use crate::state::data::{ProcessedImage, SourceImage};
use crate::state::tool::ToolType;
use crate::ui::theme;

#[derive(Debug, Clone)]
pub struct Resize;

/// Form state; both modes are kept so switching back and forth loses nothing
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeForm {
    pub width: u32,
    pub height: u32,
    pub percent: u32,
    pub by_percent: bool,
    pub keep_aspect: bool,
    pub filter: ResizeFilter,
}

impl ResizeForm {
    pub fn options(&self) -> ResizeOptions {
        let mode = if self.by_percent {
            ResizeMode::Percent(self.percent)
        } else {
            ResizeMode::Pixels {
                width: self.width,
                height: self.height,
            }
        };

        ResizeOptions {
            mode,
            keep_aspect: self.keep_aspect,
            filter: self.filter,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Edit {
    Width(String),
    Height(String),
    Percent(u32),
    ByPercent(bool),
    KeepAspect(bool),
    Filter(ResizeFilter),
}

impl Tool for Resize {
    const TOOL: ToolType = ToolType::Resize;
    const TITLE: &'static str = "Resize Image";

    type Options = ResizeForm;
    type Edit = Edit;

    fn defaults(_settings: &Settings) -> ResizeForm {
        ResizeForm {
            width: 0,
            height: 0,
            percent: 50,
            by_percent: false,
            keep_aspect: true,
            filter: ResizeFilter::Lanczos3,
        }
    }

    fn on_source(form: &mut ResizeForm, source: &SourceImage) {
        form.width = source.width();
        form.height = source.height();
    }

    fn apply(form: &mut ResizeForm, edit: Edit, source: Option<&SourceImage>) {
        let size = source.map(|s| (s.width(), s.height()));

        match edit {
            Edit::Width(input) => {
                form.width = parse_side(&input);
                if let (true, Some((w, h))) = (form.keep_aspect, size) {
                    form.height = derive_side(form.width, w, h);
                }
            }
            Edit::Height(input) => {
                form.height = parse_side(&input);
                if let (true, Some((w, h))) = (form.keep_aspect, size) {
                    form.width = derive_side(form.height, h, w);
                }
            }
            Edit::Percent(percent) => form.percent = percent.clamp(1, MAX_PERCENT),
            Edit::ByPercent(on) => form.by_percent = on,
            Edit::KeepAspect(on) => {
                form.keep_aspect = on;
                if let (true, Some((w, h))) = (on, size) {
                    form.height = derive_side(form.width, w, h);
                }
            }
            Edit::Filter(filter) => form.filter = filter,
        }
    }

    fn validate(form: &ResizeForm, source: &SourceImage) -> ToolResult<()> {
        target_dimensions(source.width(), source.height(), &form.options()).map(|_| ())
    }

    fn run(source: &SourceImage, form: &ResizeForm) -> ToolResult<ProcessedImage> {
        resize(source, &form.options())
    }

    fn options_view<'a>(
        form: &'a ResizeForm,
        source: Option<&'a SourceImage>,
    ) -> Element<'a, Edit> {
        let size = if form.by_percent {
            column![
                text(format!("Scale: {}%", form.percent)),
                slider(1..=MAX_PERCENT, form.percent, Edit::Percent),
            ]
            .spacing(6)
        } else {
            column![
                row![
                    side_input("Width", form.width, Edit::Width),
                    text("×"),
                    side_input("Height", form.height, Edit::Height),
                    text("px"),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
                checkbox("Keep aspect ratio", form.keep_aspect).on_toggle(Edit::KeepAspect),
            ]
            .spacing(10)
        };

        // Invalid sizes are reported by the panel
        let outcome = source.and_then(|s| {
            let (w, h) = target_dimensions(s.width(), s.height(), &form.options()).ok()?;
            let line = format!("{} × {} → {} × {} px", s.width(), s.height(), w, h);
            Some(text(line).size(13).style(theme::muted))
        });

        Column::new()
            .spacing(14)
            .push(checkbox("Scale by percentage", form.by_percent).on_toggle(Edit::ByPercent))
            .push(size)
            .push(text("Resampling"))
            .push(
                pick_list(ResizeFilter::ALL, Some(form.filter), Edit::Filter)
                    .width(Length::Fill),
            )
            .push_maybe(outcome)
            .into()
    }
}

fn side_input<'a>(
    placeholder: &str,
    value: u32,
    on_input: fn(String) -> Edit,
) -> Element<'a, Edit> {
    let value = if value == 0 { String::new() } else { value.to_string() };
    text_input(placeholder, &value)
        .on_input(on_input)
        .width(Length::Fixed(100.0))
        .into()
}

fn parse_side(input: &str) -> u32 {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(6).collect();
    digits.parse().unwrap_or(0)
}

/// Rescale `value` from a side of `from` to a side of `to`, rounding to nearest
fn derive_side(value: u32, from: u32, to: u32) -> u32 {
    if value == 0 || from == 0 {
        return 0;
    }
    ((value as u64 * to as u64 + from as u64 / 2) / from as u64).max(1) as u32
}
