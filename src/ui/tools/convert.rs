use iced::widget::{column, pick_list, slider, text, Column};
use iced::{Element, Length};

use super::Tool;
use crate::config::Settings;
use crate::error::{ToolError, ToolResult};
use crate::processing::codec::OutputFormat;
use crate::processing::convert::{convert, ConvertOptions};
use crate::state::data::{ProcessedImage, SourceImage};
use crate::state::tool::ToolType;
use crate::ui::theme;

#[derive(Debug, Clone)]
pub struct Convert;

#[derive(Debug, Clone)]
pub enum Edit {
    Format(OutputFormat),
    Quality(u8),
}

impl Tool for Convert {
    const TOOL: ToolType = ToolType::Convert;
    const TITLE: &'static str = "Convert Format";

    type Options = ConvertOptions;
    type Edit = Edit;

    fn defaults(settings: &Settings) -> ConvertOptions {
        ConvertOptions {
            format: settings.default_format,
            quality: settings.default_quality,
        }
    }

    fn on_source(options: &mut ConvertOptions, source: &SourceImage) {
        // Converting to the same format is rarely what was meant
        if options.format == source.output_format() {
            options.format = match options.format {
                OutputFormat::Png => OutputFormat::Jpeg,
                _ => OutputFormat::Png,
            };
        }
    }

    fn apply(options: &mut ConvertOptions, edit: Edit, _source: Option<&SourceImage>) {
        match edit {
            Edit::Format(format) => options.format = format,
            Edit::Quality(quality) => options.quality = quality.clamp(1, 100),
        }
    }

    fn validate(options: &ConvertOptions, _source: &SourceImage) -> ToolResult<()> {
        if !(1..=100).contains(&options.quality) {
            return Err(ToolError::invalid("Quality must be between 1 and 100"));
        }
        Ok(())
    }

    fn run(source: &SourceImage, options: &ConvertOptions) -> ToolResult<ProcessedImage> {
        convert(source, options)
    }

    fn options_view<'a>(
        options: &'a ConvertOptions,
        source: Option<&'a SourceImage>,
    ) -> Element<'a, Edit> {
        let quality = options.format.is_lossy().then(|| {
            column![
                text(format!("Quality: {}", options.quality)),
                slider(1..=100, options.quality, Edit::Quality),
            ]
            .spacing(6)
        });

        let from = source.map(|s| {
            text(format!("Source is {}", s.output_format().label()))
                .size(13)
                .style(theme::muted)
        });

        let flattened = source
            .filter(|s| s.has_alpha() && !options.format.keeps_alpha())
            .map(|_| {
                text("Transparent areas will be filled with white")
                    .size(13)
                    .style(theme::muted)
            });

        Column::new()
            .spacing(14)
            .push(text("Convert to"))
            .push(
                pick_list(OutputFormat::ALL, Some(options.format), Edit::Format)
                    .width(Length::Fill),
            )
            .push_maybe(quality)
            .push_maybe(from)
            .push_maybe(flattened)
            .into()
    }
}
