use iced::widget::{checkbox, column, pick_list, row, slider, text, text_input, Column};
use iced::{Alignment, Element, Length};

use super::Tool;
use crate::config::Settings;
use crate::error::ToolResult;
use crate::processing::compress::{compress, CompressFormat, CompressOptions};
use crate::state::data::{format_bytes, ProcessedImage, SourceImage};
use crate::state::tool::ToolType;
use crate::ui::theme;

/// Target offered when the size limit is first switched on
const DEFAULT_TARGET_KB: u32 = 200;

#[derive(Debug, Clone)]
pub struct Compress;

#[derive(Debug, Clone)]
pub enum Edit {
    Quality(u8),
    Format(CompressFormat),
    LimitSize(bool),
    TargetKb(String),
}

impl Tool for Compress {
    const TOOL: ToolType = ToolType::Compress;
    const TITLE: &'static str = "Compress Image";

    type Options = CompressOptions;
    type Edit = Edit;

    fn defaults(settings: &Settings) -> CompressOptions {
        CompressOptions {
            quality: settings.default_quality,
            target_kb: None,
            format: CompressFormat::Auto,
        }
    }

    fn apply(options: &mut CompressOptions, edit: Edit, source: Option<&SourceImage>) {
        match edit {
            Edit::Quality(quality) => options.quality = quality.clamp(1, 100),
            Edit::Format(format) => options.format = format,
            Edit::LimitSize(false) => options.target_kb = None,
            Edit::LimitSize(true) => {
                // Start at half the source, which is a reachable goal for most photos
                let suggested = source
                    .map(|s| (s.size / 2048).max(1) as u32)
                    .unwrap_or(DEFAULT_TARGET_KB);
                options.target_kb = Some(options.target_kb.unwrap_or(suggested));
            }
            Edit::TargetKb(input) => {
                let digits: String = input.chars().filter(char::is_ascii_digit).take(9).collect();
                options.target_kb = Some(digits.parse().unwrap_or(0));
            }
        }
    }

    fn validate(options: &CompressOptions, _source: &SourceImage) -> ToolResult<()> {
        options.validate()
    }

    fn run(source: &SourceImage, options: &CompressOptions) -> ToolResult<ProcessedImage> {
        compress(source, options)
    }

    fn options_view<'a>(
        options: &'a CompressOptions,
        source: Option<&'a SourceImage>,
    ) -> Element<'a, Edit> {
        let lossless = source.is_some_and(|s| !options.format.resolve(s).is_lossy())
            || options.format == CompressFormat::Png;

        let quality = column![
            text(format!("Quality: {}", options.quality)),
            slider(1..=100, options.quality, Edit::Quality),
        ]
        .spacing(6);

        let target = options.target_kb.map(|kb| {
            let value = if kb == 0 { String::new() } else { kb.to_string() };
            row![
                text_input("Size", &value).on_input(Edit::TargetKb).width(Length::Fixed(120.0)),
                text("KB"),
            ]
            .spacing(8)
            .align_y(Alignment::Center)
        });

        let hint = source.map(|s| {
            let output = options.format.resolve(s);
            let note = if lossless {
                "PNG is lossless; quality and size limits have no effect".to_string()
            } else {
                format!("Saves as {} · source is {}", output.label(), format_bytes(s.size))
            };
            text(note).size(13).style(theme::muted)
        });

        Column::new()
            .spacing(14)
            .push(text("Output format"))
            .push(
                pick_list(CompressFormat::ALL, Some(options.format), Edit::Format)
                    .width(Length::Fill),
            )
            .push(quality)
            .push(
                checkbox("Limit the file size", options.target_kb.is_some())
                    .on_toggle(Edit::LimitSize),
            )
            .push_maybe(target)
            .push_maybe(hint)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::codec::OutputFormat;
    use crate::processing::test_support::{gradient, source_from};

    #[test]
    fn test_defaults_follow_settings() {
        let settings = Settings {
            default_quality: 55,
            ..Settings::default()
        };
        let options = Compress::defaults(&settings);
        assert_eq!(options.quality, 55);
        assert_eq!(options.target_kb, None);
    }

    #[test]
    fn test_limit_size_suggests_half_the_source() {
        let source = source_from(&gradient(64, 64), OutputFormat::Png);
        let mut options = Compress::defaults(&Settings::default());

        Compress::apply(&mut options, Edit::LimitSize(true), Some(&source));
        assert_eq!(options.target_kb, Some((source.size / 2048).max(1) as u32));

        Compress::apply(&mut options, Edit::LimitSize(false), Some(&source));
        assert_eq!(options.target_kb, None);
    }

    #[test]
    fn test_target_input_keeps_digits() {
        let mut options = Compress::defaults(&Settings::default());
        Compress::apply(&mut options, Edit::TargetKb("1a5 0".to_string()), None);
        assert_eq!(options.target_kb, Some(150));

        Compress::apply(&mut options, Edit::TargetKb(String::new()), None);
        assert_eq!(options.target_kb, Some(0));
    }

    #[test]
    fn test_zero_target_fails_validation() {
        let source = source_from(&gradient(16, 16), OutputFormat::Jpeg);
        let mut options = Compress::defaults(&Settings::default());
        assert!(Compress::validate(&options, &source).is_ok());

        Compress::apply(&mut options, Edit::TargetKb("0".to_string()), Some(&source));
        assert!(Compress::validate(&options, &source).is_err());
    }
}
