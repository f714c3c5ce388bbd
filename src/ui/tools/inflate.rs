use iced::widget::{pick_list, row, text, text_input, Column};
use iced::{Alignment, Element, Length};

use super::Tool;
use crate::config::Settings;
use crate::error::ToolResult;
use crate::processing::inflate::{check_target, inflate, InflateOptions, SizeUnit};
use crate::state::data::{format_bytes, ProcessedImage, SourceImage};
use crate::state::tool::ToolType;
use crate::ui::theme;

#[derive(Debug, Clone)]
pub struct Inflate;

#[derive(Debug, Clone)]
pub enum Edit {
    Amount(String),
    Unit(SizeUnit),
}

impl Tool for Inflate {
    const TOOL: ToolType = ToolType::IncreaseSize;
    const TITLE: &'static str = "Increase File Size";

    type Options = InflateOptions;
    type Edit = Edit;

    fn defaults(_settings: &Settings) -> InflateOptions {
        InflateOptions {
            amount: 500,
            unit: SizeUnit::Kb,
        }
    }

    /// Suggest a target one step above the current size in a fitting unit
    fn on_source(options: &mut InflateOptions, source: &SourceImage) {
        let mb = SizeUnit::Mb.bytes();
        if source.size >= mb {
            options.unit = SizeUnit::Mb;
            options.amount = (source.size / mb + 1) as u32;
        } else {
            options.unit = SizeUnit::Kb;
            options.amount = ((source.size / SizeUnit::Kb.bytes() + 1) * 2) as u32;
        }
    }

    fn apply(options: &mut InflateOptions, edit: Edit, _source: Option<&SourceImage>) {
        match edit {
            Edit::Amount(input) => {
                let digits: String = input.chars().filter(char::is_ascii_digit).take(9).collect();
                options.amount = digits.parse().unwrap_or(0);
            }
            Edit::Unit(unit) => options.unit = unit,
        }
    }

    fn validate(options: &InflateOptions, source: &SourceImage) -> ToolResult<()> {
        check_target(source.size, options.target_bytes())
    }

    fn run(source: &SourceImage, options: &InflateOptions) -> ToolResult<ProcessedImage> {
        inflate(source, options)
    }

    fn options_view<'a>(
        options: &'a InflateOptions,
        source: Option<&'a SourceImage>,
    ) -> Element<'a, Edit> {
        let amount = if options.amount == 0 {
            String::new()
        } else {
            options.amount.to_string()
        };

        let target = row![
            text_input("Size", &amount)
                .on_input(Edit::Amount)
                .width(Length::Fixed(140.0)),
            pick_list(SizeUnit::ALL, Some(options.unit), Edit::Unit),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let summary = source.map(|s| {
            let target = options.target_bytes();
            let line = if target > s.size {
                format!(
                    "{} → {} (+{})",
                    format_bytes(s.size),
                    format_bytes(target),
                    format_bytes(target - s.size)
                )
            } else {
                format!("Current size: {}", format_bytes(s.size))
            };
            text(line).size(13).style(theme::muted)
        });

        Column::new()
            .spacing(14)
            .push(text("Target size"))
            .push(target)
            .push(
                text("Pixels are left untouched; only padding is added to the file.")
                    .size(13)
                    .style(theme::muted),
            )
            .push_maybe(summary)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::processing::codec::OutputFormat;
    use crate::processing::test_support::{gradient, source_from};

    #[test]
    fn test_source_suggests_larger_target() {
        let source = source_from(&gradient(32, 32), OutputFormat::Png);
        let mut options = Inflate::defaults(&Settings::default());
        Inflate::on_source(&mut options, &source);

        assert_eq!(options.unit, SizeUnit::Kb);
        assert!(options.target_bytes() > source.size);
    }

    #[test]
    fn test_amount_input() {
        let mut options = Inflate::defaults(&Settings::default());
        Inflate::apply(&mut options, Edit::Amount("2,048".to_string()), None);
        Inflate::apply(&mut options, Edit::Unit(SizeUnit::Mb), None);
        assert_eq!(options.amount, 2048);
        assert_eq!(options.target_bytes(), 2048 * 1024 * 1024);
    }

    #[test]
    fn test_run_hits_target_exactly() {
        let source = source_from(&gradient(32, 32), OutputFormat::Jpeg);
        let mut options = Inflate::defaults(&Settings::default());
        Inflate::on_source(&mut options, &source);

        let result = Inflate::run(&source, &options).unwrap();
        assert_eq!(result.new_size, options.target_bytes());
        assert_eq!(result.mime_type, "image/jpeg");
    }

    #[test]
    fn test_target_must_grow_the_file() {
        let source = source_from(&gradient(32, 32), OutputFormat::Png);
        let mut options = Inflate::defaults(&Settings::default());
        Inflate::on_source(&mut options, &source);
        assert!(Inflate::validate(&options, &source).is_ok());

        Inflate::apply(&mut options, Edit::Amount("0".to_string()), Some(&source));
        assert!(matches!(
            Inflate::validate(&options, &source),
            Err(ToolError::TargetTooSmall { .. })
        ));

        Inflate::apply(&mut options, Edit::Amount("200".to_string()), Some(&source));
        Inflate::apply(&mut options, Edit::Unit(SizeUnit::Mb), Some(&source));
        assert!(matches!(
            Inflate::validate(&options, &source),
            Err(ToolError::TargetTooLarge { .. })
        ));
    }
}
