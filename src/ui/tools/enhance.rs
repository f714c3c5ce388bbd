use iced::widget::{button, canvas, column, pick_list, slider, text, Column};
use iced::{Element, Length};

use super::Tool;
use crate::config::Settings;
use crate::error::ToolResult;
use crate::processing::enhance::{enhance, output_dimensions, EnhanceOptions, Upscale};
use crate::state::data::{ProcessedImage, SourceImage};
use crate::state::tool::ToolType;
use crate::ui::histogram::HistogramChart;
use crate::ui::theme;

#[derive(Debug, Clone)]
pub struct Enhance;

#[derive(Debug, Clone)]
pub enum Edit {
    Upscale(Upscale),
    Sharpen(f32),
    Contrast(f32),
    Brightness(i32),
    /// Back to the default recipe
    Reset,
}

impl Tool for Enhance {
    const TOOL: ToolType = ToolType::Quality;
    const TITLE: &'static str = "Enhance Quality";

    type Options = EnhanceOptions;
    type Edit = Edit;

    fn defaults(_settings: &Settings) -> EnhanceOptions {
        EnhanceOptions::default()
    }

    fn on_source(options: &mut EnhanceOptions, source: &SourceImage) {
        // Step the upscale down until the output fits the pixel budget
        while options.upscale != Upscale::X1
            && output_dimensions(source.width(), source.height(), options.upscale).is_err()
        {
            options.upscale = match options.upscale {
                Upscale::X4 => Upscale::X2,
                _ => Upscale::X1,
            };
        }
    }

    fn apply(options: &mut EnhanceOptions, edit: Edit, _source: Option<&SourceImage>) {
        match edit {
            Edit::Upscale(upscale) => options.upscale = upscale,
            Edit::Sharpen(sigma) => options.sharpen = sigma.clamp(0.0, 5.0),
            Edit::Contrast(contrast) => options.contrast = contrast.clamp(-50.0, 50.0),
            Edit::Brightness(brightness) => options.brightness = brightness.clamp(-50, 50),
            Edit::Reset => *options = EnhanceOptions::default(),
        }
    }

    fn validate(options: &EnhanceOptions, source: &SourceImage) -> ToolResult<()> {
        options.validate()?;
        output_dimensions(source.width(), source.height(), options.upscale).map(|_| ())
    }

    fn run(source: &SourceImage, options: &EnhanceOptions) -> ToolResult<ProcessedImage> {
        enhance(source, options)
    }

    fn options_view<'a>(
        options: &'a EnhanceOptions,
        source: Option<&'a SourceImage>,
    ) -> Element<'a, Edit> {
        // Oversized outputs are reported by the panel
        let upscale_note = source
            .and_then(|s| output_dimensions(s.width(), s.height(), options.upscale).ok())
            .map(|(w, h)| {
                text(format!("Output: {} × {} px", w, h))
                    .size(13)
                    .style(theme::muted)
            });

        let sliders = column![
            text(format!("Sharpen: {:.1}", options.sharpen)),
            slider(0.0..=5.0, options.sharpen, Edit::Sharpen).step(0.1),
            text(format!("Contrast: {:+.0}", options.contrast)),
            slider(-50.0..=50.0, options.contrast, Edit::Contrast).step(1.0),
            text(format!("Brightness: {:+}", options.brightness)),
            slider(-50..=50, options.brightness, Edit::Brightness),
        ]
        .spacing(6);

        let unchanged = options.is_identity().then(|| {
            text("These settings leave the image unchanged")
                .size(13)
                .style(theme::muted)
        });

        let histogram = source.map(|s| {
            column![
                text("Histogram").size(13).style(theme::muted),
                canvas(HistogramChart {
                    histogram: &s.histogram
                })
                .width(Length::Fill)
                .height(90),
            ]
            .spacing(4)
        });

        let reset = button(text("Reset adjustments"))
            .on_press(Edit::Reset)
            .style(button::text);

        Column::new()
            .spacing(14)
            .push(text("Upscale"))
            .push(
                pick_list(Upscale::ALL, Some(options.upscale), Edit::Upscale)
                    .width(Length::Fill),
            )
            .push_maybe(upscale_note)
            .push(sliders)
            .push(reset)
            .push_maybe(unchanged)
            .push_maybe(histogram)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::codec::OutputFormat;
    use crate::processing::test_support::{gradient, source_from};

    #[test]
    fn test_edits_are_clamped() {
        let mut options = Enhance::defaults(&Settings::default());
        Enhance::apply(&mut options, Edit::Sharpen(9.0), None);
        Enhance::apply(&mut options, Edit::Contrast(-80.0), None);
        Enhance::apply(&mut options, Edit::Brightness(70), None);
        assert_eq!(options.sharpen, 5.0);
        assert_eq!(options.contrast, -50.0);
        assert_eq!(options.brightness, 50);
        assert!(options.validate().is_ok());

        Enhance::apply(&mut options, Edit::Reset, None);
        assert_eq!(options, EnhanceOptions::default());
    }

    #[test]
    fn test_small_source_keeps_default_upscale() {
        let source = source_from(&gradient(40, 30), OutputFormat::Png);
        let mut options = Enhance::defaults(&Settings::default());
        Enhance::on_source(&mut options, &source);
        assert_eq!(options.upscale, Upscale::X2);
    }

    #[test]
    fn test_result_carries_histogram() {
        let source = source_from(&gradient(24, 24), OutputFormat::Png);
        let options = Enhance::defaults(&Settings::default());
        let result = Enhance::run(&source, &options).unwrap();
        assert_eq!((result.width, result.height), (Some(48), Some(48)));
        assert!(result.histogram.is_some());
    }

    #[test]
    fn test_out_of_range_adjustment_fails_validation() {
        let source = source_from(&gradient(40, 30), OutputFormat::Png);
        let mut options = Enhance::defaults(&Settings::default());
        assert!(Enhance::validate(&options, &source).is_ok());

        options.sharpen = 9.0;
        assert!(Enhance::validate(&options, &source).is_err());
    }
}
