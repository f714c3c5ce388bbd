//! Shared styles for the shell and panels.

use iced::widget::{container, text};
use iced::{Border, Color, Theme};

use crate::config::ThemeChoice;

/// Brand accent (indigo)
pub const ACCENT: Color = Color {
    r: 0.31,
    g: 0.27,
    b: 0.90,
    a: 1.0,
};

pub fn for_choice(choice: ThemeChoice) -> Theme {
    match choice {
        ThemeChoice::Light => Theme::Light,
        ThemeChoice::Dark => Theme::Dark,
    }
}

/// Header and footer bars
pub fn bar(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.base.color.into()),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..container::Style::default()
    }
}

/// Raised card used for home tiles and panel sections
pub fn card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..container::Style::default()
    }
}

/// Backdrop behind image previews
pub fn preview_well(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.strong.color.into()),
        border: Border {
            radius: 8.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

pub fn muted(theme: &Theme) -> text::Style {
    let base = theme.extended_palette().background.base.text;
    text::Style {
        color: Some(Color { a: 0.65, ..base }),
    }
}

pub fn accent(_theme: &Theme) -> text::Style {
    text::Style { color: Some(ACCENT) }
}

pub fn error(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(theme.palette().danger),
    }
}

pub fn success(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(theme.palette().success),
    }
}
