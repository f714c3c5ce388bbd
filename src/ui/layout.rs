//! Header and footer around the main content.

use chrono::Datelike;
use iced::widget::{button, column, container, horizontal_space, row, text, Column, Row};
use iced::{Alignment, Element, Length};

use crate::config::ThemeChoice;
use crate::state::shell::Shell;
use crate::state::tool::{nav_items, NavItem, ToolType};
use crate::ui::theme;

/// Messages the header can emit
#[derive(Debug, Clone)]
pub struct HeaderMessages<Message> {
    pub go_home: Message,
    pub toggle_menu: Message,
    pub toggle_theme: Message,
    pub select: fn(ToolType) -> Message,
    pub menu_select: fn(ToolType) -> Message,
}

pub fn header<'a, Message: Clone + 'a>(
    shell: &Shell,
    theme_choice: ThemeChoice,
    messages: HeaderMessages<Message>,
) -> Element<'a, Message> {
    let brand = button(
        row![
            text("◆").size(24).style(theme::accent),
            text("PIXELFORGE").size(22),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    )
    .on_press(messages.go_home.clone())
    .style(button::text);

    let theme_toggle = button(text(match theme_choice {
        ThemeChoice::Light => "☾",
        ThemeChoice::Dark => "☀",
    }))
    .on_press(messages.toggle_theme.clone())
    .style(button::text);

    let bar: Element<'a, Message> = if shell.is_compact() {
        let toggle = button(text(if shell.is_menu_open() { "✕" } else { "☰" }).size(20))
            .on_press(messages.toggle_menu.clone())
            .style(button::text);

        let top = row![brand, horizontal_space(), theme_toggle, toggle].align_y(Alignment::Center);

        if shell.is_menu_open() {
            let menu = nav_items().into_iter().fold(Column::new().spacing(4), |menu, item| {
                let entry = nav_button(item, shell.active_tool(), messages.menu_select);
                menu.push(entry.width(Length::Fill))
            });
            column![top, menu].spacing(12).into()
        } else {
            top.into()
        }
    } else {
        let tabs = nav_items().into_iter().fold(Row::new().spacing(4), |tabs, item| {
            tabs.push(nav_button(item, shell.active_tool(), messages.select))
        });

        row![brand, horizontal_space(), tabs, theme_toggle]
            .spacing(8)
            .align_y(Alignment::Center)
            .into()
    };

    container(bar)
        .padding([12, 24])
        .width(Length::Fill)
        .style(theme::bar)
        .into()
}

fn nav_button<'a, Message: Clone + 'a>(
    item: NavItem,
    active: ToolType,
    on_press: fn(ToolType) -> Message,
) -> button::Button<'a, Message> {
    let style = if item.tool == active {
        button::primary
    } else {
        button::text
    };

    button(
        row![text(item.icon), text(item.label)]
            .spacing(6)
            .align_y(Alignment::Center),
    )
    .on_press(on_press(item.tool))
    .style(style)
    .padding([6, 12])
}

/// Copyright line for `year`
pub fn copyright(year: i32) -> String {
    format!(
        "© {} PixelForge Digital Creations. {}",
        year, "All processing happens on this device. Your files never leave it."
    )
}

pub fn footer<'a, Message: 'a>() -> Element<'a, Message> {
    let year = chrono::Local::now().year();

    let content = column![
        row![
            text("◆").style(theme::accent),
            text("PIXELFORGE").size(16),
            horizontal_space(),
            text("FORGING DIGITAL CREATIONS").size(12).style(theme::muted),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        text(copyright(year)).size(13).style(theme::muted),
    ]
    .spacing(8);

    container(content)
        .padding([16, 24])
        .width(Length::Fill)
        .style(theme::bar)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copyright_names_year() {
        let line = copyright(2031);
        assert!(line.starts_with("© 2031 PixelForge Digital Creations."));
        assert!(line.ends_with("Your files never leave it."));
    }
}
