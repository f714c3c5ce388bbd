//! Landing view: a short hero and one card per tool.

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::state::tool::{nav_items, NavItem, ToolType};
use crate::ui::theme;

const CARD_WIDTH: f32 = 300.0;

pub fn view<'a, Message: Clone + 'a>(on_select: fn(ToolType) -> Message) -> Element<'a, Message> {
    let hero = column![
        text("PixelForge").size(48).style(theme::accent),
        text("Compress, resize, convert, crop and enhance images.").size(20),
        text("Everything runs on this device. Your files never leave it.").style(theme::muted),
    ]
    .spacing(8)
    .align_x(Alignment::Center);

    let cards: Vec<Element<'a, Message>> = nav_items()
        .into_iter()
        .filter(|item| !item.tool.is_home())
        .map(|item| card(item, on_select))
        .collect();

    let grid = Wrap::with_elements(cards).spacing(20.0).line_spacing(20.0);

    let content = column![hero, grid]
        .spacing(40)
        .padding(40)
        .align_x(Alignment::Center)
        .width(Length::Fill);

    container(content).center_x(Length::Fill).into()
}

fn card<'a, Message: Clone + 'a>(
    item: NavItem,
    on_select: fn(ToolType) -> Message,
) -> Element<'a, Message> {
    let body = column![
        text(item.icon).size(32).style(theme::accent),
        text(item.label).size(20),
        text(item.tool.description()).size(14).style(theme::muted),
        text("Open →").size(14).style(theme::accent),
    ]
    .spacing(10);

    button(container(body).padding(20).width(Length::Fill).style(theme::card))
        .on_press(on_select(item.tool))
        .style(button::text)
        .padding(0)
        .width(Length::Fixed(CARD_WIDTH))
        .into()
}
