use iced::widget::scrollable::RelativeOffset;
use iced::widget::{column, container, scrollable};
use iced::{window, Element, Length, Size, Subscription, Task, Theme};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod processing;
mod state;
mod ui;

use config::{Settings, ThemeChoice};
use state::shell::{Shell, Transition};
use state::tool::ToolType;
use ui::layout::{self, HeaderMessages};
use ui::tools::{Action, Screen, ScreenMessage};

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "pixelforge=info,warn";

/// Id of the main scrollable, snapped to the top on every tool change
const MAIN_CONTENT: &str = "main-content";

/// Main application state
struct PixelForge {
    /// Which view is active and whether the compact menu is open
    shell: Shell,
    /// The view for the active tool
    screen: Screen,
    settings: Settings,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A navigation tab or home card was clicked
    SelectTool(ToolType),
    /// The brand was clicked
    GoHome,
    ToggleMenu,
    /// An entry of the compact menu was clicked
    MenuSelect(ToolType),
    ToggleTheme,
    WindowResized(Size),
    /// Routed to the active tool panel
    Screen(ScreenMessage),
}

impl PixelForge {
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        tracing::info!("🎨 PixelForge started (theme: {:?})", settings.theme);

        (Self::with_settings(settings), Task::none())
    }

    fn with_settings(settings: Settings) -> Self {
        let shell = Shell::new();
        let screen = Screen::for_tool(shell.active_tool(), &settings);

        Self {
            shell,
            screen,
            settings,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let before = self.settings.clone();

        let task = match message {
            Message::SelectTool(tool) => {
                let transition = self.shell.select_tool(tool);
                self.navigate(transition)
            }
            Message::GoHome => {
                let transition = self.shell.go_home();
                self.navigate(transition)
            }
            Message::ToggleMenu => {
                self.shell.toggle_menu();
                Task::none()
            }
            Message::MenuSelect(tool) => {
                let transition = self.shell.select_from_menu(tool);
                self.navigate(transition)
            }
            Message::ToggleTheme => {
                self.settings.theme = match self.settings.theme {
                    ThemeChoice::Light => ThemeChoice::Dark,
                    ThemeChoice::Dark => ThemeChoice::Light,
                };
                Task::none()
            }
            Message::WindowResized(size) => {
                self.shell.set_viewport_width(size.width);
                Task::none()
            }
            Message::Screen(message) => match self.screen.update(message, &mut self.settings) {
                Action::None => Task::none(),
                Action::Back => {
                    let transition = self.shell.go_home();
                    self.navigate(transition)
                }
                Action::Run(task) => task.map(Message::Screen),
            },
        };

        if self.settings != before {
            if let Err(e) = self.settings.save() {
                tracing::warn!("⚠️  Could not save settings: {}", e);
            }
        }

        task
    }

    /// Follow a shell transition: build the new view and scroll to the top
    fn navigate(&mut self, transition: Transition) -> Task<Message> {
        if let Transition::Moved { to, .. } = transition {
            self.screen = Screen::for_tool(to, &self.settings);
        }

        if transition.resets_scroll() {
            scrollable::snap_to(scrollable::Id::new(MAIN_CONTENT), RelativeOffset::START)
        } else {
            Task::none()
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = layout::header(
            &self.shell,
            self.settings.theme,
            HeaderMessages {
                go_home: Message::GoHome,
                toggle_menu: Message::ToggleMenu,
                toggle_theme: Message::ToggleTheme,
                select: Message::SelectTool,
                menu_select: Message::MenuSelect,
            },
        );

        let main = scrollable(
            container(self.screen.view(Message::SelectTool, Message::Screen))
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .id(scrollable::Id::new(MAIN_CONTENT))
        .width(Length::Fill)
        .height(Length::Fill);

        column![header, main, layout::footer()].into()
    }

    fn theme(&self) -> Theme {
        ui::theme::for_choice(self.settings.theme)
    }

    fn subscription(&self) -> Subscription<Message> {
        window::resize_events().map(|(_id, size)| Message::WindowResized(size))
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .compact()
        .init();

    iced::application("PixelForge", PixelForge::update, PixelForge::view)
        .theme(PixelForge::theme)
        .subscription(PixelForge::subscription)
        .window_size((1100.0, 760.0))
        .centered()
        .run_with(PixelForge::new)
}
