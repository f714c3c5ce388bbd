//! Tool panels
//!
//! Every tool shares one panel layout and lifecycle: pick an image, tweak the
//! tool's options, process on a blocking worker, then save the result. The
//! tools themselves only describe their options and their operation through
//! the `Tool` trait.
//!
//! `Screen` is the render dispatch over `ToolType`: exactly one child view per
//! tool, the home view for `ToolType::Home`.

pub mod compress;
pub mod convert;
pub mod crop;
pub mod enhance;
pub mod inflate;
pub mod resize;

use iced::widget::{
    button, canvas, column, container, horizontal_space, row, text, Column, Image,
};
use iced::{Alignment, ContentFit, Element, Length, Task};
use rfd::FileDialog;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{ToolError, ToolResult};
use crate::processing::histogram::Histogram;
use crate::processing::{self, embedded, run_blocking, source};
use crate::state::data::{format_bytes, ProcessedImage, SourceImage};
use crate::state::tool::ToolType;
use crate::ui::histogram::HistogramChart;
use crate::ui::{home, theme};

pub use compress::Compress;
pub use convert::Convert;
pub use crop::Crop;
pub use enhance::Enhance;
pub use inflate::Inflate;
pub use resize::Resize;

/// Height of the image previews
const PREVIEW_HEIGHT: f32 = 320.0;

/// What a single tool contributes to its panel
pub trait Tool: Debug + Clone + Send + 'static {
    /// The view this tool is shown for
    const TOOL: ToolType;
    /// Panel title
    const TITLE: &'static str;

    type Options: Debug + Clone + Send + 'static;
    type Edit: Debug + Clone + Send + 'static;

    /// Starting options
    fn defaults(settings: &Settings) -> Self::Options;

    /// Adjust options to a freshly loaded image
    fn on_source(_options: &mut Self::Options, _source: &SourceImage) {}

    /// Apply one option edit
    fn apply(options: &mut Self::Options, edit: Self::Edit, source: Option<&SourceImage>);

    /// Reject options that cannot produce a result for `source`.
    ///
    /// Runs on the UI thread before every render, so it must stay cheap.
    fn validate(_options: &Self::Options, _source: &SourceImage) -> ToolResult<()> {
        Ok(())
    }

    /// The operation itself; runs on a blocking worker
    fn run(source: &SourceImage, options: &Self::Options) -> ToolResult<ProcessedImage>;

    fn options_view<'a>(
        options: &'a Self::Options,
        source: Option<&'a SourceImage>,
    ) -> Element<'a, Self::Edit>;

    /// Preview of the loaded image; tools may overlay controls
    fn source_view<'a>(
        _options: &'a Self::Options,
        source: &'a SourceImage,
    ) -> Element<'a, Self::Edit> {
        Image::new(source.preview.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fixed(PREVIEW_HEIGHT))
            .into()
    }
}

/// Panel events
///
/// Background results carry the request generation they were started in.
#[derive(Debug, Clone)]
pub enum PanelMessage<T: Tool> {
    /// Return to the home view
    Back,
    /// Open the file picker
    Pick,
    Loaded(u64, ToolResult<SourceImage>),
    Edit(T::Edit),
    Process,
    Processed(u64, ToolResult<ProcessedImage>),
    Save,
    Saved(ToolResult<PathBuf>),
    StartOver,
}

/// What the owner of a panel should do after an update
pub enum Action<Message> {
    None,
    /// Navigate back to the home view
    Back,
    /// Run a background task
    Run(Task<Message>),
}

impl<Message: Send + 'static> Action<Message> {
    pub fn map<Other: Send + 'static>(self, f: fn(Message) -> Other) -> Action<Other> {
        match self {
            Self::None => Action::None,
            Self::Back => Action::Back,
            Self::Run(task) => Action::Run(task.map(f)),
        }
    }
}

/// Background work in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Loading,
    Processing,
}

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Idle,
    Working(String),
    Info(String),
    Error(String),
}

/// State of one tool panel
#[derive(Debug)]
pub struct Panel<T: Tool> {
    options: T::Options,
    source: Option<SourceImage>,
    result: Option<ProcessedImage>,
    status: Status,
    job: Option<Job>,
    /// Bumped whenever an in-flight result stops matching the panel
    generation: u64,
    tool: PhantomData<T>,
}

impl<T: Tool> Panel<T> {
    pub fn new(settings: &Settings) -> Self {
        Self {
            options: T::defaults(settings),
            source: None,
            result: None,
            status: Status::Idle,
            job: None,
            generation: 0,
            tool: PhantomData,
        }
    }

    #[cfg(test)]
    pub fn options(&self) -> &T::Options {
        &self.options
    }

    #[cfg(test)]
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    #[cfg(test)]
    pub fn result(&self) -> Option<&ProcessedImage> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Why the current options cannot be processed, if they cannot
    fn validation_error(&self) -> Option<ToolError> {
        let source = self.source.as_ref()?;
        T::validate(&self.options, source).err()
    }

    pub fn update(
        &mut self,
        message: PanelMessage<T>,
        settings: &mut Settings,
    ) -> Action<PanelMessage<T>> {
        match message {
            PanelMessage::Loaded(generation, _) | PanelMessage::Processed(generation, _)
                if generation != self.generation =>
            {
                tracing::debug!(
                    "dropping stale {} result (request {}, panel at {})",
                    T::TOOL,
                    generation,
                    self.generation
                );
                Action::None
            }
            PanelMessage::Back => Action::Back,
            PanelMessage::Pick => {
                if self.is_busy() {
                    return Action::None;
                }

                let mut dialog = FileDialog::new()
                    .set_title(format!("Choose an image · {}", T::TITLE))
                    .add_filter("Images", &source::OPEN_EXTENSIONS)
                    .add_filter("Camera RAW", &embedded::RAW_EXTENSIONS);
                if let Some(dir) = &settings.last_directory {
                    dialog = dialog.set_directory(dir);
                }

                let Some(path) = dialog.pick_file() else {
                    return Action::None;
                };

                remember_folder(settings, &path);
                self.generation += 1;
                self.job = Some(Job::Loading);
                self.status = Status::Working(format!("Loading {}...", path.display()));

                let generation = self.generation;
                Action::Run(Task::perform(source::open(path), move |loaded| {
                    PanelMessage::Loaded(generation, loaded)
                }))
            }
            PanelMessage::Loaded(_, Ok(source)) => {
                self.job = None;
                T::on_source(&mut self.options, &source);
                self.status = Status::Info(describe_source(&source));
                self.result = None;
                self.source = Some(source);
                Action::None
            }
            PanelMessage::Edit(edit) => {
                T::apply(&mut self.options, edit, self.source.as_ref());
                // A result no longer matches edited options
                self.result = None;
                if self.job == Some(Job::Processing) {
                    self.generation += 1;
                    self.job = None;
                    self.status = Status::Idle;
                }
                Action::None
            }
            PanelMessage::Process => {
                if self.is_busy() {
                    return Action::None;
                }
                let Some(source) = self.source.clone() else {
                    return Action::None;
                };
                if let Err(e) = T::validate(&self.options, &source) {
                    self.status = Status::Error(e.to_string());
                    return Action::None;
                }

                self.job = Some(Job::Processing);
                self.status = Status::Working("Processing...".to_string());
                let options = self.options.clone();
                let generation = self.generation;

                Action::Run(Task::perform(
                    run_blocking(move || T::run(&source, &options)),
                    move |processed| PanelMessage::Processed(generation, processed),
                ))
            }
            PanelMessage::Processed(_, Ok(result)) => {
                tracing::debug!("result {} ready ({})", result.id, result.mime_type);
                self.job = None;
                self.status = Status::Info(format!(
                    "Done: {} → {} ({:+.1}%)",
                    format_bytes(result.original_size),
                    format_bytes(result.new_size),
                    result.size_change_percent()
                ));
                self.result = Some(result);
                Action::None
            }
            PanelMessage::Save => {
                let Some(result) = &self.result else {
                    return Action::None;
                };

                // Next to the source unless a folder was used since
                let directory = settings.last_directory.clone().or_else(|| {
                    self.source
                        .as_ref()
                        .and_then(|s| s.path.as_deref())
                        .and_then(Path::parent)
                        .map(Path::to_path_buf)
                });

                let mut dialog = FileDialog::new()
                    .set_title("Save result")
                    .set_file_name(result.suggested_file_name(T::TOOL.as_str()));
                if let Some(dir) = directory {
                    dialog = dialog.set_directory(dir);
                }

                let Some(path) = dialog.save_file() else {
                    return Action::None;
                };

                remember_folder(settings, &path);
                Action::Run(Task::perform(
                    processing::save(path, result.blob.clone()),
                    PanelMessage::Saved,
                ))
            }
            PanelMessage::Saved(Ok(path)) => {
                self.status = Status::Info(format!("Saved to {}", path.display()));
                Action::None
            }
            PanelMessage::Loaded(_, Err(e))
            | PanelMessage::Processed(_, Err(e))
            | PanelMessage::Saved(Err(e)) => {
                tracing::warn!("⚠️  {}: {}", T::TOOL, e);
                self.job = None;
                self.status = Status::Error(e.to_string());
                Action::None
            }
            PanelMessage::StartOver => {
                // Keep counting so results requested before the reset stay stale
                let generation = self.generation + 1;
                *self = Self {
                    generation,
                    ..Self::new(settings)
                };
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, PanelMessage<T>> {
        let header = column![
            row![button(text("← Back to tools"))
                .on_press(PanelMessage::Back)
                .style(button::text)],
            text(T::TITLE).size(32),
            text(T::TOOL.description()).style(theme::muted),
        ]
        .spacing(6);

        let workspace = row![
            container(self.source_section()).width(Length::FillPortion(3)),
            container(self.options_section()).width(Length::FillPortion(2)),
        ]
        .spacing(24);

        let mut content = Column::new().spacing(24).push(header).push(workspace);

        let status = match &self.status {
            Status::Idle => None,
            Status::Working(message) => Some(text(message.clone()).style(theme::muted)),
            Status::Info(message) => Some(text(message.clone()).style(theme::success)),
            Status::Error(message) => Some(text(message.clone()).style(theme::error)),
        };
        if let Some(status) = status {
            content = content.push(status);
        }

        if let Some(result) = &self.result {
            content = content.push(self.result_section(result));
        }

        container(content).padding(32).max_width(1200.0).into()
    }

    fn source_section(&self) -> Element<'_, PanelMessage<T>> {
        let Some(source) = &self.source else {
            let empty = column![
                text("⇪").size(48).style(theme::accent),
                text("No image selected yet"),
                button(text("Choose image"))
                    .on_press_maybe((!self.is_busy()).then_some(PanelMessage::Pick))
                    .style(button::primary)
                    .padding([10, 20]),
                text("Files are processed on this device and never uploaded.")
                    .size(13)
                    .style(theme::muted),
            ]
            .spacing(12)
            .align_x(Alignment::Center);

            return container(empty)
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT))
                .center_x(Length::Fill)
                .center_y(Length::Fixed(PREVIEW_HEIGHT))
                .style(theme::card)
                .into();
        };

        let preview = container(T::source_view(&self.options, source).map(PanelMessage::Edit))
            .padding(8)
            .style(theme::preview_well);

        let actions = row![
            text(describe_source(source)).size(14).style(theme::muted),
            horizontal_space(),
            button(text("Choose another"))
                .on_press_maybe((!self.is_busy()).then_some(PanelMessage::Pick))
                .style(button::secondary),
            button(text("Start over"))
                .on_press(PanelMessage::StartOver)
                .style(button::text),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        column![preview, actions].spacing(12).into()
    }

    fn options_section(&self) -> Element<'_, PanelMessage<T>> {
        let options = T::options_view(&self.options, self.source.as_ref()).map(PanelMessage::Edit);
        let invalid = self.validation_error();

        let can_process = self.source.is_some() && !self.is_busy() && invalid.is_none();
        let process = button(text(if self.is_busy() { "Working..." } else { "Process" }))
            .on_press_maybe(can_process.then_some(PanelMessage::Process))
            .style(button::primary)
            .padding([10, 20])
            .width(Length::Fill);

        let problem = invalid.map(|e| text(e.to_string()).size(13).style(theme::error));

        let section = Column::new()
            .spacing(16)
            .push(text("Settings").size(20))
            .push(options)
            .push_maybe(problem)
            .push(process);

        container(section)
            .padding(20)
            .width(Length::Fill)
            .style(theme::card)
            .into()
    }

    fn result_section<'a>(&'a self, result: &'a ProcessedImage) -> Element<'a, PanelMessage<T>> {
        let preview = container(
            Image::new(result.preview.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT)),
        )
        .padding(8)
        .width(Length::FillPortion(3))
        .style(theme::preview_well);

        let dimensions = match (result.width, result.height) {
            (Some(w), Some(h)) => format!("{} × {} px", w, h),
            _ => "unknown size".to_string(),
        };

        let mut stats = column![
            text("Result").size(20),
            text(format!("Original: {}", format_bytes(result.original_size))),
            text(format!("New: {}", format_bytes(result.new_size))),
            text(format!("Change: {:+.1}%", result.size_change_percent())),
            text(dimensions).style(theme::muted),
            text(result.mime_type.clone()).style(theme::muted),
            button(text("Save"))
                .on_press(PanelMessage::Save)
                .style(button::success)
                .padding([10, 20])
                .width(Length::Fill),
        ]
        .spacing(8);

        if let (Some(after), Some(source)) = (&result.histogram, &self.source) {
            stats = stats
                .push(text("Before").size(13).style(theme::muted))
                .push(histogram_chart(&source.histogram))
                .push(text("After").size(13).style(theme::muted))
                .push(histogram_chart(after));
        }

        let stats = container(stats)
            .padding(20)
            .width(Length::FillPortion(2))
            .style(theme::card);

        row![preview, stats].spacing(24).into()
    }
}

fn histogram_chart<'a, Message: 'a>(histogram: &'a Histogram) -> Element<'a, Message> {
    canvas(HistogramChart { histogram })
        .width(Length::Fill)
        .height(80)
        .into()
}

/// Store the folder of `path` for the next file dialog
fn remember_folder(settings: &mut Settings, path: &Path) {
    if !settings.remember_directory(path) {
        return;
    }
    if let Some(dir) = &settings.last_directory {
        tracing::debug!("📁 File dialogs now open in {}", dir.display());
    }
}

fn describe_source(source: &SourceImage) -> String {
    let raw = if source.from_raw { " · RAW preview" } else { "" };
    format!(
        "{} · {} × {} · {}{}",
        source.name,
        source.width(),
        source.height(),
        format_bytes(source.size),
        raw
    )
}

/// The view currently shown by the shell
#[derive(Debug)]
pub enum Screen {
    Home,
    Compress(Panel<Compress>),
    Resize(Panel<Resize>),
    Convert(Panel<Convert>),
    Crop(Panel<Crop>),
    Quality(Panel<Enhance>),
    IncreaseSize(Panel<Inflate>),
}

/// Panel message routed to the panel of the matching tool
#[derive(Debug, Clone)]
pub enum ScreenMessage {
    Compress(PanelMessage<Compress>),
    Resize(PanelMessage<Resize>),
    Convert(PanelMessage<Convert>),
    Crop(PanelMessage<Crop>),
    Quality(PanelMessage<Enhance>),
    IncreaseSize(PanelMessage<Inflate>),
}

impl Screen {
    /// A fresh view for `tool`
    pub fn for_tool(tool: ToolType, settings: &Settings) -> Self {
        match tool {
            ToolType::Home => Self::Home,
            ToolType::Compress => Self::Compress(Panel::new(settings)),
            ToolType::Resize => Self::Resize(Panel::new(settings)),
            ToolType::Convert => Self::Convert(Panel::new(settings)),
            ToolType::Crop => Self::Crop(Panel::new(settings)),
            ToolType::Quality => Self::Quality(Panel::new(settings)),
            ToolType::IncreaseSize => Self::IncreaseSize(Panel::new(settings)),
        }
    }

    /// The tool this view renders
    pub fn tool(&self) -> ToolType {
        match self {
            Self::Home => ToolType::Home,
            Self::Compress(_) => Compress::TOOL,
            Self::Resize(_) => Resize::TOOL,
            Self::Convert(_) => Convert::TOOL,
            Self::Crop(_) => Crop::TOOL,
            Self::Quality(_) => Enhance::TOOL,
            Self::IncreaseSize(_) => Inflate::TOOL,
        }
    }

    pub fn update(
        &mut self,
        message: ScreenMessage,
        settings: &mut Settings,
    ) -> Action<ScreenMessage> {
        match (self, message) {
            (Self::Compress(panel), ScreenMessage::Compress(m)) => {
                panel.update(m, settings).map(ScreenMessage::Compress)
            }
            (Self::Resize(panel), ScreenMessage::Resize(m)) => {
                panel.update(m, settings).map(ScreenMessage::Resize)
            }
            (Self::Convert(panel), ScreenMessage::Convert(m)) => {
                panel.update(m, settings).map(ScreenMessage::Convert)
            }
            (Self::Crop(panel), ScreenMessage::Crop(m)) => {
                panel.update(m, settings).map(ScreenMessage::Crop)
            }
            (Self::Quality(panel), ScreenMessage::Quality(m)) => {
                panel.update(m, settings).map(ScreenMessage::Quality)
            }
            (Self::IncreaseSize(panel), ScreenMessage::IncreaseSize(m)) => {
                panel.update(m, settings).map(ScreenMessage::IncreaseSize)
            }
            (screen, _) => {
                // Late result for a panel that has since been closed
                tracing::debug!("dropping panel message while {} is shown", screen.tool());
                Action::None
            }
        }
    }

    /// Render the single child view for the active tool
    pub fn view<'a, Message: Clone + 'a>(
        &'a self,
        on_select: fn(ToolType) -> Message,
        on_panel: fn(ScreenMessage) -> Message,
    ) -> Element<'a, Message> {
        let panel: Element<'a, ScreenMessage> = match self {
            Self::Home => return home::view(on_select),
            Self::Compress(panel) => panel.view().map(ScreenMessage::Compress),
            Self::Resize(panel) => panel.view().map(ScreenMessage::Resize),
            Self::Convert(panel) => panel.view().map(ScreenMessage::Convert),
            Self::Crop(panel) => panel.view().map(ScreenMessage::Crop),
            Self::Quality(panel) => panel.view().map(ScreenMessage::Quality),
            Self::IncreaseSize(panel) => panel.view().map(ScreenMessage::IncreaseSize),
        };
        panel.map(on_panel)
    }
}
