/// State management module
///
/// This module holds the application state that does not depend on iced
/// widgets:
/// - The seven views and their navigation entries (tool.rs)
/// - Shell navigation state (shell.rs)
/// - Loaded and processed images (data.rs)
pub mod data;
pub mod shell;
pub mod tool;
