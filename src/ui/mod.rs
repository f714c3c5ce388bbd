/// User interface module
///
/// Views and widgets, kept apart from state:
/// - Header, footer and home view (layout.rs, home.rs)
/// - Tool panels and the view dispatch (tools/)
/// - Canvas programs (canvas.rs, histogram.rs)
pub mod canvas;
pub mod histogram;
pub mod home;
pub mod layout;
pub mod theme;
pub mod tools;
