//! Navigation state of the application shell.
//!
//! The shell only knows which view is active and whether the compact
//! navigation menu is showing. Rendering the matching view is up to the app.

use super::tool::ToolType;

/// Windows narrower than this use the compact (menu) navigation
pub const COMPACT_BREAKPOINT: f32 = 768.0;

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// The requested tool was already active
    Stayed,
    /// The active tool changed
    Moved { from: ToolType, to: ToolType },
}

impl Transition {
    /// The main content must snap back to the top after every change
    pub fn resets_scroll(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    active_tool: ToolType,
    menu_open: bool,
    compact: bool,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self {
            active_tool: ToolType::Home,
            menu_open: false,
            compact: false,
        }
    }

    pub fn active_tool(&self) -> ToolType {
        self.active_tool
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Make `tool` the active view
    pub fn select_tool(&mut self, tool: ToolType) -> Transition {
        if self.active_tool == tool {
            return Transition::Stayed;
        }

        let from = self.active_tool;
        self.active_tool = tool;
        tracing::debug!("🧭 {} → {}", from, tool);

        Transition::Moved { from, to: tool }
    }

    pub fn go_home(&mut self) -> Transition {
        self.select_tool(ToolType::Home)
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Selection from the compact menu also closes it
    pub fn select_from_menu(&mut self, tool: ToolType) -> Transition {
        let transition = self.select_tool(tool);
        self.menu_open = false;
        transition
    }

    /// Track the window width; the menu closes once the full nav bar is back
    pub fn set_viewport_width(&mut self, width: f32) {
        self.compact = width < COMPACT_BREAKPOINT;
        if !self.compact {
            self.menu_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let shell = Shell::new();
        assert_eq!(shell.active_tool(), ToolType::Home);
        assert!(!shell.is_menu_open());
        assert!(!shell.is_compact());
    }

    #[test]
    fn test_every_change_resets_scroll() {
        let mut shell = Shell::new();
        for tool in ToolType::ALL.into_iter().skip(1) {
            let transition = shell.select_tool(tool);
            assert!(transition.resets_scroll());
            assert_eq!(shell.active_tool(), tool);
        }
    }

    #[test]
    fn test_reselecting_does_not_reset_scroll() {
        let mut shell = Shell::new();
        let _ = shell.select_tool(ToolType::Crop);
        assert_eq!(shell.select_tool(ToolType::Crop), Transition::Stayed);
        assert!(!shell.select_tool(ToolType::Crop).resets_scroll());
    }

    #[test]
    fn test_any_tool_reaches_any_other() {
        let mut shell = Shell::new();
        for from in ToolType::ALL {
            for to in ToolType::ALL {
                let _ = shell.select_tool(from);
                let _ = shell.select_tool(to);
                assert_eq!(shell.active_tool(), to);
            }
        }
    }

    #[test]
    fn test_go_home_from_every_tool() {
        let mut shell = Shell::new();
        for tool in ToolType::ALL {
            let _ = shell.select_tool(tool);
            let _ = shell.go_home();
            assert_eq!(shell.active_tool(), ToolType::Home);
        }
    }

    #[test]
    fn test_menu_selection_closes_menu() {
        let mut shell = Shell::new();
        shell.set_viewport_width(480.0);
        shell.toggle_menu();
        assert!(shell.is_menu_open());

        let transition = shell.select_from_menu(ToolType::Resize);
        assert_eq!(
            transition,
            Transition::Moved {
                from: ToolType::Home,
                to: ToolType::Resize
            }
        );
        assert_eq!(shell.active_tool(), ToolType::Resize);
        assert!(!shell.is_menu_open());
    }

    #[test]
    fn test_menu_closes_even_when_tool_unchanged() {
        let mut shell = Shell::new();
        shell.toggle_menu();
        let _ = shell.select_from_menu(ToolType::Home);
        assert!(!shell.is_menu_open());
    }

    #[test]
    fn test_toggle_menu_flips() {
        let mut shell = Shell::new();
        shell.toggle_menu();
        shell.toggle_menu();
        assert!(!shell.is_menu_open());
    }

    #[test]
    fn test_widening_window_closes_menu() {
        let mut shell = Shell::new();
        shell.set_viewport_width(600.0);
        assert!(shell.is_compact());
        shell.toggle_menu();

        shell.set_viewport_width(1200.0);
        assert!(!shell.is_compact());
        assert!(!shell.is_menu_open());
    }
}
