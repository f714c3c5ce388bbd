//! The selectable application modes and the navigation entries built from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven views the shell can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    #[default]
    Home,
    Compress,
    Resize,
    Convert,
    Crop,
    Quality,
    IncreaseSize,
}

impl ToolType {
    /// Every view, in declaration order
    pub const ALL: [ToolType; 7] = [
        ToolType::Home,
        ToolType::Compress,
        ToolType::Resize,
        ToolType::Convert,
        ToolType::Crop,
        ToolType::Quality,
        ToolType::IncreaseSize,
    ];

    /// Stable string tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Compress => "compress",
            Self::Resize => "resize",
            Self::Convert => "convert",
            Self::Crop => "crop",
            Self::Quality => "quality",
            Self::IncreaseSize => "increase_size",
        }
    }

    /// Label shown in the navigation bar
    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Compress => "Compress",
            Self::Resize => "Resize",
            Self::Convert => "Convert",
            Self::Crop => "Crop",
            Self::Quality => "Enhance",
            Self::IncreaseSize => "Enlarge File",
        }
    }

    /// Glyph used as the navigation icon
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Home => "⌂",
            Self::Compress => "⇲",
            Self::Resize => "⤢",
            Self::Convert => "⟳",
            Self::Crop => "⌗",
            Self::Quality => "⚡",
            Self::IncreaseSize => "⊞",
        }
    }

    /// One-line summary used on the home cards
    pub fn description(&self) -> &'static str {
        match self {
            Self::Home => "Pick a tool to get started.",
            Self::Compress => "Shrink file size with adjustable quality or a target size.",
            Self::Resize => "Change dimensions by pixels or percentage.",
            Self::Convert => "Switch between JPEG, PNG, WebP, BMP, GIF and TIFF.",
            Self::Crop => "Cut out the part that matters, freehand or by ratio.",
            Self::Quality => "Upscale, sharpen and tune contrast and brightness.",
            Self::IncreaseSize => "Pad a file up to an exact size without touching pixels.",
        }
    }

    pub fn is_home(&self) -> bool {
        *self == Self::Home
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolType {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == tag)
            .ok_or_else(|| format!("Unknown tool: {}", tag))
    }
}

/// A navigation entry: which tool it opens, its label and its icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub tool: ToolType,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Navigation entries in display order
pub fn nav_items() -> Vec<NavItem> {
    [
        ToolType::Home,
        ToolType::Compress,
        ToolType::IncreaseSize,
        ToolType::Resize,
        ToolType::Convert,
        ToolType::Crop,
        ToolType::Quality,
    ]
    .into_iter()
    .map(|tool| NavItem {
        tool,
        label: tool.label(),
        icon: tool.icon(),
    })
    .collect()
}
