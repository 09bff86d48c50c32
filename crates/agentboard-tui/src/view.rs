//! View types and navigation for the agentboard TUI.

use std::fmt;

/// Screens available in the dashboard.
///
/// Views can be switched using hotkeys or the Tab key to cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Alerts, stage summary and issue cards together
    #[default]
    Overview,
    /// Issue cards with a detail pane for the selected issue
    Issues,
    /// Full per-stage summary chart
    Summary,
}

impl View {
    /// All views in display order (for Tab cycling).
    pub const ALL: [View; 3] = [View::Overview, View::Issues, View::Summary];

    /// Returns the hotkey character for this view.
    pub fn hotkey(&self) -> char {
        match self {
            View::Overview => 'o',
            View::Issues => 'i',
            View::Summary => 's',
        }
    }

    /// Returns the display title for this view.
    pub fn title(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Issues => "Issues",
            View::Summary => "Summary",
        }
    }

    /// Returns the next view in the cycle (for Tab navigation).
    pub fn next(&self) -> View {
        let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Returns the previous view in the cycle (for Shift+Tab navigation).
    pub fn prev(&self) -> View {
        let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
        if idx == 0 {
            Self::ALL[Self::ALL.len() - 1]
        } else {
            Self::ALL[idx - 1]
        }
    }

    /// Try to parse a view from a hotkey character.
    pub fn from_hotkey(key: char) -> Option<View> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|v| v.hotkey() == key)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Layout mode based on terminal dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Wide layout (120+ cols): panels side by side.
    Wide,
    /// Narrow layout (<120 cols): panels stacked.
    Narrow,
}

impl LayoutMode {
    /// Determine the layout mode based on terminal width.
    pub fn from_width(width: u16) -> Self {
        if width >= 120 {
            LayoutMode::Wide
        } else {
            LayoutMode::Narrow
        }
    }
}
