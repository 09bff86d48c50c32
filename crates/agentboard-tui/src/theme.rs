//! Color themes for the agentboard TUI with runtime switching.

use agentboard_core::filter::LOW_SONAR_THRESHOLD;
use agentboard_core::AlertKind;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme name identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    /// Enhanced contrast
    Dark,
    /// For bright environments
    Light,
}

impl ThemeName {
    /// All available themes in cycle order.
    pub fn all() -> &'static [ThemeName] {
        &[ThemeName::Default, ThemeName::Dark, ThemeName::Light]
    }

    /// Get the next theme in the cycle.
    pub fn next(&self) -> ThemeName {
        let themes = Self::all();
        let current_idx = themes.iter().position(|t| t == self).unwrap_or(0);
        themes[(current_idx + 1) % themes.len()]
    }

    /// Get the display name for this theme.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Default => "Default",
            ThemeName::Dark => "Dark",
            ThemeName::Light => "Light",
        }
    }

    /// Parse a theme name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(ThemeName::Default),
            "dark" => Some(ThemeName::Dark),
            "light" => Some(ThemeName::Light),
            _ => None,
        }
    }
}

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Primary headers and focused borders
    pub header: Color,
    /// Hotkey hints
    pub hotkey: Color,
    /// Normal text
    pub text: Color,
    /// Secondary text (timestamps, dim info)
    pub text_dim: Color,
    /// Unfocused borders
    pub border_dim: Color,
    /// Selected card border
    pub focus_highlight: Color,
    pub status_healthy: Color,
    pub status_warning: Color,
    pub status_error: Color,
    /// Alert: pull request ready
    pub alert_pr_ready: Color,
    /// Alert: failing tests
    pub alert_failed_tests: Color,
    /// Alert: low quality score
    pub alert_low_sonar: Color,
    /// Completed stage dot
    pub stage_done: Color,
    /// Pending stage dot
    pub stage_pending: Color,
}

/// Complete theme definition.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    /// The default palette.
    pub fn default_theme() -> Self {
        Self {
            name: ThemeName::Default,
            colors: ThemeColors {
                header: Color::Cyan,
                hotkey: Color::Yellow,
                text: Color::White,
                text_dim: Color::Gray,
                border_dim: Color::DarkGray,
                focus_highlight: Color::Cyan,
                status_healthy: Color::Green,
                status_warning: Color::Yellow,
                status_error: Color::Red,
                alert_pr_ready: Color::Green,
                alert_failed_tests: Color::Red,
                alert_low_sonar: Color::Yellow,
                stage_done: Color::Green,
                stage_pending: Color::DarkGray,
            },
        }
    }

    /// Dark theme (enhanced contrast).
    pub fn dark_theme() -> Self {
        Self {
            name: ThemeName::Dark,
            colors: ThemeColors {
                header: Color::LightBlue,
                hotkey: Color::LightYellow,
                text: Color::White,
                text_dim: Color::DarkGray,
                border_dim: Color::Rgb(60, 60, 60),
                focus_highlight: Color::LightYellow,
                status_healthy: Color::LightGreen,
                status_warning: Color::LightYellow,
                status_error: Color::LightRed,
                alert_pr_ready: Color::LightGreen,
                alert_failed_tests: Color::LightRed,
                alert_low_sonar: Color::LightYellow,
                stage_done: Color::LightGreen,
                stage_pending: Color::Rgb(70, 70, 70),
            },
        }
    }

    /// Light theme (for bright environments).
    pub fn light_theme() -> Self {
        Self {
            name: ThemeName::Light,
            colors: ThemeColors {
                header: Color::Blue,
                hotkey: Color::DarkGray,
                text: Color::Black,
                text_dim: Color::DarkGray,
                border_dim: Color::Gray,
                focus_highlight: Color::Rgb(0, 100, 255),
                status_healthy: Color::Green,
                status_warning: Color::Rgb(180, 120, 0),
                status_error: Color::Red,
                alert_pr_ready: Color::Green,
                alert_failed_tests: Color::Red,
                alert_low_sonar: Color::Rgb(180, 120, 0),
                stage_done: Color::Green,
                stage_pending: Color::Gray,
            },
        }
    }

    /// Get a theme by name.
    pub fn by_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default_theme(),
            ThemeName::Dark => Self::dark_theme(),
            ThemeName::Light => Self::light_theme(),
        }
    }

    /// Color for an alert bucket.
    pub fn alert_color(&self, kind: AlertKind) -> Color {
        match kind {
            AlertKind::PrReady => self.colors.alert_pr_ready,
            AlertKind::FailedTests => self.colors.alert_failed_tests,
            AlertKind::LowSonar => self.colors.alert_low_sonar,
        }
    }

    /// Color for a quality score.
    pub fn quality_color(&self, quality: f64) -> Color {
        if quality < LOW_SONAR_THRESHOLD {
            self.colors.status_error
        } else if quality < 85.0 {
            self.colors.status_warning
        } else {
            self.colors.status_healthy
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

/// Holds the active theme and switches between themes.
#[derive(Debug, Default)]
pub struct ThemeManager {
    current: Theme,
}

impl ThemeManager {
    /// Create a new theme manager with default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a theme manager starting on a specific theme.
    pub fn with_theme(name: ThemeName) -> Self {
        Self {
            current: Theme::by_name(name),
        }
    }

    /// Create a theme manager from a configured theme name.
    ///
    /// Unknown names fall back to the default theme.
    pub fn from_config(name: &str) -> Self {
        match ThemeName::parse(name) {
            Some(theme) => Self::with_theme(theme),
            None => {
                tracing::warn!(theme = name, "Unknown theme, using default");
                Self::new()
            }
        }
    }

    /// Get the current theme.
    pub fn current(&self) -> &Theme {
        &self.current
    }

    /// Switch to the next theme in the cycle.
    pub fn cycle_theme(&mut self) -> ThemeName {
        let next_name = self.current.name.next();
        self.current = Theme::by_name(next_name);
        tracing::debug!(theme = next_name.display_name(), "Switched theme");
        next_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_name_cycle() {
        assert_eq!(ThemeName::Default.next(), ThemeName::Dark);
        assert_eq!(ThemeName::Dark.next(), ThemeName::Light);
        assert_eq!(ThemeName::Light.next(), ThemeName::Default);
    }

    #[test]
    fn test_theme_name_parse() {
        assert_eq!(ThemeName::parse("default"), Some(ThemeName::Default));
        assert_eq!(ThemeName::parse("Dark"), Some(ThemeName::Dark));
        assert_eq!(ThemeName::parse("light"), Some(ThemeName::Light));
        assert_eq!(ThemeName::parse("cyberpunk"), None);
    }

    #[test]
    fn test_alert_colors() {
        let theme = Theme::default_theme();
        assert_eq!(theme.alert_color(AlertKind::PrReady), Color::Green);
        assert_eq!(theme.alert_color(AlertKind::FailedTests), Color::Red);
        assert_eq!(theme.alert_color(AlertKind::LowSonar), Color::Yellow);
    }

    #[test]
    fn test_quality_colors() {
        let theme = Theme::default_theme();
        assert_eq!(theme.quality_color(65.0), Color::Red);
        assert_eq!(theme.quality_color(70.0), Color::Yellow);
        assert_eq!(theme.quality_color(95.0), Color::Green);
    }

    #[test]
    fn test_theme_manager_cycle() {
        let mut manager = ThemeManager::new();
        assert_eq!(manager.current().name, ThemeName::Default);

        let next = manager.cycle_theme();
        assert_eq!(next, ThemeName::Dark);
        assert_eq!(manager.current().name, ThemeName::Dark);
    }

    #[test]
    fn test_theme_manager_from_config() {
        assert_eq!(ThemeManager::from_config("light").current().name, ThemeName::Light);
        assert_eq!(ThemeManager::from_config("neon").current().name, ThemeName::Default);
    }

    #[test]
    fn test_all_themes_have_different_colors() {
        let themes = [Theme::default_theme(), Theme::dark_theme(), Theme::light_theme()];

        for (i, theme_a) in themes.iter().enumerate() {
            for theme_b in themes.iter().skip(i + 1) {
                let colors_match = theme_a.colors.header == theme_b.colors.header
                    && theme_a.colors.hotkey == theme_b.colors.hotkey
                    && theme_a.colors.text == theme_b.colors.text;

                assert!(!colors_match, "Themes should have different colors");
            }
        }
    }
}
