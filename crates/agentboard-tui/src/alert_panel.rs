//! Alert panel: the three alert buckets with their counts and entries.

use agentboard_core::{AlertKind, DerivedView};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;
use crate::widget::{panel_block, truncate_string};

/// Alert buckets computed over the visible issues.
pub struct AlertPanel<'a> {
    view: &'a DerivedView,
    theme: &'a Theme,
    focused: bool,
    /// Maximum entries listed under each heading
    max_entries: usize,
}

impl<'a> AlertPanel<'a> {
    pub fn new(view: &'a DerivedView, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            focused: false,
            max_entries: 5,
        }
    }

    /// Set focus state.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Limit entries per bucket.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for kind in AlertKind::ALL {
            let count = self.view.alert_counts.get(kind);
            let color = self.theme.alert_color(kind);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", kind.title()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("({})", count), Style::default().fg(color)),
            ]));

            if count == 0 {
                lines.push(Line::styled(
                    "  none",
                    Style::default().fg(self.theme.colors.text_dim),
                ));
                continue;
            }

            for entry in self.view.alert_entries(kind).take(self.max_entries) {
                lines.push(Line::raw(format!(
                    "  {}",
                    truncate_string(&kind.describe(&entry.record), width.saturating_sub(2))
                )));
            }
            if count > self.max_entries {
                lines.push(Line::styled(
                    format!("  … {} more", count - self.max_entries),
                    Style::default().fg(self.theme.colors.text_dim),
                ));
            }
        }

        lines
    }
}

impl Widget for AlertPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block("Alerts", self.focused, self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.build_lines(inner.width as usize)).render(inner, buf);
    }
}

/// One-line alert counts for narrow layouts.
pub fn format_alert_summary_narrow(view: &DerivedView) -> String {
    AlertKind::ALL
        .iter()
        .map(|kind| format!("{}: {}", kind.title(), view.alert_counts.get(*kind)))
        .collect::<Vec<_>>()
        .join(" | ")
}
