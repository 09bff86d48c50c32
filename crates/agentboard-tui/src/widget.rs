//! Shared rendering helpers for the agentboard TUI.

use agentboard_core::{IssueRecord, Stage};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
};

use crate::theme::Theme;

/// Filled and empty bar characters.
pub const BAR_FILLED: char = '█';
pub const BAR_EMPTY: char = '░';

/// Completed and pending stage markers.
pub const STAGE_DONE: &str = "●";
pub const STAGE_PENDING: &str = "○";

/// Renders a horizontal bar chart.
pub fn render_bar(value: f64, max: f64, width: usize, filled_char: char, empty_char: char) -> String {
    let pct = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (pct * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    format!(
        "{}{}",
        filled_char.to_string().repeat(filled),
        empty_char.to_string().repeat(empty)
    )
}

/// Truncate a string to at most `max_len` characters, marking the cut with `…`.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 1 {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{}…", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Bordered block with focus-dependent styling.
pub fn panel_block<'a>(title: impl Into<String>, focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if focused {
        Style::default().fg(theme.colors.focus_highlight)
    } else {
        Style::default().fg(theme.colors.border_dim)
    };

    let title_style = if focused {
        Style::default()
            .fg(theme.colors.focus_highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.colors.text)
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", title.into()), title_style))
}

/// One dot per canonical stage, filled when the stage is in the history.
///
/// With `labels` set each dot is followed by the stage's display name.
pub fn stage_dots(issue: &IssueRecord, theme: &Theme, labels: bool) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(Stage::ALL.len() * 2);
    for stage in Stage::ALL {
        let (marker, color) = if issue.has_completed(stage) {
            (STAGE_DONE, theme.colors.stage_done)
        } else {
            (STAGE_PENDING, theme.colors.stage_pending)
        };
        spans.push(Span::styled(marker, Style::default().fg(color)));
        if labels {
            spans.push(Span::styled(
                format!(" {}  ", stage.display_name()),
                Style::default().fg(theme.colors.text_dim),
            ));
        } else {
            spans.push(Span::raw(" "));
        }
    }
    spans
}
