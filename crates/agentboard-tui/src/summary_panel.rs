//! Stage summary chart.
//!
//! One row group per canonical stage: issue count, passed and failed tests as
//! bars scaled against the busiest stage, and the average quality score.

use agentboard_core::StageSummary;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;
use crate::widget::{panel_block, render_bar, BAR_EMPTY, BAR_FILLED};

/// Stage summary chart widget.
pub struct SummaryPanel<'a> {
    summaries: &'a [StageSummary],
    theme: &'a Theme,
    focused: bool,
    compact: bool,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(summaries: &'a [StageSummary], theme: &'a Theme) -> Self {
        Self {
            summaries,
            theme,
            focused: false,
            compact: false,
        }
    }

    /// Set focus state.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// One line per stage instead of the full chart.
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    fn max_tests(&self) -> u64 {
        self.summaries
            .iter()
            .map(|s| s.passed_tests.max(s.failed_tests))
            .max()
            .unwrap_or(0)
    }

    fn stage_label(&self, summary: &StageSummary) -> Span<'static> {
        Span::styled(
            format!("{:<11}", summary.stage.display_name()),
            Style::default()
                .fg(self.theme.colors.header)
                .add_modifier(Modifier::BOLD),
        )
    }

    fn sonar_span(&self, summary: &StageSummary) -> Span<'static> {
        let color = if summary.count == 0 {
            self.theme.colors.text_dim
        } else {
            self.theme.quality_color(summary.avg_sonar)
        };
        Span::styled(format!("sonar {:.1}", summary.avg_sonar), Style::default().fg(color))
    }

    fn compact_lines(&self) -> Vec<Line<'static>> {
        let dim = Style::default().fg(self.theme.colors.text_dim);
        self.summaries
            .iter()
            .map(|s| {
                Line::from(vec![
                    self.stage_label(s),
                    Span::raw(format!("{:>3} ", s.count)),
                    Span::styled(
                        format!("✓{}", s.passed_tests),
                        Style::default().fg(self.theme.colors.status_healthy),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        format!("✗{}", s.failed_tests),
                        if s.failed_tests > 0 {
                            Style::default().fg(self.theme.colors.alert_failed_tests)
                        } else {
                            dim
                        },
                    ),
                    Span::raw("  "),
                    self.sonar_span(s),
                ])
            })
            .collect()
    }

    fn chart_lines(&self, width: usize) -> Vec<Line<'static>> {
        let max = self.max_tests() as f64;
        let bar_width = width.saturating_sub(20).clamp(5, 40);
        let mut lines = Vec::with_capacity(self.summaries.len() * 4);

        for s in self.summaries {
            lines.push(Line::from(vec![
                self.stage_label(s),
                Span::raw(format!(
                    "{} issue{}   ",
                    s.count,
                    if s.count == 1 { "" } else { "s" }
                )),
                self.sonar_span(s),
            ]));
            lines.push(Line::from(vec![
                Span::raw("  passed "),
                Span::styled(
                    render_bar(s.passed_tests as f64, max, bar_width, BAR_FILLED, BAR_EMPTY),
                    Style::default().fg(self.theme.colors.status_healthy),
                ),
                Span::raw(format!(" {}", s.passed_tests)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("  failed "),
                Span::styled(
                    render_bar(s.failed_tests as f64, max, bar_width, BAR_FILLED, BAR_EMPTY),
                    Style::default().fg(self.theme.colors.alert_failed_tests),
                ),
                Span::raw(format!(" {}", s.failed_tests)),
            ]));
            lines.push(Line::raw(""));
        }

        lines
    }
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block("Stage Summary", self.focused, self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = if self.compact {
            self.compact_lines()
        } else {
            self.chart_lines(inner.width as usize)
        };
        Paragraph::new(lines).render(inner, buf);
    }
}
