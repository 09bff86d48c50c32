//! Issue cards, the scrolling card list, and the issue detail pane.

use agentboard_core::{IssueView, Stage};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::Theme;
use crate::widget::{panel_block, render_bar, stage_dots, truncate_string, BAR_EMPTY, BAR_FILLED};

/// Rows one card occupies, borders included.
pub const CARD_HEIGHT: u16 = 9;

const BAR_WIDTH: usize = 12;

/// Badge spans for every alert bucket the issue is in.
fn badge_spans(issue: &IssueView, theme: &Theme) -> Vec<Span<'static>> {
    issue
        .alerts
        .kinds()
        .flat_map(|kind| {
            [
                Span::styled(
                    format!("[{}]", kind.badge()),
                    Style::default()
                        .fg(theme.alert_color(kind))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]
        })
        .collect()
}

/// "Tests" line: passed/failed bar, or a placeholder when no tests ran.
fn tests_line(issue: &IssueView, theme: &Theme) -> Line<'static> {
    let record = &issue.record;
    let total = record.total();
    if total == 0 {
        return Line::from(vec![
            Span::raw("Tests  "),
            Span::styled("no test data", Style::default().fg(theme.colors.text_dim)),
        ]);
    }

    let color = if issue.alerts.failed_tests {
        theme.colors.alert_failed_tests
    } else {
        theme.colors.status_healthy
    };
    Line::from(vec![
        Span::raw("Tests  "),
        Span::styled(
            render_bar(record.passed() as f64, total as f64, BAR_WIDTH, BAR_FILLED, BAR_EMPTY),
            Style::default().fg(color),
        ),
        Span::raw(format!(" {}/{} passed", record.passed(), total)),
        Span::styled(
            format!(", {} failed", record.failed()),
            Style::default().fg(if record.failed() > 0 {
                theme.colors.alert_failed_tests
            } else {
                theme.colors.text_dim
            }),
        ),
    ])
}

/// "Sonar" line: quality bar, or n/a when the score is missing.
fn sonar_line(issue: &IssueView, theme: &Theme) -> Line<'static> {
    match issue.record.sonar_quality {
        Some(quality) => Line::from(vec![
            Span::raw("Sonar  "),
            Span::styled(
                render_bar(quality, 100.0, BAR_WIDTH, BAR_FILLED, BAR_EMPTY),
                Style::default().fg(theme.quality_color(quality)),
            ),
            Span::raw(format!(" {}%", quality)),
        ]),
        None => Line::from(vec![
            Span::raw("Sonar  "),
            Span::styled("n/a", Style::default().fg(theme.colors.text_dim)),
        ]),
    }
}

/// Compact card for one issue.
pub struct IssueCard<'a> {
    issue: &'a IssueView,
    theme: &'a Theme,
    selected: bool,
}

impl<'a> IssueCard<'a> {
    pub fn new(issue: &'a IssueView, theme: &'a Theme) -> Self {
        Self {
            issue,
            theme,
            selected: false,
        }
    }

    /// Highlight the card as the current selection.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let record = &self.issue.record;
        let theme = self.theme;
        let mut lines = Vec::with_capacity(7);

        let mut header = vec![
            Span::styled(
                record.fsm_state.clone(),
                Style::default().fg(theme.colors.header).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" · "),
            Span::styled(
                if record.workflow_status.is_empty() {
                    "-".to_string()
                } else {
                    record.workflow_status.clone()
                },
                Style::default().fg(theme.colors.text_dim),
            ),
            Span::raw(format!(" · {}%  ", self.issue.completion_percent)),
        ];
        header.extend(badge_spans(self.issue, theme));
        lines.push(Line::from(header));

        let plan = if record.plan.is_empty() {
            "(no plan)".to_string()
        } else {
            record.plan.replace('\n', " ")
        };
        lines.push(Line::from(vec![
            Span::raw("Plan   "),
            Span::styled(
                truncate_string(&plan, width.saturating_sub(7)),
                Style::default().fg(theme.colors.text),
            ),
        ]));

        let mut stages = vec![Span::raw("Stages ")];
        stages.extend(stage_dots(record, theme, false));
        lines.push(Line::from(stages));

        lines.push(tests_line(self.issue, theme));
        lines.push(sonar_line(self.issue, theme));

        if let Some(rounds) = record.auto_fix_rounds {
            lines.push(Line::from(vec![
                Span::raw("Auto-fix rounds: "),
                Span::styled(rounds.to_string(), Style::default().fg(theme.colors.hotkey)),
            ]));
        }

        if let Some(url) = record.pr_link() {
            lines.push(Line::from(vec![
                Span::raw("PR "),
                Span::styled(
                    truncate_string(url, width.saturating_sub(3)),
                    Style::default()
                        .fg(theme.colors.alert_pr_ready)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }

        lines
    }
}

impl Widget for IssueCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block(
            format!("Issue {}", self.issue.record.issue_id),
            self.selected,
            self.theme,
        );
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.build_lines(inner.width as usize);
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Vertical list of cards that keeps the selection in view.
pub struct IssueList<'a> {
    issues: &'a [IssueView],
    theme: &'a Theme,
    selected: usize,
    empty_message: String,
}

impl<'a> IssueList<'a> {
    pub fn new(issues: &'a [IssueView], theme: &'a Theme) -> Self {
        Self {
            issues,
            theme,
            selected: 0,
            empty_message: "No issues".to_string(),
        }
    }

    /// Set the selected issue index.
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    /// Message shown when there is nothing to list.
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Index of the first card drawn when `visible` cards fit.
    pub fn first_visible(selected: usize, visible: usize) -> usize {
        selected.saturating_sub(visible.saturating_sub(1))
    }
}

impl Widget for IssueList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.issues.is_empty() {
            Paragraph::new(self.empty_message)
                .style(Style::default().fg(self.theme.colors.text_dim))
                .block(panel_block("Issues", false, self.theme))
                .render(area, buf);
            return;
        }

        let visible = (area.height / CARD_HEIGHT).max(1) as usize;
        let start = Self::first_visible(self.selected, visible);

        for (slot, (index, issue)) in self
            .issues
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .enumerate()
        {
            let y = area.y + slot as u16 * CARD_HEIGHT;
            let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
            if height == 0 {
                break;
            }
            let card_area = Rect::new(area.x, y, area.width, height);
            IssueCard::new(issue, self.theme)
                .selected(index == self.selected)
                .render(card_area, buf);
        }
    }
}

/// Full detail for one issue: plan, per-stage logs, metrics and PR link.
pub struct IssueDetail<'a> {
    issue: Option<&'a IssueView>,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> IssueDetail<'a> {
    pub fn new(issue: Option<&'a IssueView>, theme: &'a Theme) -> Self {
        Self {
            issue,
            theme,
            focused: false,
        }
    }

    /// Set focus state.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn build_lines(issue: &IssueView, theme: &Theme) -> Vec<Line<'static>> {
        let record = &issue.record;
        let label = Style::default().fg(theme.colors.text_dim);
        let mut lines = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("State: ", label),
            Span::styled(
                record.fsm_state.clone(),
                Style::default().fg(theme.colors.header).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Status: ", label),
            Span::raw(record.workflow_status.clone()),
            Span::styled("   Completion: ", label),
            Span::raw(format!("{}%", issue.completion_percent)),
        ]));

        let badges = badge_spans(issue, theme);
        if !badges.is_empty() {
            lines.push(Line::from(badges));
        }

        lines.push(Line::raw(""));
        lines.push(Line::styled("Plan", label.add_modifier(Modifier::BOLD)));
        lines.push(Line::raw(if record.plan.is_empty() {
            "(no plan)".to_string()
        } else {
            record.plan.clone()
        }));

        lines.push(Line::raw(""));
        lines.push(Line::styled("Stages", label.add_modifier(Modifier::BOLD)));
        for stage in Stage::ALL {
            lines.push(Self::stage_line(record, stage, theme));
        }

        lines.push(Line::raw(""));
        lines.push(tests_line(issue, theme));
        lines.push(sonar_line(issue, theme));
        if let Some(rounds) = record.auto_fix_rounds {
            lines.push(Line::raw(format!("Auto-fix rounds: {}", rounds)));
        }
        if let Some(url) = record.pr_link() {
            lines.push(Line::from(vec![
                Span::raw("PR: "),
                Span::styled(
                    url.to_string(),
                    Style::default()
                        .fg(theme.colors.alert_pr_ready)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }

        lines
    }

    /// A stage row; the log appears only for completed stages that have one.
    fn stage_line(record: &agentboard_core::IssueRecord, stage: Stage, theme: &Theme) -> Line<'static> {
        let done = record.has_completed(stage);
        let (marker, color) = if done {
            (crate::widget::STAGE_DONE, theme.colors.stage_done)
        } else {
            (crate::widget::STAGE_PENDING, theme.colors.stage_pending)
        };

        let mut spans = vec![
            Span::styled(format!("{} ", marker), Style::default().fg(color)),
            Span::styled(
                format!("{:<11}", stage.display_name()),
                Style::default().fg(if done {
                    theme.colors.text
                } else {
                    theme.colors.text_dim
                }),
            ),
        ];
        if let Some(log) = record.stage_log(stage) {
            spans.push(Span::styled(
                log.replace('\n', " "),
                Style::default().fg(theme.colors.text_dim),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for IssueDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.issue {
            Some(issue) => format!("Issue {}", issue.record.issue_id),
            None => "Issue".to_string(),
        };
        let block = panel_block(title, self.focused, self.theme);

        let Some(issue) = self.issue else {
            Paragraph::new("No issue selected")
                .style(Style::default().fg(self.theme.colors.text_dim))
                .block(block)
                .render(area, buf);
            return;
        };

        Paragraph::new(Self::build_lines(issue, self.theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
