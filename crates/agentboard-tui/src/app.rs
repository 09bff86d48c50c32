//! Main application state and logic for the agentboard TUI.
//!
//! The `App` struct owns the view state (current view, filter, selection),
//! recomputes the derived issue view whenever the snapshot or filter changes,
//! and draws everything each frame.

use std::io;
use std::time::{Duration, Instant};

use agentboard_client::WorkflowSnapshot;
use agentboard_config::BoardConfig;
use agentboard_core::{DerivedView, IssueFilter, IssueView};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info};

use crate::alert_panel::{format_alert_summary_narrow, AlertPanel};
use crate::data::DashboardData;
use crate::event::{AppEvent, InputHandler};
use crate::issue_card::{IssueDetail, IssueList, CARD_HEIGHT};
use crate::summary_panel::SummaryPanel;
use crate::theme::ThemeManager;
use crate::view::{LayoutMode, View};
use crate::widget::{panel_block, truncate_string};

/// Result type for app operations.
pub type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Target frame rate.
const TARGET_FPS: u64 = 30;
const FRAME_DURATION: Duration = Duration::from_millis(1000 / TARGET_FPS);

/// How often poll events are drained from the background poller.
const DATA_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Header timestamp cache duration (update every second).
const TIMESTAMP_CACHE_DURATION: Duration = Duration::from_secs(1);

/// Issues skipped by PageUp/PageDown.
const PAGE_SIZE: usize = 5;

/// Width of the left column in wide layouts.
const SIDE_COLUMN_WIDTH: u16 = 54;

/// Main application state.
pub struct App {
    /// Current active view
    current_view: View,
    /// Previous view (for back navigation)
    previous_view: Option<View>,
    input_handler: InputHandler,
    should_quit: bool,
    show_help: bool,
    /// Status message shown in the footer
    status_message: Option<String>,
    /// Active issue filter
    filter: IssueFilter,
    /// Filtered issues, alert counts and stage summary for the current snapshot
    derived: DerivedView,
    /// Snapshot revision `derived` was computed from
    derived_revision: Option<u64>,
    /// Index into `derived.filtered_issues`
    selected: usize,
    data: DashboardData,
    theme_manager: ThemeManager,
    /// Dirty flag - whether UI needs redraw
    dirty: bool,
    last_poll_time: Instant,
    /// Cached timestamp for header (updated every second)
    cached_timestamp: Option<String>,
    last_timestamp_update: Instant,
}

impl App {
    /// Create an app over the given data source.
    pub fn new(data: DashboardData, theme_manager: ThemeManager) -> Self {
        let mut app = Self {
            current_view: View::default(),
            previous_view: None,
            input_handler: InputHandler::new(),
            should_quit: false,
            show_help: false,
            status_message: None,
            filter: IssueFilter::default(),
            derived: DerivedView::default(),
            derived_revision: None,
            selected: 0,
            data,
            theme_manager,
            dirty: true,
            last_poll_time: Instant::now(),
            cached_timestamp: None,
            last_timestamp_update: Instant::now(),
        };
        app.recompute_view();
        app
    }

    /// Create an app that polls the backend named in `config`.
    pub fn from_config(config: &BoardConfig) -> AppResult<Self> {
        let data = DashboardData::connect(config)?;
        Ok(Self::new(data, ThemeManager::from_config(&config.dashboard.theme)))
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn filter(&self) -> IssueFilter {
        self.filter
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Index of the selected issue within the filtered list.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// The view derived from the latest snapshot and the active filter.
    pub fn derived_view(&self) -> &DerivedView {
        &self.derived
    }

    pub fn snapshot(&self) -> &WorkflowSnapshot {
        self.data.snapshot()
    }

    /// The selected issue, if the filtered list is not empty.
    pub fn selected_issue(&self) -> Option<&IssueView> {
        self.derived.filtered_issues.get(self.selected)
    }

    /// Replace the snapshot and rebuild the derived view.
    pub fn replace_snapshot(&mut self, snapshot: WorkflowSnapshot) {
        self.data.set_snapshot(snapshot);
        self.recompute_view();
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if UI needs redraw and clear the dirty flag.
    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn get_cached_timestamp(&mut self) -> String {
        if self.cached_timestamp.is_none() || self.last_timestamp_update.elapsed() >= TIMESTAMP_CACHE_DURATION {
            self.cached_timestamp = Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
            self.last_timestamp_update = Instant::now();
        }
        self.cached_timestamp.clone().unwrap_or_default()
    }

    fn recompute_view(&mut self) {
        let snapshot = self.data.snapshot();
        self.derived = DerivedView::compute(snapshot.issues(), self.filter);
        self.derived_revision = Some(snapshot.revision());

        let len = self.derived.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Recompute the derived view only if the snapshot moved on.
    fn sync_view(&mut self) {
        if self.derived_revision != Some(self.data.snapshot().revision()) {
            self.recompute_view();
        }
    }

    /// Drain poll events and refresh the derived view. Returns true if
    /// anything changed.
    pub fn poll_data(&mut self) -> bool {
        let changed = self.data.poll_updates();
        if changed {
            self.sync_view();
            self.mark_dirty();
        }
        self.last_poll_time = Instant::now();
        changed
    }

    /// Change the active filter.
    pub fn set_filter(&mut self, filter: IssueFilter) {
        if self.filter == filter {
            return;
        }
        debug!(filter = filter.name(), "Filter changed");
        self.filter = filter;
        self.selected = 0;
        self.recompute_view();
        self.status_message = Some(format!(
            "Filter: {} ({} issue{})",
            filter.title(),
            self.derived.len(),
            if self.derived.len() == 1 { "" } else { "s" }
        ));
        self.mark_dirty();
    }

    /// Switch to a specific view.
    pub fn switch_view(&mut self, view: View) {
        if self.current_view != view {
            self.previous_view = Some(self.current_view);
            self.current_view = view;
            self.status_message = Some(format!(
                "{} (Press {} to return here)",
                view.title(),
                view.hotkey()
            ));
            self.mark_dirty();
        }
    }

    pub fn next_view(&mut self) {
        let next = self.current_view.next();
        self.switch_view(next);
    }

    pub fn prev_view(&mut self) {
        let prev = self.current_view.prev();
        self.switch_view(prev);
    }

    /// Go back to the previous view (if any).
    pub fn go_back(&mut self) {
        if let Some(prev) = self.previous_view.take() {
            self.switch_view(prev);
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.derived.len();
        if len == 0 {
            return;
        }
        let target = self.selected.saturating_add_signed(delta).min(len - 1);
        if target != self.selected {
            self.selected = target;
            self.mark_dirty();
        }
    }

    /// Handle a raw terminal event.
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            other => {
                let event = self.input_handler.handle_event(other);
                self.handle_app_event(event);
            }
        }
    }

    /// Handle a key event. While help is open any key closes it.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Release and repeat reports would replay the keystroke.
        if key.kind != KeyEventKind::Press {
            return;
        }
        let event = self.input_handler.handle_key(key);
        if self.show_help {
            match event {
                AppEvent::ForceQuit => self.handle_app_event(event),
                AppEvent::None => {}
                _ => {
                    self.show_help = false;
                    self.mark_dirty();
                }
            }
            return;
        }
        self.handle_app_event(event);
    }

    /// Handle an application event.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SwitchView(view) => self.switch_view(view),
            AppEvent::NextView => self.next_view(),
            AppEvent::PrevView => self.prev_view(),
            AppEvent::SetFilter(filter) => self.set_filter(filter),
            AppEvent::CycleFilter => self.set_filter(self.filter.next()),
            AppEvent::ShowHelp => {
                self.show_help = true;
                self.mark_dirty();
            }
            AppEvent::Quit | AppEvent::ForceQuit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            AppEvent::Refresh => {
                self.status_message = Some(if self.data.is_live() {
                    self.data.refresh_now();
                    "Refreshing workflow...".to_string()
                } else {
                    "Offline: no backend to refresh".to_string()
                });
                self.mark_dirty();
            }
            AppEvent::Redraw => self.mark_dirty(),
            AppEvent::Cancel => {
                if self.show_help {
                    self.show_help = false;
                    self.mark_dirty();
                } else {
                    self.go_back();
                }
            }
            AppEvent::NavigateUp => self.move_selection(-1),
            AppEvent::NavigateDown => self.move_selection(1),
            AppEvent::PageUp => self.move_selection(-(PAGE_SIZE as isize)),
            AppEvent::PageDown => self.move_selection(PAGE_SIZE as isize),
            AppEvent::GoToTop => self.move_selection(isize::MIN),
            AppEvent::GoToBottom => self.move_selection(isize::MAX),
            AppEvent::Select => {
                if self.selected_issue().is_some() {
                    self.switch_view(View::Issues);
                }
            }
            AppEvent::CycleTheme => {
                let name = self.theme_manager.cycle_theme();
                self.status_message = Some(format!("Theme: {}", name.display_name()));
                self.mark_dirty();
            }
            AppEvent::None => {}
        }
    }

    /// Run the main application loop.
    pub fn run(&mut self) -> AppResult<()> {
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            crossterm::terminal::EnterAlternateScreen,
            crossterm::event::EnableFocusChange
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal);

        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableFocusChange
        )?;
        terminal.show_cursor()?;

        result
    }

    /// The inner event loop with frame-rate limiting.
    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> AppResult<()> {
        while !self.should_quit {
            let frame_start = Instant::now();

            if self.last_poll_time.elapsed() >= DATA_POLL_INTERVAL {
                self.poll_data();
            }

            let needs_redraw =
                self.take_dirty() || self.last_timestamp_update.elapsed() >= TIMESTAMP_CACHE_DURATION;
            if needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
            }

            let timeout = FRAME_DURATION
                .checked_sub(frame_start.elapsed())
                .filter(|t| !t.is_zero())
                .unwrap_or(Duration::from_millis(10));

            if event::poll(timeout)? {
                let event = event::read()?;
                self.handle_terminal_event(event);
            }
        }
        Ok(())
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(1), // Filter bar
                Constraint::Min(8),    // Content
                Constraint::Length(2), // Footer
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_filter_bar(frame, chunks[1]);
        self.draw_content(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if self.show_help {
            self.draw_help_overlay(frame, area);
        }
    }

    fn draw_header(&mut self, frame: &mut Frame, area: Rect) {
        let now = self.get_cached_timestamp();
        let theme = self.theme_manager.current();
        let snapshot = self.data.snapshot();
        let title = format!(" Agentboard - {} ", self.current_view.title());
        let title_len = title.chars().count();

        let (status_text, status_color) = if snapshot.is_loading() {
            ("[Loading workflow...]".to_string(), theme.colors.status_warning)
        } else if snapshot.is_error() {
            ("[Error loading workflow]".to_string(), theme.colors.status_error)
        } else {
            let total = snapshot.issues().len();
            (
                format!("[{} issue{}]", total, if total == 1 { "" } else { "s" }),
                theme.colors.status_healthy,
            )
        };

        let updated = snapshot
            .last_success()
            .map(|at| {
                format!(
                    "updated {}",
                    at.with_timezone(&chrono::Local).format("%H:%M:%S")
                )
            })
            .unwrap_or_default();

        let right_len = now.len() + 2 + updated.len() + 2 + status_text.len();
        let spacing = area.width.saturating_sub(title_len as u16 + right_len as u16 + 2) as usize;

        let header = Paragraph::new(Line::from(vec![
            Span::styled(title, Style::default().fg(theme.colors.header).add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(spacing)),
            Span::styled(now, Style::default().fg(theme.colors.text_dim)),
            Span::raw("  "),
            Span::styled(updated, Style::default().fg(theme.colors.text_dim)),
            Span::raw("  "),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.colors.border_dim)),
        );

        frame.render_widget(header, area);
    }

    /// One-line filter selector: `[1] All [2] PR Ready ...`.
    fn draw_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme_manager.current();
        let mut spans = vec![Span::raw(" ")];

        for (idx, filter) in IssueFilter::ALL.iter().enumerate() {
            let label = format!("[{}] {}", idx + 1, filter.title());
            let style = if *filter == self.filter {
                Style::default()
                    .fg(theme.colors.focus_highlight)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(theme.colors.text_dim)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw("  "));
        }

        let total = self.data.snapshot().issues().len();
        spans.push(Span::styled(
            format!("showing {} of {}", self.derived.len(), total),
            Style::default().fg(theme.colors.text_dim),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_content(&mut self, frame: &mut Frame, area: Rect) {
        let snapshot = self.data.snapshot();
        if snapshot.is_loading() {
            self.draw_placeholder(frame, area, "Loading workflow...", None);
            return;
        }
        if snapshot.is_error() && !snapshot.has_data() {
            let detail = snapshot.error().map(|e| e.detail.clone());
            self.draw_placeholder(frame, area, "Error loading workflow", detail);
            return;
        }

        let layout_mode = LayoutMode::from_width(area.width);
        match self.current_view {
            View::Overview => self.draw_overview(frame, area, layout_mode),
            View::Issues => self.draw_issues(frame, area, layout_mode),
            View::Summary => self.draw_summary(frame, area, layout_mode),
        }
    }

    fn draw_placeholder(&self, frame: &mut Frame, area: Rect, message: &str, detail: Option<String>) {
        let theme = self.theme_manager.current();
        let color = if self.data.snapshot().is_error() {
            theme.colors.status_error
        } else {
            theme.colors.status_warning
        };

        let mut lines = vec![
            Line::raw(""),
            Line::styled(message.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ];
        if let Some(detail) = detail {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                truncate_string(&detail, area.width.saturating_sub(4) as usize),
                Style::default().fg(theme.colors.text_dim),
            ));
        }

        let panel = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(panel_block(self.current_view.title(), false, theme));
        frame.render_widget(panel, area);
    }

    fn empty_message(&self) -> String {
        match self.filter {
            IssueFilter::All => "No issues".to_string(),
            filter => format!("No issues match '{}'", filter.title()),
        }
    }

    /// Overview: alerts and stage summary beside (or above) the issue cards.
    fn draw_overview(&self, frame: &mut Frame, area: Rect, layout_mode: LayoutMode) {
        let theme = self.theme_manager.current();
        let summary_height = self.derived.stage_summary.len() as u16 + 2;

        match layout_mode {
            LayoutMode::Wide => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(SIDE_COLUMN_WIDTH), Constraint::Min(40)])
                    .split(area);
                let left = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(8), Constraint::Length(summary_height)])
                    .split(columns[0]);

                frame.render_widget(AlertPanel::new(&self.derived, theme), left[0]);
                frame.render_widget(
                    SummaryPanel::new(&self.derived.stage_summary, theme).compact(true),
                    left[1],
                );
                frame.render_widget(
                    IssueList::new(&self.derived.filtered_issues, theme)
                        .selected(self.selected)
                        .empty_message(self.empty_message()),
                    columns[1],
                );
            }
            LayoutMode::Narrow => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Length(summary_height),
                        Constraint::Min(CARD_HEIGHT.min(area.height)),
                    ])
                    .split(area);

                let alerts = Paragraph::new(Line::styled(
                    format!(" {}", format_alert_summary_narrow(&self.derived)),
                    Style::default().fg(theme.colors.text),
                ));
                frame.render_widget(alerts, rows[0]);
                frame.render_widget(
                    SummaryPanel::new(&self.derived.stage_summary, theme).compact(true),
                    rows[1],
                );
                frame.render_widget(
                    IssueList::new(&self.derived.filtered_issues, theme)
                        .selected(self.selected)
                        .empty_message(self.empty_message()),
                    rows[2],
                );
            }
        }
    }

    /// Issues: card list plus the selected issue's full detail.
    fn draw_issues(&self, frame: &mut Frame, area: Rect, layout_mode: LayoutMode) {
        let theme = self.theme_manager.current();
        let direction = match layout_mode {
            LayoutMode::Wide => Direction::Horizontal,
            LayoutMode::Narrow => Direction::Vertical,
        };
        let chunks = Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        frame.render_widget(
            IssueList::new(&self.derived.filtered_issues, theme)
                .selected(self.selected)
                .empty_message(self.empty_message()),
            chunks[0],
        );
        frame.render_widget(
            IssueDetail::new(self.selected_issue(), theme).focused(true),
            chunks[1],
        );
    }

    /// Summary: the full per-stage chart, with alerts alongside when wide.
    fn draw_summary(&self, frame: &mut Frame, area: Rect, layout_mode: LayoutMode) {
        let theme = self.theme_manager.current();
        let chart = SummaryPanel::new(&self.derived.stage_summary, theme).focused(true);

        match layout_mode {
            LayoutMode::Wide => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(60), Constraint::Length(SIDE_COLUMN_WIDTH)])
                    .split(area);
                frame.render_widget(chart, columns[0]);
                frame.render_widget(AlertPanel::new(&self.derived, theme), columns[1]);
            }
            LayoutMode::Narrow => frame.render_widget(chart, area),
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme_manager.current();
        let hotkey_style = Style::default().fg(theme.colors.hotkey);
        let hints = vec![
            Span::styled("[o]", hotkey_style),
            Span::raw("Overview "),
            Span::styled("[i]", hotkey_style),
            Span::raw("Issues "),
            Span::styled("[s]", hotkey_style),
            Span::raw("Summary "),
            Span::styled("[1-4]", hotkey_style),
            Span::raw("Filter "),
            Span::styled("[r]", hotkey_style),
            Span::raw("Refresh "),
            Span::styled("[?]", hotkey_style),
            Span::raw("Help "),
            Span::styled("[C]", hotkey_style),
            Span::raw("Theme "),
            Span::styled("[q]", hotkey_style),
            Span::raw("Quit"),
        ];

        let mut block = Block::default().borders(Borders::TOP);
        if let Some(message) = &self.status_message {
            block = block
                .title(Span::styled(
                    format!(" {} ", message),
                    Style::default().fg(theme.colors.border_dim),
                ))
                .title_alignment(Alignment::Right);
        }

        let footer = Paragraph::new(Line::from(hints))
            .style(Style::default().fg(theme.colors.text_dim))
            .block(block);

        frame.render_widget(footer, area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme_manager.current();
        let help_text = "\
Agentboard Hotkey Reference

Views:
  o         Overview (alerts, summary, issues)
  i         Issues with detail
  s         Stage summary chart
  Tab       Cycle views forward
  Shift+Tab Cycle views backward

Filters:
  1 2 3 4   All / PR Ready / Test Failures / Low Sonar
  f         Next filter

Navigation:
  ↑ k  ↓ j  Move selection
  PgUp PgDn Page up / down
  g  G      First / last issue
  Enter     Open selected issue

General:
  r  Ctrl+L Refresh now
  C         Cycle theme
  ?  h      Show this help
  Esc       Close / go back
  q         Quit

Press any key to close this help.";

        // Borders take one row above and below the text.
        let text_height = help_text.lines().count() as u16 + 2;
        let overlay_width = 56.min(area.width.saturating_sub(4));
        let overlay_height = text_height.min(area.height.saturating_sub(2));
        let overlay_x = (area.width - overlay_width) / 2;
        let overlay_y = (area.height - overlay_height) / 2;
        let overlay_area = Rect::new(overlay_x, overlay_y, overlay_width, overlay_height);

        frame.render_widget(Clear, overlay_area);

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(theme.colors.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.colors.header))
                    .title(Span::styled(
                        " Help ",
                        Style::default().fg(theme.colors.header).add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(Color::Black)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(help, overlay_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentboard_client::{ClientError, PollEvent};
    use agentboard_core::IssueRecord;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(width, height)).unwrap()
    }

    fn render_app(app: &mut App, width: u16, height: u16) -> Buffer {
        let mut terminal = test_terminal(width, height);
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
        buffer_to_string(buffer).contains(text)
    }

    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut result = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                result.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            result.push('\n');
        }
        result
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Feed one full keystroke (press then release) through the terminal path.
    fn keystroke(app: &mut App, code: KeyCode) {
        app.handle_terminal_event(Event::Key(key(code)));
        app.handle_terminal_event(Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }));
    }

    fn sample_issues() -> Vec<IssueRecord> {
        let mut failing = IssueRecord::new("101", "coded");
        failing.fsm_history = vec!["planned".into(), "coded".into()];
        failing.plan = "Fix login redirect".into();
        failing.workflow_status = "running".into();
        failing.tests_passed = Some(8);
        failing.tests_total = Some(10);
        failing.sonar_quality = Some(65.0);

        let mut ready = IssueRecord::new("102", "pr_created");
        ready.fsm_history = vec![
            "planned".into(),
            "coded".into(),
            "reviewed".into(),
            "auto_fix".into(),
            "pr_created".into(),
        ];
        ready.plan = "Add export button".into();
        ready.pr_url = Some("https://github.com/acme/app/pull/102".into());
        ready.tests_passed = Some(12);
        ready.tests_total = Some(12);
        ready.sonar_quality = Some(92.0);

        let mut fresh = IssueRecord::new("103", "planned");
        fresh.fsm_history = vec!["planned".into()];
        fresh.plan = "Investigate flaky upload".into();

        vec![failing, ready, fresh]
    }

    fn ready_app() -> App {
        App::new(
            DashboardData::offline(WorkflowSnapshot::ready(sample_issues())),
            ThemeManager::new(),
        )
    }

    fn failed_event() -> PollEvent {
        PollEvent::Failed(ClientError::from_status(502, "bad gateway"))
    }

    // ============================================================
    // Loading / error states
    // ============================================================

    #[test]
    fn test_loading_state_renders() {
        let mut app = App::new(DashboardData::offline(WorkflowSnapshot::loading()), ThemeManager::new());
        let buffer = render_app(&mut app, 120, 40);

        assert!(buffer_contains(&buffer, "Loading workflow..."));
        assert!(buffer_contains(&buffer, "[Loading workflow...]"));
        assert!(!buffer_contains(&buffer, "Issue 101"));
    }

    #[test]
    fn test_error_without_data_renders_message() {
        let mut snapshot = WorkflowSnapshot::loading();
        snapshot.apply(failed_event());
        let mut app = App::new(DashboardData::offline(snapshot), ThemeManager::new());
        let buffer = render_app(&mut app, 120, 40);

        assert!(buffer_contains(&buffer, "Error loading workflow"));
        assert!(buffer_contains(&buffer, "[Error loading workflow]"));
    }

    #[test]
    fn test_error_keeps_last_good_issues() {
        let mut snapshot = WorkflowSnapshot::ready(sample_issues());
        snapshot.apply(failed_event());
        let mut app = App::new(DashboardData::offline(snapshot), ThemeManager::new());
        let buffer = render_app(&mut app, 140, 50);

        assert!(buffer_contains(&buffer, "[Error loading workflow]"));
        assert!(buffer_contains(&buffer, "Issue 101"));
        assert_eq!(app.derived_view().len(), 3);
    }

    #[test]
    fn test_ready_header_shows_issue_count() {
        let mut app = ready_app();
        let buffer = render_app(&mut app, 140, 50);
        assert!(buffer_contains(&buffer, "[3 issues]"));
        assert!(buffer_contains(&buffer, "updated "));
    }

    #[test]
    fn test_replace_snapshot_recomputes_view() {
        let mut app = App::new(DashboardData::offline(WorkflowSnapshot::loading()), ThemeManager::new());
        assert!(app.derived_view().is_empty());

        app.replace_snapshot(WorkflowSnapshot::ready(sample_issues()));
        assert_eq!(app.derived_view().len(), 3);
        assert_eq!(app.derived_view().alert_counts.pr_ready, 1);
    }

    // ============================================================
    // Overview rendering
    // ============================================================

    #[test]
    fn test_overview_wide_renders_panels() {
        let mut app = ready_app();
        let buffer = render_app(&mut app, 140, 50);

        assert!(buffer_contains(&buffer, "Agentboard - Overview"));
        assert!(buffer_contains(&buffer, "Alerts"));
        assert!(buffer_contains(&buffer, "PR Ready (1)"));
        assert!(buffer_contains(&buffer, "Stage Summary"));
        assert!(buffer_contains(&buffer, "Issue 101"));
        assert!(buffer_contains(&buffer, "Fix login redirect"));
    }

    #[test]
    fn test_overview_narrow_uses_summary_line() {
        let mut app = ready_app();
        let buffer = render_app(&mut app, 90, 40);

        assert!(buffer_contains(&buffer, "PR Ready: 1 | Test Failures: 1 | Low Sonar: 1"));
        assert!(buffer_contains(&buffer, "Issue 101"));
    }

    #[test]
    fn test_filter_bar_lists_filters() {
        let mut app = ready_app();
        let buffer = render_app(&mut app, 140, 50);

        assert!(buffer_contains(&buffer, "[1] All"));
        assert!(buffer_contains(&buffer, "[2] PR Ready"));
        assert!(buffer_contains(&buffer, "[3] Test Failures"));
        assert!(buffer_contains(&buffer, "[4] Low Sonar"));
        assert!(buffer_contains(&buffer, "showing 3 of 3"));
    }

    #[test]
    fn test_footer_renders_hotkey_hints() {
        let mut app = ready_app();
        let buffer = render_app(&mut app, 140, 50);

        for hint in ["[o]", "[i]", "[s]", "[1-4]", "[r]", "[?]", "[q]"] {
            assert!(buffer_contains(&buffer, hint), "missing hint {hint}");
        }
    }

    // ============================================================
    // Filtering
    // ============================================================

    #[test]
    fn test_filter_hides_other_issues() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Char('2')));
        assert_eq!(app.filter(), IssueFilter::PrReady);
        assert_eq!(app.derived_view().len(), 1);

        let buffer = render_app(&mut app, 140, 50);
        assert!(buffer_contains(&buffer, "Issue 102"));
        assert!(!buffer_contains(&buffer, "Issue 101"));
        assert!(buffer_contains(&buffer, "showing 1 of 3"));
    }

    #[test]
    fn test_alert_counts_follow_filter() {
        let mut app = ready_app();
        app.set_filter(IssueFilter::FailedTests);

        let counts = app.derived_view().alert_counts;
        assert_eq!(counts.failed_tests, 1);
        assert_eq!(counts.low_sonar, 1);
        assert_eq!(counts.pr_ready, 0);
    }

    #[test]
    fn test_cycle_filter_wraps() {
        let mut app = ready_app();
        for _ in 0..4 {
            app.handle_key_event(key(KeyCode::Char('f')));
        }
        assert_eq!(app.filter(), IssueFilter::All);
    }

    #[test]
    fn test_empty_filter_message() {
        let mut snapshot_issues = sample_issues();
        snapshot_issues.retain(|i| i.issue_id == "103");
        let mut app = App::new(
            DashboardData::offline(WorkflowSnapshot::ready(snapshot_issues)),
            ThemeManager::new(),
        );
        app.set_filter(IssueFilter::LowSonar);

        let buffer = render_app(&mut app, 140, 50);
        assert!(buffer_contains(&buffer, "No issues match 'Low Sonar'"));
    }

    #[test]
    fn test_filter_resets_selection() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Down));
        app.handle_key_event(key(KeyCode::Down));
        assert_eq!(app.selected(), 2);

        app.set_filter(IssueFilter::LowSonar);
        assert_eq!(app.selected(), 0);
    }

    // ============================================================
    // Issues and Summary views
    // ============================================================

    #[test]
    fn test_issues_view_shows_detail() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Down));
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.current_view(), View::Issues);

        let buffer = render_app(&mut app, 140, 50);
        assert!(buffer_contains(&buffer, "Agentboard - Issues"));
        assert!(buffer_contains(&buffer, "Completion:"));
        assert!(buffer_contains(&buffer, "https://github.com/acme/app/pull/102"));
    }

    #[test]
    fn test_summary_view_renders_chart() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Char('s')));
        let buffer = render_app(&mut app, 140, 50);

        assert!(buffer_contains(&buffer, "Stage Summary"));
        assert!(buffer_contains(&buffer, "Planner"));
        assert!(buffer_contains(&buffer, "PR Created"));
        assert!(buffer_contains(&buffer, "passed"));
    }

    // ============================================================
    // Navigation and state
    // ============================================================

    #[test]
    fn test_view_switching() {
        let mut app = ready_app();
        assert_eq!(app.current_view(), View::Overview);

        app.handle_key_event(key(KeyCode::Char('i')));
        assert_eq!(app.current_view(), View::Issues);

        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_view(), View::Overview);
    }

    #[test]
    fn test_view_cycling() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.current_view(), View::Issues);
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.current_view(), View::Summary);
        app.handle_key_event(key(KeyCode::BackTab));
        assert_eq!(app.current_view(), View::Issues);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Up));
        assert_eq!(app.selected(), 0);

        app.handle_key_event(key(KeyCode::PageDown));
        assert_eq!(app.selected(), 2);

        app.handle_key_event(key(KeyCode::Home));
        assert_eq!(app.selected(), 0);

        app.handle_key_event(key(KeyCode::End));
        assert_eq!(app.selected_issue().map(|i| i.record.issue_id.as_str()), Some("103"));
    }

    #[test]
    fn test_selection_clamped_when_list_shrinks() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::End));
        assert_eq!(app.selected(), 2);

        app.replace_snapshot(WorkflowSnapshot::ready(sample_issues().into_iter().take(1).collect()));
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_select_ignored_when_empty() {
        let mut app = App::new(DashboardData::offline(WorkflowSnapshot::ready(vec![])), ThemeManager::new());
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.current_view(), View::Overview);
    }

    #[test]
    fn test_quit_handling() {
        let mut app = ready_app();
        assert!(!app.should_quit());
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_force_quit() {
        let mut app = ready_app();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_help_overlay_renders_and_closes() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Char('?')));
        assert!(app.show_help());

        let buffer = render_app(&mut app, 120, 40);
        assert!(buffer_contains(&buffer, "Agentboard Hotkey Reference"));
        assert!(buffer_contains(&buffer, "Press any key to close"));

        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.show_help());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_help_overlay_shows_every_line() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Char('?')));
        let buffer = render_app(&mut app, 120, 40);

        assert!(buffer_contains(&buffer, "Esc       Close / go back"));
        assert!(buffer_contains(&buffer, "q         Quit"));
        assert!(buffer_contains(&buffer, "Press any key to close this help."));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = ready_app();

        keystroke(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter(), IssueFilter::PrReady);

        keystroke(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view(), View::Issues);

        keystroke(&mut app, KeyCode::Char('?'));
        assert!(app.show_help());
    }

    /// Backend stand-in for live-board tests.
    struct FixedSource(Vec<IssueRecord>);

    #[async_trait::async_trait]
    impl agentboard_client::IssueSource for FixedSource {
        async fn fetch_issues(&self) -> agentboard_client::Result<Vec<IssueRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_focus_gained_refreshes_live_board() {
        let source = std::sync::Arc::new(FixedSource(sample_issues()));
        let data = DashboardData::with_source(source, &BoardConfig::default()).unwrap();
        let mut app = App::new(data, ThemeManager::new());

        app.handle_terminal_event(Event::FocusGained);
        assert_eq!(app.status_message(), Some("Refreshing workflow..."));

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.derived_view().is_empty() && Instant::now() < deadline {
            app.poll_data();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(app.derived_view().len(), 3);
    }

    #[test]
    fn test_focus_gained_requests_refresh() {
        let mut app = ready_app();
        app.handle_terminal_event(Event::FocusGained);
        assert_eq!(app.status_message(), Some("Offline: no backend to refresh"));
    }

    #[test]
    fn test_theme_cycle_sets_status() {
        let mut app = ready_app();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT));
        assert_eq!(app.status_message(), Some("Theme: Dark"));
    }

    #[test]
    fn test_refresh_offline_is_harmless() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Char('r')));
        assert_eq!(app.status_message(), Some("Offline: no backend to refresh"));
        assert!(!app.poll_data());
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut app = ready_app();
        app.handle_key_event(key(KeyCode::Char('?')));
        let _ = render_app(&mut app, 40, 12);
        app.handle_key_event(key(KeyCode::Esc));
        for view in View::ALL {
            app.switch_view(view);
            let _ = render_app(&mut app, 40, 12);
        }
    }
}
