//! Event handling for the agentboard TUI.
//!
//! Provides keyboard input handling and event routing.

use agentboard_core::IssueFilter;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::view::View;

/// Application-level events that can trigger state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Switch to a specific view
    SwitchView(View),
    /// Cycle to the next view
    NextView,
    /// Cycle to the previous view
    PrevView,
    /// Select an issue filter
    SetFilter(IssueFilter),
    /// Cycle to the next issue filter
    CycleFilter,
    /// Show help overlay
    ShowHelp,
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// Fetch issues now instead of waiting for the next tick
    Refresh,
    /// Redraw without changing state (terminal resized)
    Redraw,
    /// Cancel current operation
    Cancel,
    /// Navigate up in a list
    NavigateUp,
    /// Navigate down in a list
    NavigateDown,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Go to top
    GoToTop,
    /// Go to bottom
    GoToBottom,
    /// Open the selected issue
    Select,
    /// Cycle color theme
    CycleTheme,
    /// No action needed
    None,
}

/// Input handler for converting terminal events to app events.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Create a new input handler.
    pub fn new() -> Self {
        Self
    }

    /// Handle any terminal event.
    ///
    /// Regaining terminal focus requests a refresh so the board is current
    /// as soon as the user looks at it again.
    pub fn handle_event(&mut self, event: Event) -> AppEvent {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::FocusGained => AppEvent::Refresh,
            Event::Resize(_, _) => AppEvent::Redraw,
            _ => AppEvent::None,
        }
    }

    /// Handle a key event and return the corresponding app event.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppEvent {
        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        // Ctrl+L refreshes
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
            return AppEvent::Refresh;
        }

        // View navigation hotkeys
        if let KeyCode::Char(c) = key.code
            && let Some(view) = View::from_hotkey(c)
        {
            return AppEvent::SwitchView(view);
        }

        match key.code {
            KeyCode::Esc => AppEvent::Cancel,

            // Quit
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,

            // Help
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => AppEvent::ShowHelp,

            // Filters
            KeyCode::Char('1') => AppEvent::SetFilter(IssueFilter::All),
            KeyCode::Char('2') => AppEvent::SetFilter(IssueFilter::PrReady),
            KeyCode::Char('3') => AppEvent::SetFilter(IssueFilter::FailedTests),
            KeyCode::Char('4') => AppEvent::SetFilter(IssueFilter::LowSonar),
            KeyCode::Char('f') | KeyCode::Char('F') => AppEvent::CycleFilter,

            // Theme (uppercase only)
            KeyCode::Char('C') => AppEvent::CycleTheme,

            // Tab cycling
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    AppEvent::PrevView
                } else {
                    AppEvent::NextView
                }
            }
            KeyCode::BackTab => AppEvent::PrevView,

            // List navigation
            KeyCode::Up | KeyCode::Char('k') => AppEvent::NavigateUp,
            KeyCode::Down | KeyCode::Char('j') => AppEvent::NavigateDown,
            KeyCode::PageUp => AppEvent::PageUp,
            KeyCode::PageDown => AppEvent::PageDown,
            KeyCode::Home | KeyCode::Char('g') => AppEvent::GoToTop,
            KeyCode::End | KeyCode::Char('G') => AppEvent::GoToBottom,

            // Selection
            KeyCode::Enter => AppEvent::Select,

            // Refresh
            KeyCode::Char('r') | KeyCode::Char('R') => AppEvent::Refresh,

            _ => AppEvent::None,
        }
    }
}
