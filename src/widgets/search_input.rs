//! Free-text search box of the task table
//!
//! Only edits text. The quiet-period handling lives with the task view, so
//! the box reports every change and the caller arms the debounce.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInputAction {
    /// Key consumed, text unchanged
    Continue,
    Changed(String),
    /// Enter: leave the box, keep the text
    Confirm(String),
    /// Esc: leave the box
    Cancel,
    /// Not for us
    PassThrough,
}

pub struct SearchInput {
    input: Input,
    active: bool,
    title: String,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new("Search All")
    }
}

impl SearchInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            title: title.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Replace the text, e.g. after filters were cleared
    pub fn set_value(&mut self, value: &str) {
        self.input = Input::default().with_value(value.to_string());
    }

    pub fn cursor(&self) -> usize {
        self.input.visual_cursor()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchInputAction {
        if !self.active {
            return SearchInputAction::PassThrough;
        }

        match key.code {
            KeyCode::Esc => {
                self.deactivate();
                SearchInputAction::Cancel
            }
            KeyCode::Enter => {
                self.deactivate();
                SearchInputAction::Confirm(self.input.value().to_string())
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                SearchInputAction::PassThrough
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() != before {
                    SearchInputAction::Changed(self.input.value().to_string())
                } else {
                    SearchInputAction::Continue
                }
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, pending: bool) {
        let title = if pending {
            format!("{} (typing...)", self.title)
        } else {
            self.title.clone()
        };
        let style = if self.active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };

        let widget = Paragraph::new(self.input.value())
            .block(Block::default().borders(Borders::ALL).title(title).border_style(style))
            .style(style);
        f.render_widget(widget, area);

        if self.active {
            let x = area.x + 1 + self.cursor() as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut input = SearchInput::default();
        assert_eq!(input.handle_key(key(KeyCode::Char('p'))), SearchInputAction::PassThrough);

        input.activate();
        assert_eq!(
            input.handle_key(key(KeyCode::Char('p'))),
            SearchInputAction::Changed("p".to_string())
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Char('2'))),
            SearchInputAction::Changed("p2".to_string())
        );
        assert_eq!(input.handle_key(key(KeyCode::Left)), SearchInputAction::Continue);
        assert_eq!(
            input.handle_key(key(KeyCode::Enter)),
            SearchInputAction::Confirm("p2".to_string())
        );
        assert!(!input.is_active());
    }
}
