use crate::tasks::viewer::ViewMode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Renders the Papers / Literature / Field tab buttons
pub struct TabBarWidget {
    current: ViewMode,
}

impl TabBarWidget {
    pub fn new(current: ViewMode) -> Self {
        Self { current }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ViewMode::ALL
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}:", i + 1),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::DIM),
                    ),
                    Span::raw(mode.tab_title()),
                ])
            })
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .select(self.current.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::Blue),
            )
            .divider(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));

        f.render_widget(tabs, area);
    }

    /// Tab row plus its bottom border
    pub fn height(&self) -> u16 {
        2
    }
}
