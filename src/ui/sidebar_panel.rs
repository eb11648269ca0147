use crate::sidebar::{SidebarPanel, PANEL_HEADING};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

/// Right half of the screen
pub fn panel_rect(area: Rect) -> Rect {
    let width = area.width / 2;
    Rect {
        x: area.x + area.width - width,
        width,
        ..area
    }
}

/// Draw the backdrop and panel. While closing, the backdrop is already gone
/// and the panel is drawn faded until the transition ends.
pub fn render_sidebar(f: &mut Frame, area: Rect, panel: &SidebarPanel) {
    if !panel.is_closing() {
        f.buffer_mut()
            .set_style(area, Style::default().add_modifier(Modifier::DIM));
    }

    let rect = panel_rect(area);
    f.render_widget(Clear, rect);

    let accent = if panel.is_closing() { Color::DarkGray } else { Color::White };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" x close ")
        .border_style(Style::default().fg(accent));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(inner);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            PANEL_HEADING,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(panel.subtitle()),
        Line::from(""),
        Line::from(Span::styled(panel.summary(), Style::default().add_modifier(Modifier::BOLD))),
    ])
    .style(Style::default().bg(Color::Rgb(44, 62, 80)));
    f.render_widget(header, chunks[0]);

    let rows = panel.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.task_id.clone()),
            Cell::from(row.description.clone()),
            Cell::from(row.task_type.clone()),
        ])
    });
    let table = Table::new(
        rows,
        [Constraint::Length(8), Constraint::Min(20), Constraint::Length(12)],
    )
    .header(
        Row::new(vec!["Task ID", "User Task", "Type"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(table, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_takes_right_half() {
        let rect = panel_rect(Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(50, 0, 50, 40));
        assert!(!rect.contains((10, 10).into()));
    }
}
