use crate::tasks::cell_renderer::{CellAlign, RenderedCell};
use crate::tasks::filter::Facet;
use crate::tasks::viewer::{ColumnChoice, TableBody, TableModel, TaskView};
use crate::ui::centered_rect;
use crate::widgets::search_input::SearchInput;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFocus {
    Table,
    Facets,
}

/// Popups of the task screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPopup {
    Columns { cursor: usize },
    /// Cursor 0 is the "All …" entry
    FacetPicker { facet: Facet, cursor: usize },
    RowDetail { scroll: u16 },
}

/// Cursor and widget state of a task tab
pub struct TaskScreen {
    pub focus: TaskFocus,
    pub search: SearchInput,
    pub facet_cursor: usize,
    pub table_state: TableState,
    pub popup: Option<TaskPopup>,
}

impl Default for TaskScreen {
    fn default() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self {
            focus: TaskFocus::Table,
            search: SearchInput::default(),
            facet_cursor: 0,
            table_state,
            popup: None,
        }
    }
}

impl TaskScreen {
    /// Back to a fresh tab: empty search, first row
    pub fn reset(&mut self) {
        self.search.set_value("");
        self.search.deactivate();
        self.focus = TaskFocus::Table;
        self.facet_cursor = 0;
        self.popup = None;
        self.table_state.select(Some(0));
    }

    pub fn selected_row(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    pub fn move_rows(&mut self, delta: i32, rows: usize) {
        if rows == 0 {
            self.table_state.select(Some(0));
            return;
        }
        let next = (self.selected_row() as i32 + delta).clamp(0, rows as i32 - 1);
        self.table_state.select(Some(next as usize));
    }

    pub fn clamp_rows(&mut self, rows: usize) {
        if self.selected_row() >= rows {
            self.table_state.select(Some(rows.saturating_sub(1)));
        }
    }
}

pub fn render_task_view(f: &mut Frame, area: Rect, view: &TaskView, model: &TableModel, screen: &mut TaskScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(
            view.title(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    screen.search.render(f, chunks[1], view.search_pending());
    render_facet_bar(f, chunks[2], view, screen);
    render_table(f, chunks[3], model, screen);
}

fn render_facet_bar(f: &mut Frame, area: Rect, view: &TaskView, screen: &TaskScreen) {
    let mut spans = Vec::new();
    for (index, facet) in view.facets().into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        let value = view.filters().selection(facet).unwrap_or(facet.placeholder());
        let mut style = Style::default();
        if view.filters().selection(facet).is_some() {
            style = style.fg(Color::Green);
        }
        if screen.focus == TaskFocus::Facets && index == screen.facet_cursor {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(format!("{}: {}", facet.label(), value), style));
    }

    let border = if screen.focus == TaskFocus::Facets {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filters (f focus, Enter pick, x clear)")
                .border_style(Style::default().fg(border)),
        ),
        area,
    );
}

fn cell_text(cell: &RenderedCell, width: u16) -> Text<'static> {
    let width = width as usize;
    let text = if cell.truncatable && cell.text.chars().count() > width && width > 1 {
        let cut: String = cell.text.chars().take(width - 1).collect();
        format!("{}…", cut)
    } else {
        cell.text.clone()
    };
    let mut text = Text::from(text);
    if cell.align == CellAlign::Center {
        text = text.alignment(Alignment::Center);
    }
    if cell.emphasis {
        text = text.style(Style::default().add_modifier(Modifier::BOLD));
    }
    text
}

fn render_table(f: &mut Frame, area: Rect, model: &TableModel, screen: &mut TaskScreen) {
    let widths: Vec<Constraint> = model.headers.iter().map(|h| Constraint::Length(h.width)).collect();
    let header = Row::new(model.headers.iter().map(|h| {
        Cell::from(h.label.clone()).style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(Color::Blue))
    .height(1);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Tasks (/ search, c columns, Enter details)");

    match &model.body {
        TableBody::Rows(rows) => {
            let rows = rows.iter().map(|cells| {
                Row::new(
                    cells
                        .iter()
                        .zip(&model.headers)
                        .map(|(cell, h)| Cell::from(cell_text(cell, h.width))),
                )
            });
            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
            f.render_stateful_widget(table, area, &mut screen.table_state);
        }
        TableBody::Empty { message, .. } => {
            let inner = block.inner(area);
            let table = Table::new(Vec::<Row>::new(), widths).header(header).block(block);
            f.render_widget(table, area);
            if inner.height > 2 {
                let message_area = Rect {
                    y: inner.y + 2,
                    height: 1,
                    ..inner
                };
                f.render_widget(
                    Paragraph::new(message.as_str())
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(Color::DarkGray)),
                    message_area,
                );
            }
        }
    }
}

pub fn render_column_selector(f: &mut Frame, area: Rect, choices: &[ColumnChoice], cursor: usize) {
    let popup = centered_rect(50, 70, area);
    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = choices
        .iter()
        .map(|choice| {
            let mark = if choice.visible { "[x]" } else { "[ ]" };
            if choice.locked {
                ListItem::new(format!("{} {} (always shown)", mark, choice.label))
                    .style(Style::default().fg(Color::DarkGray))
            } else {
                ListItem::new(format!("{} {}", mark, choice.label))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Columns (Space toggle, a all, d default, Esc close)")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default();
    state.select(Some(cursor));
    f.render_stateful_widget(list, popup, &mut state);
}

pub fn render_facet_picker(f: &mut Frame, area: Rect, view: &TaskView, facet: Facet, cursor: usize) {
    let popup = centered_rect(50, 60, area);
    f.render_widget(Clear, popup);

    let mut items = vec![ListItem::new(facet.placeholder())];
    for option in view.facet_options(facet) {
        let mut style = Style::default();
        if option.disabled {
            style = style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
        } else if option.selected {
            style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
        }
        items.push(ListItem::new(option.label()).style(style));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(facet.label())
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default();
    state.select(Some(cursor));
    f.render_stateful_widget(list, popup, &mut state);
}

pub fn render_row_detail(f: &mut Frame, area: Rect, detail: &[(String, String)], scroll: u16) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for (label, value) in detail {
        lines.push(Line::from(Span::styled(
            label.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(if value.is_empty() { "-".to_string() } else { value.clone() }));
        lines.push(Line::from(""));
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task details (Esc close)")
                    .border_style(Style::default().fg(Color::Yellow)),
            ),
        popup,
    );
}
