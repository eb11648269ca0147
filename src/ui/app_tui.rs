use crate::app_state::AppState;
use crate::catalog::CardLayout;
use crate::notice::NoticeKind;
use crate::sidebar::CloseTrigger;
use crate::tasks::viewer::ViewMode;
use crate::ui::catalog_panel::{grid_width, render_catalog, CatalogFocus, CatalogScreen};
use crate::ui::centered_rect;
use crate::ui::masonry::MasonryLayout;
use crate::ui::sidebar_panel::{panel_rect, render_sidebar};
use crate::ui::task_table::{
    render_column_selector, render_facet_picker, render_row_detail, render_task_view, TaskFocus,
    TaskPopup, TaskScreen,
};
use crate::utils::logging::LogRingBuffer;
use crate::widgets::search_input::SearchInputAction;
use crate::widgets::tab_bar_widget::TabBarWidget;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const HELP_TEXT: &[(&str, &str)] = &[
    ("1 / 2 / 3, Tab", "Papers, Literature Tasks, Field Tasks"),
    ("?, F1", "Toggle this help"),
    ("F12", "Toggle the log viewer"),
    ("q, Ctrl-C", "Quit"),
    ("", ""),
    ("Papers", ""),
    ("Left / Right", "Switch between filters and cards"),
    ("Up / Down", "Move"),
    ("Space", "Toggle the filter under the cursor"),
    ("a", "Show all papers"),
    ("Enter", "View the tasks of the selected paper"),
    ("PgUp / PgDn", "Scroll the card grid"),
    ("", ""),
    ("Task tables", ""),
    ("/", "Search all columns"),
    ("f", "Focus the filter bar (Left / Right, Enter picks)"),
    ("c", "Choose columns"),
    ("x", "Clear filters"),
    ("Enter", "Show every column of the selected task"),
    ("", ""),
    ("Sidebar", ""),
    ("Esc, x, click outside", "Close"),
];

pub struct TuiApp {
    state: AppState,
    masonry: MasonryLayout,
    catalog_screen: CatalogScreen,
    literature_screen: TaskScreen,
    field_screen: TaskScreen,
    logs: LogRingBuffer,
    tick_rate: Duration,
    /// Paper whose button shows "Loading..." until the next frame is drawn
    pending_activation: Option<String>,
    show_help: bool,
    show_logs: bool,
    should_quit: bool,
    frame_area: Rect,
}

impl TuiApp {
    pub fn new(state: AppState, logs: LogRingBuffer) -> Self {
        let display = &state.config.display;
        let masonry = MasonryLayout::new(display.card_column_width, display.card_gutter);
        let tick_rate = Duration::from_millis(state.config.behavior.tick_rate_ms.max(1));
        Self {
            state,
            masonry,
            catalog_screen: CatalogScreen::default(),
            literature_screen: TaskScreen::default(),
            field_screen: TaskScreen::default(),
            logs,
            tick_rate,
            pending_activation: None,
            show_help: false,
            show_logs: false,
            should_quit: false,
            frame_area: Rect::default(),
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.state.start(Some(&mut self.masonry));
        info!(target: "tui", "Catalog ready with {} papers", self.state.catalog.total_count());

        loop {
            terminal.draw(|f| self.draw(f))?;

            if let Some(paper_id) = self.pending_activation.take() {
                self.state.finish_view_tasks(&paper_id);
                continue;
            }

            if event::poll(self.tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            if self.state.tick(Instant::now()) {
                self.after_task_change();
            }

            if self.should_quit {
                info!(target: "tui", "Quitting");
                return Ok(());
            }
        }
    }

    fn active_screen(&mut self) -> Option<&mut TaskScreen> {
        match self.state.viewer.mode() {
            ViewMode::Catalog => None,
            ViewMode::Literature => Some(&mut self.literature_screen),
            ViewMode::Field => Some(&mut self.field_screen),
        }
    }

    fn select_tab(&mut self, mode: ViewMode) {
        self.state.select_tab(mode);
        if let Some(screen) = self.active_screen() {
            screen.reset();
        }
    }

    fn next_tab(&mut self) {
        let next = match self.state.viewer.mode() {
            ViewMode::Catalog => ViewMode::Literature,
            ViewMode::Literature => ViewMode::Field,
            ViewMode::Field => ViewMode::Catalog,
        };
        self.select_tab(next);
    }

    /// Keep cursors valid after the Filtered View changed
    fn after_task_change(&mut self) {
        let rows = self.state.viewer.active().map(|v| v.view().row_count()).unwrap_or(0);
        if let Some(screen) = self.active_screen() {
            screen.clamp_rows(rows);
        }
    }

    fn after_catalog_change(&mut self) {
        let visible = self.state.catalog.visible_count();
        self.catalog_screen.clamp_cards(visible);
        // Cards may have been drawn again; already equipped ones are skipped
        self.state
            .sidebar
            .attach_buttons(self.state.catalog.cards(), self.state.catalog.image_dir());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.state.current_notice().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.state.dismiss_notice();
            }
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.show_logs {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(12) | KeyCode::Char('q')) {
                self.show_logs = false;
            }
            return;
        }

        if let Some(panel) = self.state.sidebar.panel() {
            if !panel.is_closing() {
                match key.code {
                    KeyCode::Esc => self.state.close_sidebar(CloseTrigger::Escape, Instant::now()),
                    KeyCode::Char('x') => self.state.close_sidebar(CloseTrigger::CloseControl, Instant::now()),
                    _ => {}
                }
            }
            return;
        }

        if self.handle_task_input(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.select_tab(ViewMode::Catalog),
            KeyCode::Char('2') => self.select_tab(ViewMode::Literature),
            KeyCode::Char('3') => self.select_tab(ViewMode::Field),
            KeyCode::Tab => self.next_tab(),
            KeyCode::F(1) | KeyCode::Char('?') => self.show_help = true,
            KeyCode::F(12) => self.show_logs = true,
            _ => match self.state.viewer.mode() {
                ViewMode::Catalog => self.handle_catalog_key(key),
                _ => self.handle_task_key(key),
            },
        }
    }

    /// Search box and popups grab keys before the global bindings
    fn handle_task_input(&mut self, key: KeyEvent) -> bool {
        let Some(screen) = self.active_screen() else {
            return false;
        };

        if screen.search.is_active() {
            match screen.search.handle_key(key) {
                SearchInputAction::Changed(text) => {
                    self.state.viewer.type_query(&text, Instant::now());
                }
                SearchInputAction::Confirm(_) | SearchInputAction::Cancel => {}
                SearchInputAction::Continue => {}
                SearchInputAction::PassThrough => return false,
            }
            return true;
        }

        let Some(popup) = screen.popup else {
            return false;
        };
        self.handle_popup_key(popup, key);
        true
    }

    fn handle_popup_key(&mut self, popup: TaskPopup, key: KeyEvent) {
        let Some(view) = self.state.viewer.active() else {
            return;
        };

        let next = match popup {
            TaskPopup::Columns { cursor } => {
                let choices = view.column_choices();
                match key.code {
                    KeyCode::Esc | KeyCode::Char('c') => None,
                    KeyCode::Up | KeyCode::Char('k') => Some(TaskPopup::Columns {
                        cursor: cursor.saturating_sub(1),
                    }),
                    KeyCode::Down | KeyCode::Char('j') => Some(TaskPopup::Columns {
                        cursor: (cursor + 1).min(choices.len().saturating_sub(1)),
                    }),
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        if let Some(choice) = choices.get(cursor) {
                            self.state.viewer.toggle_column(&choice.column);
                        }
                        Some(popup)
                    }
                    KeyCode::Char('a') => {
                        self.state.viewer.select_all_columns();
                        Some(popup)
                    }
                    KeyCode::Char('d') => {
                        self.state.viewer.reset_columns();
                        Some(popup)
                    }
                    _ => Some(popup),
                }
            }
            TaskPopup::FacetPicker { facet, cursor } => {
                let options = view.facet_options(facet);
                match key.code {
                    KeyCode::Esc => None,
                    KeyCode::Up | KeyCode::Char('k') => Some(TaskPopup::FacetPicker {
                        facet,
                        cursor: cursor.saturating_sub(1),
                    }),
                    KeyCode::Down | KeyCode::Char('j') => Some(TaskPopup::FacetPicker {
                        facet,
                        cursor: (cursor + 1).min(options.len()),
                    }),
                    KeyCode::Enter => {
                        let value = match cursor {
                            0 => Some(None),
                            n => options
                                .get(n - 1)
                                .filter(|o| !o.disabled)
                                .map(|o| Some(o.value.clone())),
                        };
                        match value {
                            Some(value) => {
                                if let Err(e) = self.state.viewer.set_facet(facet, value) {
                                    warn!(target: "tui", "{:#}", e);
                                }
                                self.after_task_change();
                                None
                            }
                            None => {
                                debug!(target: "tui", "Option is disabled");
                                Some(popup)
                            }
                        }
                    }
                    _ => Some(popup),
                }
            }
            TaskPopup::RowDetail { scroll } => match key.code {
                KeyCode::Esc | KeyCode::Enter => None,
                KeyCode::Up | KeyCode::Char('k') => Some(TaskPopup::RowDetail {
                    scroll: scroll.saturating_sub(1),
                }),
                KeyCode::Down | KeyCode::Char('j') => Some(TaskPopup::RowDetail {
                    scroll: scroll.saturating_add(1),
                }),
                _ => Some(popup),
            },
        };

        if let Some(screen) = self.active_screen() {
            screen.popup = next;
        }
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        let visible = self.state.catalog.visible_count();
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.catalog_screen.toggle_focus()
            }
            KeyCode::Up | KeyCode::Char('k') => self.catalog_screen.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.catalog_screen.move_down(visible),
            KeyCode::PageUp => self.scroll_grid(-10),
            KeyCode::PageDown => self.scroll_grid(10),
            KeyCode::Char(' ') if self.catalog_screen.focus == CatalogFocus::Facets => {
                if let Some(checkbox) = self.catalog_screen.current_checkbox() {
                    self.state.toggle_checkbox(checkbox, Some(&mut self.masonry));
                    self.after_catalog_change();
                }
            }
            KeyCode::Char('a') => {
                self.state.catalog.show_all(Some(&mut self.masonry));
                self.after_catalog_change();
            }
            KeyCode::Enter if self.catalog_screen.focus == CatalogFocus::Cards => {
                let image = self
                    .state
                    .catalog
                    .visible_cards()
                    .nth(self.catalog_screen.card_cursor())
                    .map(|c| c.image.clone());
                if let Some(image) = image {
                    self.pending_activation = self.state.begin_view_tasks(&image);
                }
            }
            _ => {}
        }
    }

    fn scroll_grid(&mut self, delta: i32) {
        if self.state.sidebar.scroll_locked() {
            return;
        }
        let max = self.masonry.total_height();
        self.catalog_screen.scroll_by(delta, max);
    }

    fn handle_task_key(&mut self, key: KeyEvent) {
        let Some(view) = self.state.viewer.active() else {
            return;
        };
        let rows = view.view().row_count();
        let facets = view.facets();
        let Some(screen) = (match self.state.viewer.mode() {
            ViewMode::Catalog => None,
            ViewMode::Literature => Some(&mut self.literature_screen),
            ViewMode::Field => Some(&mut self.field_screen),
        }) else {
            return;
        };

        match (screen.focus, key.code) {
            (_, KeyCode::Char('/')) => screen.search.activate(),
            (_, KeyCode::Char('c')) => screen.popup = Some(TaskPopup::Columns { cursor: 0 }),
            (_, KeyCode::Char('f')) => {
                screen.focus = match screen.focus {
                    TaskFocus::Table => TaskFocus::Facets,
                    TaskFocus::Facets => TaskFocus::Table,
                }
            }
            (_, KeyCode::Char('x')) => {
                screen.search.set_value("");
                self.state.viewer.clear_filters();
                self.after_task_change();
            }
            (TaskFocus::Facets, KeyCode::Esc) => screen.focus = TaskFocus::Table,
            (TaskFocus::Facets, KeyCode::Left | KeyCode::Char('h')) => {
                screen.facet_cursor = screen.facet_cursor.saturating_sub(1)
            }
            (TaskFocus::Facets, KeyCode::Right | KeyCode::Char('l')) => {
                screen.facet_cursor = (screen.facet_cursor + 1).min(facets.len().saturating_sub(1))
            }
            (TaskFocus::Facets, KeyCode::Enter) => {
                if let Some(facet) = facets.get(screen.facet_cursor).copied() {
                    let cursor = view
                        .filters()
                        .selection(facet)
                        .and_then(|sel| view.facet_options(facet).iter().position(|o| o.value == sel))
                        .map(|i| i + 1)
                        .unwrap_or(0);
                    screen.popup = Some(TaskPopup::FacetPicker { facet, cursor });
                }
            }
            (TaskFocus::Table, KeyCode::Up | KeyCode::Char('k')) => screen.move_rows(-1, rows),
            (TaskFocus::Table, KeyCode::Down | KeyCode::Char('j')) => screen.move_rows(1, rows),
            (TaskFocus::Table, KeyCode::PageUp) => screen.move_rows(-10, rows),
            (TaskFocus::Table, KeyCode::PageDown) => screen.move_rows(10, rows),
            (TaskFocus::Table, KeyCode::Home) => screen.move_rows(-(rows as i32), rows),
            (TaskFocus::Table, KeyCode::End) => screen.move_rows(rows as i32, rows),
            (TaskFocus::Table, KeyCode::Enter) if rows > 0 => {
                screen.popup = Some(TaskPopup::RowDetail { scroll: 0 })
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(panel) = self.state.sidebar.panel() else {
                    return;
                };
                if !panel.is_closing() && !panel_rect(self.frame_area).contains(position) {
                    self.state.close_sidebar(CloseTrigger::Backdrop, Instant::now());
                }
            }
            MouseEventKind::ScrollDown if self.state.viewer.mode() == ViewMode::Catalog => self.scroll_grid(3),
            MouseEventKind::ScrollUp if self.state.viewer.mode() == ViewMode::Catalog => self.scroll_grid(-3),
            _ => {}
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        self.frame_area = area;

        let tabs = TabBarWidget::new(self.state.viewer.mode());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(tabs.height()),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);
        tabs.render(f, chunks[0]);

        let regions = self.state.viewer.regions();
        if regions.card_grid {
            // Card grid inner width: minus the facet panel and the grid border
            if self.masonry.set_available_width(grid_width(chunks[1].width).saturating_sub(2)) {
                self.masonry.layout(self.state.catalog.cards());
            }
            render_catalog(
                f,
                chunks[1],
                &self.state.catalog,
                &self.state.sidebar,
                &self.masonry,
                &mut self.catalog_screen,
            );
        } else if regions.task_table {
            self.draw_task_view(f, chunks[1]);
        }

        self.draw_status(f, chunks[2]);

        if let Some(panel) = self.state.sidebar.panel() {
            render_sidebar(f, area, panel);
        }
        if self.show_help {
            self.draw_help(f, area);
        }
        if self.show_logs {
            self.draw_logs(f, area);
        }
        self.draw_notice(f, area);
    }

    fn draw_task_view(&mut self, f: &mut Frame, area: Rect) {
        let (Some(view), Some(model)) = (self.state.viewer.active(), self.state.viewer.table_model()) else {
            return;
        };
        let screen = match self.state.viewer.mode() {
            ViewMode::Field => &mut self.field_screen,
            _ => &mut self.literature_screen,
        };
        render_task_view(f, area, view, &model, screen);

        match screen.popup {
            Some(TaskPopup::Columns { cursor }) => {
                render_column_selector(f, area, &view.column_choices(), cursor)
            }
            Some(TaskPopup::FacetPicker { facet, cursor }) => render_facet_picker(f, area, view, facet, cursor),
            Some(TaskPopup::RowDetail { scroll }) => {
                if let Some(detail) = view.row_detail(screen.selected_row()) {
                    render_row_detail(f, area, &detail, scroll);
                }
            }
            None => {}
        }
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let status = Line::from(vec![
            Span::styled(
                format!(" {} ", self.state.viewer.mode()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(format!(" {} ", self.state.cache.source_description())),
            Span::styled("  q quit  ? help  F12 logs", Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(status), area);
    }

    fn draw_help(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 80, area);
        f.render_widget(Clear, popup);
        let lines: Vec<Line> = HELP_TEXT
            .iter()
            .map(|(keys, action)| {
                if action.is_empty() {
                    Line::from(Span::styled(*keys, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
                } else {
                    Line::from(vec![
                        Span::styled(format!("{:<24}", keys), Style::default().fg(Color::Cyan)),
                        Span::raw(*action),
                    ])
                }
            })
            .collect();
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help (Esc close)")),
            popup,
        );
    }

    fn draw_logs(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(90, 80, area);
        f.render_widget(Clear, popup);
        let count = popup.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .logs
            .get_recent(count)
            .iter()
            .map(|entry| {
                let color = match entry.level.as_str() {
                    "ERROR" => Color::Red,
                    "WARN" => Color::Yellow,
                    "DEBUG" | "TRACE" => Color::DarkGray,
                    _ => Color::White,
                };
                Line::from(Span::styled(entry.format_for_display(), Style::default().fg(color)))
            })
            .collect();
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Logs ({} entries, Esc close)", self.logs.len())),
            ),
            popup,
        );
    }

    fn draw_notice(&self, f: &mut Frame, area: Rect) {
        let Some(notice) = self.state.current_notice() else {
            return;
        };
        let popup = centered_rect(60, 30, area);
        f.render_widget(Clear, popup);
        let color = match notice.kind {
            NoticeKind::Error => Color::Red,
            NoticeKind::Info => Color::Cyan,
        };
        let body = vec![
            Line::from(notice.message.as_str()),
            Line::from(""),
            Line::from(Span::styled("Press Enter to continue", Style::default().fg(Color::DarkGray))),
        ];
        f.render_widget(
            Paragraph::new(body).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(notice.title.as_str())
                    .border_style(Style::default().fg(color)),
            ),
            popup,
        );
    }
}

pub fn run_tui_app(state: AppState, logs: LogRingBuffer) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(state, logs);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}
