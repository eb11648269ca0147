use crate::catalog::{CatalogController, FilterCheckbox, FilterSection};
use crate::sidebar::TaskSidebar;
use crate::ui::masonry::MasonryLayout;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub const DESCRIPTION: &str = "Browse visualisations of energy networks from the literature. \
Tick facets to narrow the catalog; press Enter on a card to see its tasks.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFocus {
    Facets,
    Cards,
}

/// Cursor and scroll state of the catalog screen
#[derive(Debug, Clone)]
pub struct CatalogScreen {
    pub focus: CatalogFocus,
    checkboxes: Vec<FilterCheckbox>,
    facet_cursor: usize,
    card_cursor: usize,
    scroll: u16,
}

impl Default for CatalogScreen {
    fn default() -> Self {
        Self {
            focus: CatalogFocus::Facets,
            checkboxes: FilterCheckbox::all(),
            facet_cursor: 0,
            card_cursor: 0,
            scroll: 0,
        }
    }
}

impl CatalogScreen {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            CatalogFocus::Facets => CatalogFocus::Cards,
            CatalogFocus::Cards => CatalogFocus::Facets,
        };
    }

    pub fn current_checkbox(&self) -> Option<FilterCheckbox> {
        self.checkboxes.get(self.facet_cursor).copied()
    }

    pub fn move_up(&mut self) {
        match self.focus {
            CatalogFocus::Facets => self.facet_cursor = self.facet_cursor.saturating_sub(1),
            CatalogFocus::Cards => self.card_cursor = self.card_cursor.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self, visible_cards: usize) {
        match self.focus {
            CatalogFocus::Facets => {
                if self.facet_cursor + 1 < self.checkboxes.len() {
                    self.facet_cursor += 1;
                }
            }
            CatalogFocus::Cards => {
                if self.card_cursor + 1 < visible_cards {
                    self.card_cursor += 1;
                }
            }
        }
    }

    /// Keep the card cursor inside the visible set after a filter change
    pub fn clamp_cards(&mut self, visible_cards: usize) {
        if self.card_cursor >= visible_cards {
            self.card_cursor = visible_cards.saturating_sub(1);
        }
    }

    pub fn card_cursor(&self) -> usize {
        self.card_cursor
    }

    pub fn scroll_by(&mut self, delta: i32, max: u16) {
        let next = (self.scroll as i32 + delta).clamp(0, max as i32);
        self.scroll = next as u16;
    }

    /// Scroll so the placement at `y..y+height` is on screen
    fn follow(&mut self, y: u16, height: u16, viewport: u16) {
        if y < self.scroll {
            self.scroll = y;
        } else if y + height > self.scroll + viewport {
            self.scroll = (y + height).saturating_sub(viewport);
        }
    }
}

/// Width left for the card grid once the facet panels are drawn
pub fn grid_width(total: u16) -> u16 {
    total.saturating_sub(facet_panel_width(total) + 2)
}

fn facet_panel_width(total: u16) -> u16 {
    (total / 4).clamp(24, 36)
}

pub fn render_catalog(
    f: &mut Frame,
    area: Rect,
    catalog: &CatalogController,
    sidebar: &TaskSidebar,
    masonry: &MasonryLayout,
    screen: &mut CatalogScreen,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(facet_panel_width(area.width)), Constraint::Min(10)])
        .split(area);

    render_facet_panels(f, chunks[0], catalog, screen);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(chunks[1]);

    let description = Paragraph::new(vec![
        Line::from(DESCRIPTION),
        Line::from(Span::styled(
            format!("{} of {} papers", catalog.visible_count(), catalog.total_count()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(description, right[0]);

    render_grid(f, right[1], catalog, sidebar, masonry, screen);
}

fn render_facet_panels(f: &mut Frame, area: Rect, catalog: &CatalogController, screen: &CatalogScreen) {
    let mut items = Vec::new();
    let mut last_section: Option<FilterSection> = None;
    let mut selected_item = None;

    for (index, checkbox) in screen.checkboxes.iter().enumerate() {
        let section = checkbox.section();
        if last_section != Some(section) {
            items.push(ListItem::new(Line::from(Span::styled(
                section.heading(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))));
            last_section = Some(section);
        }
        if index == screen.facet_cursor {
            selected_item = Some(items.len());
        }
        let mark = if catalog.filters().is_checked(checkbox) { "[x]" } else { "[ ]" };
        items.push(ListItem::new(format!(" {} {}", mark, checkbox.label())));
    }

    let border = if screen.focus == CatalogFocus::Facets {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filters (Space toggles, a shows all)")
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(selected_item);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_grid(
    f: &mut Frame,
    area: Rect,
    catalog: &CatalogController,
    sidebar: &TaskSidebar,
    masonry: &MasonryLayout,
    screen: &mut CatalogScreen,
) {
    let border = if screen.focus == CatalogFocus::Cards {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Papers")
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible: Vec<_> = catalog.visible_cards().collect();
    if visible.is_empty() {
        f.render_widget(
            Paragraph::new("No papers match the selected filters.").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    if let Some(selected) = visible
        .get(screen.card_cursor)
        .and_then(|c| masonry.placement_of(&c.image))
    {
        if !sidebar.scroll_locked() {
            screen.follow(selected.y, selected.height, inner.height);
        }
    }

    for (index, card) in visible.iter().enumerate() {
        let Some(placement) = masonry.placement_of(&card.image) else {
            continue;
        };
        // Only cards entirely inside the viewport are drawn
        if placement.y < screen.scroll || placement.y + placement.height > screen.scroll + inner.height {
            continue;
        }
        let width = masonry.column_width().min(inner.width.saturating_sub(placement.x));
        if width < 4 {
            continue;
        }
        let rect = Rect {
            x: inner.x + placement.x,
            y: inner.y + placement.y - screen.scroll,
            width,
            height: placement.height,
        };

        let selected = index == screen.card_cursor && screen.focus == CatalogFocus::Cards;
        let button = sidebar
            .button(&card.image)
            .map(|b| {
                let style = if b.is_enabled() {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Span::styled(format!("[{}]", b.label()), style)
            })
            .unwrap_or_else(|| Span::raw(""));

        let lines = vec![
            Line::from(Span::styled(card.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(vec![
                Span::raw(format!("{}. ", card.author)),
                Span::styled(card.venue.clone(), Style::default().add_modifier(Modifier::ITALIC)),
                Span::raw(format!(" ({})", card.year)),
            ]),
            Line::from(Span::styled(card.url.clone(), Style::default().fg(Color::Blue))),
            Line::from(button),
        ];
        let card_border = if selected { Color::Yellow } else { Color::Gray };
        let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(card.image_path(catalog.image_dir()))
                .border_style(Style::default().fg(card_border)),
        );
        f.render_widget(widget, rect);
    }
}
