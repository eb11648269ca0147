use crate::config::config::Config;
use crate::data::data_view::DataView;
use crate::data::dataset_cache::{DatasetCache, DatasetKind};
use crate::data::datatable::DataTable;
use crate::notice::Notice;
use crate::tasks::cell_renderer::{CellRenderer, RenderedCell};
use crate::tasks::columns::{column_label, column_width, is_locked, VisibleColumns, DEFAULT_COLUMNS, PAPER_ID};
use crate::tasks::filter::{apply_filters, facet_options, Facet, FacetOption, TaskFilterState};
use crate::utils::debouncer::Debouncer;
use anyhow::{bail, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub const EMPTY_MESSAGE: &str = "No tasks found matching filters...";

/// Which screen is showing. Starts at `Catalog`; only tab selection moves
/// between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Catalog,
    Literature,
    Field,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Catalog, ViewMode::Literature, ViewMode::Field];

    pub fn tab_title(&self) -> &'static str {
        match self {
            ViewMode::Catalog => "Papers View",
            ViewMode::Literature => "Literature Tasks",
            ViewMode::Field => "Field Tasks",
        }
    }

    pub fn dataset(&self) -> Option<DatasetKind> {
        match self {
            ViewMode::Catalog => None,
            ViewMode::Literature => Some(DatasetKind::LiteratureTasks),
            ViewMode::Field => Some(DatasetKind::FieldTasks),
        }
    }

    /// Field tasks are not tied to any paper
    pub fn paper_linked(&self) -> bool {
        matches!(self, ViewMode::Literature)
    }

    pub fn index(&self) -> usize {
        match self {
            ViewMode::Catalog => 0,
            ViewMode::Literature => 1,
            ViewMode::Field => 2,
        }
    }

    pub fn parse(name: &str) -> Option<ViewMode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "catalog" | "papers" => Some(ViewMode::Catalog),
            "literature" | "tasks" => Some(ViewMode::Literature),
            "field" => Some(ViewMode::Field),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab_title())
    }
}

/// Regions that only belong to one kind of screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionVisibility {
    pub card_grid: bool,
    pub facet_panels: bool,
    pub description: bool,
    pub task_table: bool,
}

impl RegionVisibility {
    pub fn for_mode(mode: ViewMode) -> Self {
        let catalog = mode == ViewMode::Catalog;
        Self {
            card_grid: catalog,
            facet_panels: catalog,
            description: catalog,
            task_table: !catalog,
        }
    }
}

/// Entry of the column selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChoice {
    pub column: String,
    pub label: String,
    pub visible: bool,
    /// Always on, shown disabled
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    pub column: String,
    pub label: String,
    pub width: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<Vec<RenderedCell>>),
    /// Single placeholder row spanning every visible column
    Empty { colspan: usize, message: String },
}

/// Everything needed to draw the task table, rebuilt on every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub headers: Vec<TableHeader>,
    pub body: TableBody,
}

impl TableModel {
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Empty { .. } => 0,
        }
    }
}

/// State of one task dataset screen
pub struct TaskView {
    mode: ViewMode,
    view: DataView,
    filters: TaskFilterState,
    columns: VisibleColumns,
    /// Typed text; becomes the query once the debounce fires
    search_text: String,
    debouncer: Debouncer,
}

impl TaskView {
    pub fn new(mode: ViewMode, debounce_ms: u64) -> Self {
        let name = mode.dataset().map(|k| k.table_name()).unwrap_or("tasks");
        Self {
            mode,
            view: DataView::new(Arc::new(DataTable::new(name))),
            filters: TaskFilterState::default(),
            columns: VisibleColumns::default(),
            search_text: String::new(),
            debouncer: Debouncer::new(debounce_ms),
        }
    }

    /// Show a freshly entered dataset with every filter reset. Column
    /// choices survive.
    fn enter(&mut self, table: Arc<DataTable>) {
        self.filters.clear();
        self.search_text.clear();
        self.debouncer.reset();
        self.view = DataView::new(table);
    }

    fn recompute(&mut self) {
        self.view = apply_filters(self.view.source_arc(), &self.filters, self.paper_linked());
        info!(
            target: "task_viewer",
            "{}: filtered to {} of {} tasks",
            self.mode,
            self.view.row_count(),
            self.view.total_count()
        );
    }

    pub fn paper_linked(&self) -> bool {
        self.mode.paper_linked()
    }

    pub fn view(&self) -> &DataView {
        &self.view
    }

    pub fn filters(&self) -> &TaskFilterState {
        &self.filters
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn headers(&self) -> Vec<String> {
        self.view.source().column_names()
    }

    pub fn visible_columns(&self) -> Vec<String> {
        self.columns.ordered(&self.headers(), self.paper_linked())
    }

    /// "Literature Tasks (3 of 10 tasks)"
    pub fn title(&self) -> String {
        format!(
            "{} ({} of {} tasks)",
            self.mode.tab_title(),
            self.view.row_count(),
            self.view.total_count()
        )
    }

    pub fn facets(&self) -> Vec<Facet> {
        Facet::available(self.paper_linked()).collect()
    }

    pub fn facet_options(&self, facet: Facet) -> Vec<FacetOption> {
        facet_options(&self.view, facet, self.filters.selection(facet))
    }

    pub fn column_choices(&self) -> Vec<ColumnChoice> {
        let mut names = self.headers();
        if names.is_empty() {
            names = DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect();
        }
        let linked = self.paper_linked();
        names
            .into_iter()
            .filter(|c| linked || c != PAPER_ID)
            .map(|column| ColumnChoice {
                label: column_label(&column).to_string(),
                visible: self.columns.contains(&column),
                locked: is_locked(&column, linked),
                column,
            })
            .collect()
    }

    pub fn table_model(&self, renderer: &CellRenderer) -> TableModel {
        let columns = self.visible_columns();
        let headers: Vec<TableHeader> = columns
            .iter()
            .map(|c| TableHeader {
                column: c.clone(),
                label: column_label(c).to_string(),
                width: column_width(c),
            })
            .collect();

        if self.view.is_empty() {
            return TableModel {
                headers,
                body: TableBody::Empty {
                    colspan: columns.len(),
                    message: EMPTY_MESSAGE.to_string(),
                },
            };
        }

        let source = self.view.source();
        let rows: Vec<Vec<RenderedCell>> = self
            .view
            .visible_rows()
            .iter()
            .map(|&row| {
                columns
                    .iter()
                    .map(|c| renderer.render(c, source.get_value_by_name(row, c)))
                    .collect::<Vec<_>>()
            })
            .collect();
        TableModel {
            headers,
            body: TableBody::Rows(rows),
        }
    }

    /// Every column of a Filtered View row with its full value
    pub fn row_detail(&self, view_row: usize) -> Option<Vec<(String, String)>> {
        let row = self.view.source_row(view_row)?;
        let source = self.view.source();
        Some(
            source
                .column_names()
                .into_iter()
                .map(|c| {
                    let value = source.get_value_by_name(row, &c).to_string();
                    (column_label(&c).to_string(), value)
                })
                .collect(),
        )
    }
}

/// Tab state machine over the catalog and the two task datasets
pub struct TaskTableViewer {
    mode: ViewMode,
    literature: TaskView,
    field: TaskView,
    renderer: CellRenderer,
}

impl TaskTableViewer {
    pub fn new(config: &Config) -> Self {
        let debounce = config.behavior.search_debounce_ms;
        Self {
            mode: ViewMode::Catalog,
            literature: TaskView::new(ViewMode::Literature, debounce),
            field: TaskView::new(ViewMode::Field, debounce),
            renderer: CellRenderer::new(config.display.glyphs.clone()),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn regions(&self) -> RegionVisibility {
        RegionVisibility::for_mode(self.mode)
    }

    pub fn renderer(&self) -> &CellRenderer {
        &self.renderer
    }

    pub fn active(&self) -> Option<&TaskView> {
        match self.mode {
            ViewMode::Catalog => None,
            ViewMode::Literature => Some(&self.literature),
            ViewMode::Field => Some(&self.field),
        }
    }

    fn active_mut(&mut self) -> Option<&mut TaskView> {
        match self.mode {
            ViewMode::Catalog => None,
            ViewMode::Literature => Some(&mut self.literature),
            ViewMode::Field => Some(&mut self.field),
        }
    }

    /// Switch tabs. Entering a task tab loads its dataset through the cache
    /// (at most one successful fetch per session) and resets its filters.
    pub fn select_tab(&mut self, mode: ViewMode, cache: &mut DatasetCache) -> Option<Notice> {
        info!(target: "task_viewer", "Switching to {}", mode);
        self.mode = mode;
        let kind = mode.dataset()?;

        let outcome = cache.get_or_load(kind);
        let notice = outcome.error.as_ref().map(|e| {
            let what = if mode == ViewMode::Field { "field tasks" } else { "tasks" };
            Notice::error(
                format!("Error loading {}", what),
                format!(
                    "Error loading {} data. Make sure {} is in {}. ({:#})",
                    what,
                    cache.file_name(kind),
                    cache.source_description(),
                    e
                ),
            )
        });

        if let Some(view) = self.active_mut() {
            view.enter(outcome.table);
            debug!(target: "task_viewer", "Showing {} tasks", view.view.total_count());
        }
        notice
    }

    pub fn toggle_column(&mut self, column: &str) -> Option<bool> {
        let view = self.active_mut()?;
        let linked = view.paper_linked();
        let visible = view.columns.toggle(column, linked);
        debug!(target: "task_viewer", "Column {} visible: {}", column, visible);
        Some(visible)
    }

    pub fn select_all_columns(&mut self) {
        if let Some(view) = self.active_mut() {
            let headers = view.headers();
            let linked = view.paper_linked();
            view.columns.select_all(&headers, linked);
        }
    }

    pub fn reset_columns(&mut self) {
        if let Some(view) = self.active_mut() {
            view.columns.reset_to_default();
        }
    }

    /// Record typed search text; the query applies once typing pauses
    pub fn type_query(&mut self, text: &str, now: Instant) {
        if let Some(view) = self.active_mut() {
            view.search_text = text.to_string();
            view.debouncer.trigger_at(now);
        }
    }

    /// Apply the search text if the debounce window has passed. Returns
    /// true when the Filtered View was recomputed.
    pub fn poll_debounce(&mut self, now: Instant) -> bool {
        let Some(view) = self.active_mut() else {
            return false;
        };
        if !view.debouncer.should_execute_at(now) {
            return false;
        }
        debug!(target: "task_viewer", "Search triggered: {:?}", view.search_text);
        let text = view.search_text.clone();
        view.filters.set_query(text);
        view.recompute();
        true
    }

    /// Apply search text straight away
    pub fn search_now(&mut self, text: &str) {
        if let Some(view) = self.active_mut() {
            view.debouncer.reset();
            view.search_text = text.to_string();
            view.filters.set_query(text);
            view.recompute();
        }
    }

    /// Select a facet value (`None` for "All"). The value must come from
    /// the active dataset's domain and must not be a disabled option;
    /// suppressed facets are rejected.
    pub fn set_facet(&mut self, facet: Facet, value: Option<String>) -> Result<()> {
        let Some(view) = self.active_mut() else {
            bail!("No task table is showing");
        };
        if facet == Facet::Paper && !view.paper_linked() {
            bail!("{} has no paper linkage, {} filter unavailable", view.mode, facet);
        }
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            let domain = view.view.source().unique_values(facet.column());
            if !domain.iter().any(|d| d == v) {
                bail!("'{}' is not a {} value in {}", v, facet, view.mode);
            }
            let disabled = facet_options(&view.view, facet, view.filters.selection(facet))
                .iter()
                .any(|o| o.value == v && o.disabled);
            if disabled {
                bail!("'{}' matches no tasks with the current filters", v);
            }
        }
        view.filters.select(facet, value);
        view.recompute();
        Ok(())
    }

    /// Reset search text and every facet, showing the whole dataset
    pub fn clear_filters(&mut self) {
        if let Some(view) = self.active_mut() {
            info!(target: "task_viewer", "Clearing all filters");
            view.debouncer.reset();
            view.search_text.clear();
            view.filters.clear();
            view.recompute();
        }
    }

    pub fn title(&self) -> Option<String> {
        self.active().map(TaskView::title)
    }

    pub fn table_model(&self) -> Option<TableModel> {
        self.active().map(|v| v.table_model(&self.renderer))
    }
}
