use crate::catalog::taxonomy::{CatalogFilters, FilterCheckbox};
use crate::data::data_view::DataView;
use crate::data::dataset_cache::{DatasetCache, DatasetKind};
use crate::data::datatable::DataTable;
use crate::notice::Notice;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

const COL_IMAGE: &str = "image";
const COL_TITLE: &str = "Title";
const COL_AUTHOR: &str = "Author";
const COL_VENUE: &str = "Publication Title";
const COL_YEAR: &str = "Publication Year";
const COL_URL: &str = "URL";

/// Positions the catalog cards. Called after every visibility change with
/// all cards, hidden ones included, so the engine can keep its own state.
pub trait CardLayout {
    fn layout(&mut self, cards: &[PaperCard]);
}

/// One rendered paper of the catalog grid. Cards stay in the grid for the
/// whole session; filtering only flips `visible`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperCard {
    /// Unique image identifier, also the card's identity
    pub image: String,
    pub title: String,
    pub author: String,
    pub venue: String,
    pub year: String,
    pub url: String,
    pub visible: bool,
}

impl PaperCard {
    fn from_row(table: &DataTable, row: usize) -> Self {
        Self {
            image: table.get_value_by_name(row, COL_IMAGE).to_string(),
            title: table.get_value_by_name(row, COL_TITLE).to_string(),
            author: table.get_value_by_name(row, COL_AUTHOR).to_string(),
            venue: table.get_value_by_name(row, COL_VENUE).to_string(),
            year: table.get_value_by_name(row, COL_YEAR).to_string(),
            url: table.get_value_by_name(row, COL_URL).to_string(),
            visible: true,
        }
    }

    /// "Author. Venue (Year)"
    pub fn citation(&self) -> String {
        format!("{}. {} ({})", self.author, self.venue, self.year)
    }

    pub fn image_path(&self, image_dir: &str) -> String {
        format!("{}/{}.png", image_dir.trim_end_matches('/'), self.image)
    }
}

/// Paper grid with composable checkbox facets
pub struct CatalogController {
    view: DataView,
    filters: CatalogFilters,
    cards: Vec<PaperCard>,
    image_dir: String,
}

impl CatalogController {
    pub fn new(image_dir: impl Into<String>) -> Self {
        Self {
            view: DataView::new(Arc::new(DataTable::new(DatasetKind::Catalog.table_name()))),
            filters: CatalogFilters::default(),
            cards: Vec::new(),
            image_dir: image_dir.into(),
        }
    }

    /// Load the catalog and draw one card per paper
    pub fn load(
        &mut self,
        cache: &mut DatasetCache,
        layout: Option<&mut dyn CardLayout>,
    ) -> Option<Notice> {
        let outcome = cache.get_or_load(DatasetKind::Catalog);
        let table = outcome.table;

        self.cards = (0..table.row_count())
            .map(|row| PaperCard::from_row(&table, row))
            .collect();
        self.view = DataView::new(table);
        info!(target: "catalog", "Catalog loaded with {} papers", self.total_count());

        self.refresh(layout);

        outcome.error.map(|e| {
            Notice::error(
                "Error loading catalog",
                format!(
                    "Error loading paper data. Make sure {} is in {}. ({:#})",
                    cache.file_name(DatasetKind::Catalog),
                    cache.source_description(),
                    e
                ),
            )
        })
    }

    pub fn filters(&self) -> &CatalogFilters {
        &self.filters
    }

    pub fn toggle(&mut self, checkbox: FilterCheckbox, layout: Option<&mut dyn CardLayout>) -> bool {
        let checked = self.filters.toggle(checkbox);
        debug!(target: "catalog", "{} -> {}", checkbox, if checked { "checked" } else { "unchecked" });
        self.refresh(layout);
        checked
    }

    pub fn set_checked(
        &mut self,
        checkbox: FilterCheckbox,
        checked: bool,
        layout: Option<&mut dyn CardLayout>,
    ) {
        self.filters.set_checked(checkbox, checked);
        self.refresh(layout);
    }

    /// Uncheck everything and show every card again
    pub fn show_all(&mut self, layout: Option<&mut dyn CardLayout>) {
        self.filters.clear();
        self.refresh(layout);
    }

    /// Recompute the matching subset from scratch and flip card visibility
    fn refresh(&mut self, layout: Option<&mut dyn CardLayout>) {
        let filters = &self.filters;
        self.view = DataView::new(self.view.source_arc()).filter(|t, r| filters.matches(t, r));

        let source = self.view.source();
        let ids: HashSet<&str> = self
            .view
            .visible_rows()
            .iter()
            .map(|&r| source.get_value_by_name(r, COL_IMAGE))
            .collect();
        for card in &mut self.cards {
            card.visible = ids.contains(card.image.as_str());
        }

        info!(
            target: "catalog",
            "{} of {} papers match",
            self.visible_count(),
            self.total_count()
        );

        match layout {
            Some(layout) => layout.layout(&self.cards),
            None => debug!(target: "catalog", "No layout engine attached, skipping relayout"),
        }
    }

    /// Number of papers matching the filters
    pub fn visible_count(&self) -> usize {
        self.view.row_count()
    }

    pub fn total_count(&self) -> usize {
        self.view.total_count()
    }

    pub fn cards(&self) -> &[PaperCard] {
        &self.cards
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &PaperCard> {
        self.cards.iter().filter(|c| c.visible)
    }

    pub fn image_dir(&self) -> &str {
        &self.image_dir
    }
}
