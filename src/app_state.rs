use crate::catalog::{CardLayout, CatalogController, FilterCheckbox};
use crate::config::config::Config;
use crate::data::data_source::DataSource;
use crate::data::dataset_cache::DatasetCache;
use crate::notice::Notice;
use crate::sidebar::{CloseTrigger, TaskSidebar};
use crate::tasks::viewer::{TaskTableViewer, ViewMode};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, info};

/// Everything a session knows, owned in one place and handed to the UI
pub struct AppState {
    pub config: Config,
    pub cache: DatasetCache,
    pub catalog: CatalogController,
    pub viewer: TaskTableViewer,
    pub sidebar: TaskSidebar,
    notices: VecDeque<Notice>,
}

impl AppState {
    pub fn new(config: Config, source: Box<dyn DataSource>) -> Self {
        info!(target: "app", "Data source: {}", source.describe());
        Self {
            cache: DatasetCache::new(source, config.data.clone()),
            catalog: CatalogController::new(config.data.image_dir.clone()),
            viewer: TaskTableViewer::new(&config),
            sidebar: TaskSidebar::new(config.behavior.sidebar_transition_ms),
            notices: VecDeque::new(),
            config,
        }
    }

    /// Load the catalog and attach the per-card task buttons
    pub fn start(&mut self, layout: Option<&mut dyn CardLayout>) {
        let notice = self.catalog.load(&mut self.cache, layout);
        self.push_notice(notice);
        self.sidebar
            .attach_buttons(self.catalog.cards(), self.catalog.image_dir());
    }

    pub fn push_notice(&mut self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            debug!(target: "app", "Notice queued: {}", notice);
            self.notices.push_back(notice);
        }
    }

    /// Notice currently blocking the UI
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn select_tab(&mut self, mode: ViewMode) {
        // Leaving the catalog never leaves an overlay behind
        if mode != ViewMode::Catalog {
            self.sidebar.force_close();
        }
        let notice = self.viewer.select_tab(mode, &mut self.cache);
        self.push_notice(notice);
    }

    pub fn toggle_checkbox(&mut self, checkbox: FilterCheckbox, layout: Option<&mut dyn CardLayout>) {
        self.catalog.toggle(checkbox, layout);
    }

    /// Run the "View Tasks" action of a card
    pub fn view_tasks(&mut self, card_image: &str) {
        let Some(paper_id) = self.sidebar.button(card_image).map(|b| b.paper_id.clone()) else {
            debug!(target: "app", "No task button on card {}", card_image);
            return;
        };
        let notice = self.sidebar.activate(&paper_id, &mut self.cache);
        self.push_notice(notice);
    }

    /// First half of "View Tasks": show the loading state. Returns the
    /// paper to finish with `finish_view_tasks` once the UI has redrawn.
    pub fn begin_view_tasks(&mut self, card_image: &str) -> Option<String> {
        let paper_id = self.sidebar.button(card_image).map(|b| b.paper_id.clone())?;
        self.sidebar.begin_activation(&paper_id).then_some(paper_id)
    }

    pub fn finish_view_tasks(&mut self, paper_id: &str) {
        let notice = self.sidebar.complete_activation(paper_id, &mut self.cache);
        self.push_notice(notice);
    }

    pub fn close_sidebar(&mut self, trigger: CloseTrigger, now: Instant) {
        self.sidebar.close(trigger, now);
    }

    /// Advance timers. Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let searched = self.viewer.poll_debounce(now);
        let closed = self.sidebar.tick(now);
        searched || closed
    }
}
