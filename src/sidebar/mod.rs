//! Per-Paper Task Sidebar
//!
//! Each catalog card gets a "View Tasks" action that opens a slide-in panel
//! with the literature tasks of that paper.

use crate::catalog::PaperCard;
use crate::data::dataset_cache::{DatasetCache, DatasetKind};
use crate::notice::Notice;
use crate::tasks::columns::{PAPER_ID, TASK_ID, TASK_TYPE, USER_TASK};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const PANEL_HEADING: &str = "Visualisation Tasks";

/// Paper identifier of an image path: last path segment up to the first dot
pub fn paper_id_from_image_path(path: &str) -> String {
    let filename = path.rsplit('/').next().unwrap_or(path);
    filename.split('.').next().unwrap_or(filename).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Loading,
}

/// Action attached to one catalog card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTasksButton {
    pub paper_id: String,
    pub state: ButtonState,
}

impl ViewTasksButton {
    pub fn label(&self) -> &'static str {
        match self.state {
            ButtonState::Idle => "View Tasks",
            ButtonState::Loading => "Loading...",
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state == ButtonState::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub task_id: String,
    pub description: String,
    pub task_type: String,
}

/// What closed the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    Backdrop,
    CloseControl,
    Escape,
}

impl fmt::Display for CloseTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseTrigger::Backdrop => write!(f, "backdrop"),
            CloseTrigger::CloseControl => write!(f, "close control"),
            CloseTrigger::Escape => write!(f, "escape"),
        }
    }
}

/// The open overlay (backdrop and panel together)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarPanel {
    pub paper_id: String,
    pub rows: Vec<SidebarRow>,
    /// Set while the closing transition runs
    closing_until: Option<Instant>,
}

impl SidebarPanel {
    pub fn subtitle(&self) -> String {
        format!("Paper: {}", self.paper_id)
    }

    pub fn summary(&self) -> String {
        format!("Found {} tasks", self.rows.len())
    }

    pub fn is_closing(&self) -> bool {
        self.closing_until.is_some()
    }
}

/// Buttons, per-paper results and the single open panel
pub struct TaskSidebar {
    /// Keyed by card image, the identity of a card
    buttons: BTreeMap<String, ViewTasksButton>,
    results: HashMap<String, Vec<SidebarRow>>,
    panel: Option<SidebarPanel>,
    transition: Duration,
}

impl TaskSidebar {
    pub fn new(transition_ms: u64) -> Self {
        Self {
            buttons: BTreeMap::new(),
            results: HashMap::new(),
            panel: None,
            transition: Duration::from_millis(transition_ms),
        }
    }

    /// Give every rendered card a button. Safe to call again after a
    /// re-render; cards that already have one are left alone. Returns the
    /// number of buttons added.
    pub fn attach_buttons(&mut self, cards: &[PaperCard], image_dir: &str) -> usize {
        let mut added = 0;
        for (index, card) in cards.iter().enumerate() {
            if card.image.is_empty() {
                warn!(target: "sidebar", "Card {}: no image identifier, skipping", index);
                continue;
            }
            if self.buttons.contains_key(&card.image) {
                continue;
            }
            let paper_id = paper_id_from_image_path(&card.image_path(image_dir));
            debug!(target: "sidebar", "Card {}: paper ID = {}", index, paper_id);
            self.buttons.insert(
                card.image.clone(),
                ViewTasksButton {
                    paper_id,
                    state: ButtonState::Idle,
                },
            );
            added += 1;
        }
        info!(target: "sidebar", "Total buttons added: {}", added);
        added
    }

    pub fn button(&self, card_image: &str) -> Option<&ViewTasksButton> {
        self.buttons.get(card_image)
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    fn button_for_paper(&mut self, paper_id: &str) -> Option<&mut ViewTasksButton> {
        self.buttons.values_mut().find(|b| b.paper_id == paper_id)
    }

    /// Put the paper's button into its loading state. Returns false when
    /// there is no such button or it is already loading.
    pub fn begin_activation(&mut self, paper_id: &str) -> bool {
        match self.button_for_paper(paper_id) {
            Some(button) if button.is_enabled() => {
                button.state = ButtonState::Loading;
                info!(target: "sidebar", "Loading tasks for paper: {}", paper_id);
                true
            }
            Some(_) => false,
            None => {
                warn!(target: "sidebar", "No button attached for paper {}", paper_id);
                false
            }
        }
    }

    /// Look up the paper's tasks and open the panel. The button goes back to
    /// idle whatever the outcome.
    pub fn complete_activation(&mut self, paper_id: &str, cache: &mut DatasetCache) -> Option<Notice> {
        let notice = match self.tasks_for(paper_id, cache) {
            Ok(rows) if rows.is_empty() => Some(Notice::info(
                "No tasks",
                format!("No tasks found for paper: {}", paper_id),
            )),
            Ok(rows) => {
                self.open(paper_id, rows);
                None
            }
            Err(notice) => Some(notice),
        };

        if let Some(button) = self.button_for_paper(paper_id) {
            button.state = ButtonState::Idle;
        }
        notice
    }

    pub fn activate(&mut self, paper_id: &str, cache: &mut DatasetCache) -> Option<Notice> {
        if !self.begin_activation(paper_id) {
            return None;
        }
        self.complete_activation(paper_id, cache)
    }

    fn tasks_for(&mut self, paper_id: &str, cache: &mut DatasetCache) -> Result<Vec<SidebarRow>, Notice> {
        if let Some(rows) = self.results.get(paper_id) {
            return Ok(rows.clone());
        }

        let outcome = cache.get_or_load(DatasetKind::LiteratureTasks);
        if let Some(e) = outcome.error {
            return Err(Notice::error(
                "Error loading data",
                format!("Error loading data. Check the log for details. ({:#})", e),
            ));
        }

        let table = outcome.table;
        let rows: Vec<SidebarRow> = (0..table.row_count())
            .filter(|&r| table.get_value_by_name(r, PAPER_ID) == paper_id)
            .map(|r| SidebarRow {
                task_id: table.get_value_by_name(r, TASK_ID).to_string(),
                description: table.get_value_by_name(r, USER_TASK).to_string(),
                task_type: table.get_value_by_name(r, TASK_TYPE).to_string(),
            })
            .collect();

        if rows.is_empty() {
            debug!(
                target: "sidebar",
                "No data found for paper_ID {}; available: {:?}",
                paper_id,
                table.unique_values(PAPER_ID).into_iter().take(10).collect::<Vec<_>>()
            );
        }
        self.results.insert(paper_id.to_string(), rows.clone());
        Ok(rows)
    }

    /// Any open panel is removed at once, without a transition
    fn open(&mut self, paper_id: &str, rows: Vec<SidebarRow>) {
        self.force_close();
        info!(target: "sidebar", "Showing {} tasks for paper {}", rows.len(), paper_id);
        self.panel = Some(SidebarPanel {
            paper_id: paper_id.to_string(),
            rows,
            closing_until: None,
        });
    }

    pub fn force_close(&mut self) {
        if self.panel.take().is_some() {
            debug!(target: "sidebar", "Force-closed open sidebar");
        }
    }

    /// Start the closing transition; the panel disappears on a later `tick`
    pub fn close(&mut self, trigger: CloseTrigger, now: Instant) {
        let transition = self.transition;
        if let Some(panel) = self.panel.as_mut() {
            if panel.closing_until.is_none() {
                debug!(target: "sidebar", "Closing sidebar ({})", trigger);
                panel.closing_until = Some(now + transition);
            }
        }
    }

    /// Finish a closing transition whose time is up. Returns true when the
    /// panel was removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let done = matches!(
            self.panel.as_ref().and_then(|p| p.closing_until),
            Some(deadline) if now >= deadline
        );
        if done {
            self.panel = None;
        }
        done
    }

    pub fn panel(&self) -> Option<&SidebarPanel> {
        self.panel.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    /// Catalog scrolling is blocked while the overlay is on screen
    pub fn scroll_locked(&self) -> bool {
        self.panel.is_some()
    }

    pub fn cached_papers(&self) -> usize {
        self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(image: &str) -> PaperCard {
        PaperCard {
            image: image.to_string(),
            title: String::new(),
            author: String::new(),
            venue: String::new(),
            year: String::new(),
            url: String::new(),
            visible: true,
        }
    }

    #[test]
    fn test_paper_id_from_image_path() {
        assert_eq!(paper_id_from_image_path("energyimg/smith2020.png"), "smith2020");
        assert_eq!(paper_id_from_image_path("a/b/c.tar.gz"), "c");
        assert_eq!(paper_id_from_image_path("plain"), "plain");
    }

    #[test]
    fn test_attach_buttons_is_idempotent() {
        let mut sidebar = TaskSidebar::new(300);
        let cards = vec![card("p1"), card(""), card("p2")];
        assert_eq!(sidebar.attach_buttons(&cards, "energyimg"), 2);
        assert_eq!(sidebar.attach_buttons(&cards, "energyimg"), 0);
        assert_eq!(sidebar.button_count(), 2);
        assert_eq!(sidebar.button("p1").map(|b| b.label()), Some("View Tasks"));
    }

    #[test]
    fn test_begin_activation_disables_button() {
        let mut sidebar = TaskSidebar::new(300);
        sidebar.attach_buttons(&[card("p1")], "energyimg");
        assert!(sidebar.begin_activation("p1"));
        let button = sidebar.button("p1").unwrap();
        assert!(!button.is_enabled());
        assert_eq!(button.label(), "Loading...");
        assert!(!sidebar.begin_activation("p1"));
        assert!(!sidebar.begin_activation("unknown"));
    }

    #[test]
    fn test_close_waits_for_transition() {
        let mut sidebar = TaskSidebar::new(300);
        let start = Instant::now();
        sidebar.open("p1", vec![]);
        sidebar.close(CloseTrigger::Escape, start);
        assert!(sidebar.panel().unwrap().is_closing());
        assert!(sidebar.scroll_locked());
        assert!(!sidebar.tick(start + Duration::from_millis(100)));
        assert!(sidebar.tick(start + Duration::from_millis(300)));
        assert!(!sidebar.is_open());
        assert!(!sidebar.scroll_locked());
    }

    #[test]
    fn test_open_replaces_existing_panel() {
        let mut sidebar = TaskSidebar::new(300);
        let now = Instant::now();
        sidebar.open("p1", vec![]);
        sidebar.close(CloseTrigger::Backdrop, now);
        sidebar.open("p2", vec![]);
        let panel = sidebar.panel().unwrap();
        assert_eq!(panel.paper_id, "p2");
        assert!(!panel.is_closing());
    }
}
