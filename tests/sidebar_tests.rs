mod common;

use common::{full_source, state_with, MemorySource, CATALOG_CSV, LITERATURE_CSV};
use energyvis::app_state::AppState;
use energyvis::config::config::Config;
use energyvis::data::data_source::FileSource;
use energyvis::data::dataset_cache::DatasetKind;
use energyvis::notice::NoticeKind;
use energyvis::sidebar::{ButtonState, CloseTrigger};
use energyvis::tasks::viewer::ViewMode;
use std::time::{Duration, Instant};

fn started(source: MemorySource) -> AppState {
    let mut state = state_with(source);
    state.start(None);
    state
}

#[test]
fn test_every_card_gets_a_button() {
    let mut state = started(full_source());
    assert_eq!(state.sidebar.button_count(), 4);
    let button = state.sidebar.button("p2").unwrap();
    assert_eq!(button.paper_id, "p2");
    assert_eq!(button.label(), "View Tasks");

    // A re-render attaches nothing new
    let added = state
        .sidebar
        .attach_buttons(state.catalog.cards(), state.catalog.image_dir());
    assert_eq!(added, 0);
    assert_eq!(state.sidebar.button_count(), 4);
}

#[test]
fn test_view_tasks_opens_panel_for_paper() {
    let mut state = started(full_source());
    state.view_tasks("p1");

    let panel = state.sidebar.panel().unwrap();
    assert_eq!(panel.subtitle(), "Paper: p1");
    assert_eq!(panel.summary(), "Found 2 tasks");
    let ids: Vec<&str> = panel.rows.iter().map(|r| r.task_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(panel.rows[0].description, "Locate overloaded lines");
    assert_eq!(panel.rows[0].task_type, "network");
    assert!(state.sidebar.scroll_locked());
    assert!(state.current_notice().is_none());
}

#[test]
fn test_loading_state_until_fetch_completes() {
    let mut state = started(full_source());
    let paper = state.begin_view_tasks("p3").unwrap();
    let button = state.sidebar.button("p3").unwrap();
    assert_eq!(button.state, ButtonState::Loading);
    assert_eq!(button.label(), "Loading...");
    assert!(!button.is_enabled());

    // A second press while loading is ignored
    assert!(state.begin_view_tasks("p3").is_none());

    state.finish_view_tasks(&paper);
    assert!(state.sidebar.button("p3").unwrap().is_enabled());
    assert_eq!(state.sidebar.panel().unwrap().rows.len(), 1);
}

#[test]
fn test_paper_without_tasks_shows_info() {
    let mut state = started(full_source());
    state.view_tasks("p4");

    assert!(!state.sidebar.is_open());
    let notice = state.dismiss_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.message, "No tasks found for paper: p4");
    assert!(state.sidebar.button("p4").unwrap().is_enabled());
}

#[test]
fn test_results_are_cached_per_paper() {
    let source = full_source();
    let fetches = source.fetch_counter();
    let mut state = started(source);

    state.view_tasks("p1");
    state.close_sidebar(CloseTrigger::Escape, Instant::now());
    state.sidebar.force_close();
    state.view_tasks("p2");
    state.view_tasks("p1");

    // Catalog and literature tasks, each fetched once
    assert_eq!(fetches.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert_eq!(state.sidebar.cached_papers(), 2);

    // The Literature tab reuses the dataset the sidebar loaded
    state.select_tab(ViewMode::Literature);
    assert_eq!(state.cache.fetch_count(DatasetKind::LiteratureTasks), 1);
}

#[test]
fn test_opening_another_paper_replaces_panel() {
    let mut state = started(full_source());
    state.view_tasks("p1");
    state.view_tasks("p2");

    let panel = state.sidebar.panel().unwrap();
    assert_eq!(panel.paper_id, "p2");
    assert!(!panel.is_closing());
}

#[test]
fn test_close_waits_for_transition() {
    let mut state = started(full_source());
    state.view_tasks("p1");

    let t0 = Instant::now();
    state.close_sidebar(CloseTrigger::Backdrop, t0);
    assert!(state.sidebar.panel().unwrap().is_closing());
    assert!(!state.tick(t0 + Duration::from_millis(100)));
    assert!(state.sidebar.is_open());

    assert!(state.tick(t0 + Duration::from_millis(300)));
    assert!(!state.sidebar.is_open());
    assert!(!state.sidebar.scroll_locked());
}

#[test]
fn test_leaving_catalog_closes_sidebar() {
    let mut state = started(full_source());
    state.view_tasks("p1");
    state.select_tab(ViewMode::Field);
    assert!(!state.sidebar.is_open());
}

#[test]
fn test_failed_fetch_reports_error_and_retries() {
    let source = MemorySource::new().with_file("energynetworks.csv", CATALOG_CSV);
    let mut state = started(source);

    state.view_tasks("p1");
    let notice = state.dismiss_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.message.starts_with("Error loading data. Check the log for details."));
    assert!(!state.sidebar.is_open());
    assert!(state.sidebar.button("p1").unwrap().is_enabled());
    assert_eq!(state.sidebar.cached_papers(), 0);

    state.view_tasks("p1");
    assert_eq!(state.cache.fetch_count(DatasetKind::LiteratureTasks), 2);
}

#[test]
fn test_file_source_loads_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("energynetworks.csv"), CATALOG_CSV).unwrap();
    std::fs::write(dir.path().join("literature_tasks.csv"), LITERATURE_CSV).unwrap();

    let mut state = AppState::new(Config::default(), Box::new(FileSource::new(dir.path())));
    state.start(None);
    assert_eq!(state.catalog.total_count(), 4);

    state.view_tasks("p2");
    assert_eq!(state.sidebar.panel().unwrap().summary(), "Found 1 tasks");
}
