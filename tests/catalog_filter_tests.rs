mod common;

use common::{full_source, state_with, MemorySource};
use energyvis::catalog::{CardLayout, FilterCheckbox, PaperCard};
use energyvis::notice::NoticeKind;
use energyvis::ui::masonry::MasonryLayout;

/// Layout engine that only remembers what it was asked to lay out
#[derive(Default)]
struct RecordingLayout {
    calls: usize,
    last_total: usize,
    last_visible: Vec<String>,
}

impl CardLayout for RecordingLayout {
    fn layout(&mut self, cards: &[PaperCard]) {
        self.calls += 1;
        self.last_total = cards.len();
        self.last_visible = cards
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.image.clone())
            .collect();
    }
}

fn taxonomy(group: &'static str, value: &'static str) -> FilterCheckbox {
    FilterCheckbox::Taxonomy { group, value }
}

fn visible(state: &energyvis::app_state::AppState) -> Vec<&str> {
    state
        .catalog
        .visible_cards()
        .map(|c| c.image.as_str())
        .collect()
}

#[test]
fn test_values_within_a_group_are_alternatives() {
    let mut state = state_with(full_source());
    state.start(None);

    state.toggle_checkbox(taxonomy("identify", "mapped"), None);
    assert_eq!(visible(&state), vec!["p1", "p3"]);

    state.toggle_checkbox(taxonomy("identify", "abstract"), None);
    assert_eq!(visible(&state), vec!["p1", "p2", "p3"]);
}

#[test]
fn test_groups_and_tags_combine_with_and() {
    let mut state = state_with(full_source());
    state.start(None);

    state.toggle_checkbox(taxonomy("identify", "mapped"), None);
    state.toggle_checkbox(taxonomy("monitor", "multiple"), None);
    assert_eq!(visible(&state), vec!["p3"]);

    state.catalog.show_all(None);
    state.toggle_checkbox(FilterCheckbox::DataType("VR"), None);
    assert_eq!(visible(&state), vec!["p1", "p3"]);
    state.toggle_checkbox(FilterCheckbox::DataType("bar_charts"), None);
    assert_eq!(visible(&state), vec!["p3"]);
    state.toggle_checkbox(FilterCheckbox::PubType("physics"), None);
    assert!(visible(&state).is_empty());
    assert_eq!(state.catalog.visible_count(), 0);
}

#[test]
fn test_unchecking_restores_cards() {
    let mut state = state_with(full_source());
    state.start(None);

    let checkbox = FilterCheckbox::PubType("engineering");
    assert!(state.catalog.toggle(checkbox, None));
    assert_eq!(visible(&state), vec!["p2", "p3"]);
    assert!(!state.catalog.toggle(checkbox, None));
    assert_eq!(state.catalog.visible_count(), 4);
}

#[test]
fn test_show_all_clears_every_checkbox() {
    let mut state = state_with(full_source());
    state.start(None);
    state.toggle_checkbox(taxonomy("analyse", "passive"), None);
    state.toggle_checkbox(FilterCheckbox::DataType("VR"), None);
    assert_eq!(visible(&state), vec!["p3"]);

    state.catalog.show_all(None);
    assert!(state.catalog.filters().is_empty());
    assert_eq!(state.catalog.visible_count(), state.catalog.total_count());
}

#[test]
fn test_hidden_cards_stay_in_grid() {
    let mut state = state_with(full_source());
    state.start(None);
    state.toggle_checkbox(taxonomy("identify", "distorted"), None);

    assert_eq!(state.catalog.cards().len(), 4);
    assert_eq!(visible(&state), vec!["p4"]);
    assert_eq!(state.catalog.total_count(), 4);
}

#[test]
fn test_layout_engine_runs_after_each_change() {
    let mut state = state_with(full_source());
    let mut layout = RecordingLayout::default();
    state.start(Some(&mut layout));
    assert_eq!(layout.calls, 1);
    assert_eq!(layout.last_visible.len(), 4);

    state.toggle_checkbox(FilterCheckbox::DataType("VR"), Some(&mut layout));
    assert_eq!(layout.calls, 2);
    assert_eq!(layout.last_total, 4);
    assert_eq!(layout.last_visible, vec!["p1", "p3"]);

    state.catalog.show_all(Some(&mut layout));
    assert_eq!(layout.calls, 3);
    assert_eq!(layout.last_visible.len(), 4);
}

#[test]
fn test_masonry_places_only_visible_cards() {
    let mut state = state_with(full_source());
    let mut masonry = MasonryLayout::new(30, 2);
    masonry.set_available_width(64);
    state.start(Some(&mut masonry));
    assert_eq!(masonry.columns(), 2);
    assert_eq!(masonry.placements().len(), 4);

    state.toggle_checkbox(FilterCheckbox::PubType("engineering"), Some(&mut masonry));
    assert_eq!(masonry.placements().len(), 2);
    assert!(masonry.placement_of("p1").is_none());
    let first = masonry.placement_of("p2").unwrap();
    let second = masonry.placement_of("p3").unwrap();
    assert_eq!((first.column, first.y), (0, 0));
    assert_eq!((second.column, second.y), (1, 0));
}

#[test]
fn test_missing_catalog_reports_and_stays_usable() {
    let mut state = state_with(MemorySource::new());
    state.start(None);

    let notice = state.dismiss_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.message.contains("energynetworks.csv"));
    assert_eq!(state.catalog.cards().len(), 0);
    assert_eq!(state.sidebar.button_count(), 0);

    state.toggle_checkbox(FilterCheckbox::DataType("VR"), None);
    assert_eq!(state.catalog.visible_count(), 0);
}

#[test]
fn test_catalog_fetched_once_per_session() {
    let source = full_source();
    let fetches = source.fetch_counter();
    let mut state = state_with(source);
    state.start(None);
    state.toggle_checkbox(FilterCheckbox::DataType("VR"), None);
    state.catalog.show_all(None);
    assert_eq!(fetches.load(std::sync::atomic::Ordering::SeqCst), 1);
}
