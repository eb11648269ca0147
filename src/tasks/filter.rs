use crate::data::data_view::DataView;
use crate::data::datatable::DataTable;
use crate::tasks::columns::{
    ARCHETYPE, PAPER_ID, TASK_TYPE, WHAT_CATEGORY, WHAT_SUBCATEGORY, WHY_L1, WHY_L2,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Per-column equality filters of the task table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    Paper,
    TaskType,
    Archetype,
    WhyL1,
    WhyL2,
    WhatCategory,
    WhatSubcategory,
}

impl Facet {
    pub const ALL: [Facet; 7] = [
        Facet::Paper,
        Facet::TaskType,
        Facet::Archetype,
        Facet::WhyL1,
        Facet::WhyL2,
        Facet::WhatCategory,
        Facet::WhatSubcategory,
    ];

    /// Dataset column the facet compares against
    pub fn column(&self) -> &'static str {
        match self {
            Facet::Paper => PAPER_ID,
            Facet::TaskType => TASK_TYPE,
            Facet::Archetype => ARCHETYPE,
            Facet::WhyL1 => WHY_L1,
            Facet::WhyL2 => WHY_L2,
            Facet::WhatCategory => WHAT_CATEGORY,
            Facet::WhatSubcategory => WHAT_SUBCATEGORY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Facet::Paper => "Paper ID",
            Facet::TaskType => "Task Type",
            Facet::Archetype => "Archetype",
            Facet::WhyL1 => "Why L1 Action",
            Facet::WhyL2 => "Why L2 Action",
            Facet::WhatCategory => "What Category",
            Facet::WhatSubcategory => "What Subcategory",
        }
    }

    /// Option shown when nothing is selected
    pub fn placeholder(&self) -> &'static str {
        match self {
            Facet::Paper => "All Papers",
            Facet::TaskType => "All Types",
            Facet::Archetype => "All Archetypes",
            Facet::WhyL1 => "All L1 Actions",
            Facet::WhyL2 => "All L2 Actions",
            Facet::WhatCategory => "All Categories",
            Facet::WhatSubcategory => "All Subcategories",
        }
    }

    /// Short name used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Facet::Paper => "paper",
            Facet::TaskType => "type",
            Facet::Archetype => "archetype",
            Facet::WhyL1 => "whyl1",
            Facet::WhyL2 => "whyl2",
            Facet::WhatCategory => "whatcat",
            Facet::WhatSubcategory => "whatsubcat",
        }
    }

    /// Accepts the key, the label or the column name, ignoring case
    pub fn parse(name: &str) -> Option<Facet> {
        let name = name.trim();
        Facet::ALL.into_iter().find(|f| {
            f.key().eq_ignore_ascii_case(name)
                || f.label().eq_ignore_ascii_case(name)
                || f.column().eq_ignore_ascii_case(name)
        })
    }

    /// Facets offered for a dataset; the paper facet needs paper linkage
    pub fn available(paper_linked: bool) -> impl Iterator<Item = Facet> {
        Facet::ALL
            .into_iter()
            .filter(move |f| paper_linked || *f != Facet::Paper)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Search text plus facet selections of one task view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilterState {
    query: String,
    selections: BTreeMap<Facet, String>,
}

impl TaskFilterState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selection(&self, facet: Facet) -> Option<&str> {
        self.selections.get(&facet).map(String::as_str)
    }

    /// Select a value, or go back to "All" with `None` or an empty value
    pub fn select(&mut self, facet: Facet, value: Option<String>) {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.selections.insert(facet, v);
            }
            None => {
                self.selections.remove(&facet);
            }
        }
    }

    pub fn selections(&self) -> impl Iterator<Item = (Facet, &str)> {
        self.selections.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.selections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.selections.is_empty()
    }

    /// Row matches when its joined text contains the query (ignoring case)
    /// and every active facet equals its selection. The paper facet is
    /// ignored for unlinked datasets.
    pub fn matches(&self, table: &DataTable, row: usize, needle: &str, paper_linked: bool) -> bool {
        if !needle.is_empty() && !table.row_text(row).to_lowercase().contains(needle) {
            return false;
        }
        self.selections.iter().all(|(facet, value)| {
            (*facet == Facet::Paper && !paper_linked)
                || table.get_value_by_name(row, facet.column()) == value
        })
    }
}

/// Rebuild the Filtered View from the full dataset
pub fn apply_filters(table: Arc<DataTable>, state: &TaskFilterState, paper_linked: bool) -> DataView {
    let needle = state.query().to_lowercase();
    DataView::new(table).filter(|t, row| state.matches(t, row, &needle, paper_linked))
}

/// One entry of a facet dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOption {
    pub value: String,
    /// At least one row of the Filtered View carries this value
    pub available: bool,
    pub selected: bool,
    /// Greyed out and not selectable
    pub disabled: bool,
}

impl FacetOption {
    pub fn label(&self) -> String {
        if self.available {
            self.value.clone()
        } else {
            format!("{} (0)", self.value)
        }
    }
}

/// Options for a facet: the full value domain of the dataset, flagged by
/// whether the current Filtered View still contains them. The selected
/// value is never disabled, even when it matches nothing.
pub fn facet_options(view: &DataView, facet: Facet, selected: Option<&str>) -> Vec<FacetOption> {
    let source = view.source();
    let column = facet.column();
    let available: BTreeSet<&str> = view
        .visible_rows()
        .iter()
        .map(|&row| source.get_value_by_name(row, column))
        .filter(|v| !v.is_empty())
        .collect();

    source
        .unique_values(column)
        .into_iter()
        .map(|value| {
            let is_available = available.contains(value.as_str());
            let is_selected = selected == Some(value.as_str());
            FacetOption {
                disabled: !is_available && !is_selected,
                available: is_available,
                selected: is_selected,
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataRow};

    fn tasks() -> Arc<DataTable> {
        let mut table = DataTable::new("literature_tasks");
        for name in ["task_ID", "paper_ID", "Archetype", "Why L1 Action"] {
            table.add_column(DataColumn::new(name));
        }
        for row in [
            ["1", "P1", "A", "present"],
            ["2", "P2", "B", "discover"],
            ["3", "P2", "A", "discover"],
        ] {
            table
                .add_row(DataRow::new(row.iter().map(|s| s.to_string()).collect()))
                .unwrap();
        }
        Arc::new(table)
    }

    #[test]
    fn test_parse_facet_names() {
        assert_eq!(Facet::parse("archetype"), Some(Facet::Archetype));
        assert_eq!(Facet::parse("What Category"), Some(Facet::WhatCategory));
        assert_eq!(Facet::parse("paper_ID"), Some(Facet::Paper));
        assert_eq!(Facet::parse("colour"), None);
        assert_eq!(Facet::available(false).count(), 6);
    }

    #[test]
    fn test_query_and_facets_are_conjunctive() {
        let mut state = TaskFilterState::default();
        state.set_query("DISCOVER");
        state.select(Facet::Archetype, Some("A".to_string()));
        let view = apply_filters(tasks(), &state, true);
        assert_eq!(view.visible_rows(), &[2]);
    }

    #[test]
    fn test_paper_facet_ignored_without_linkage() {
        let mut state = TaskFilterState::default();
        state.select(Facet::Paper, Some("P1".to_string()));
        assert_eq!(apply_filters(tasks(), &state, true).row_count(), 1);
        assert_eq!(apply_filters(tasks(), &state, false).row_count(), 3);
    }

    #[test]
    fn test_select_empty_value_clears_facet() {
        let mut state = TaskFilterState::default();
        state.select(Facet::WhyL1, Some("present".to_string()));
        state.select(Facet::WhyL1, Some(String::new()));
        assert!(state.is_empty());
    }

    #[test]
    fn test_options_disable_unavailable_values() {
        let mut state = TaskFilterState::default();
        state.select(Facet::Archetype, Some("B".to_string()));
        let view = apply_filters(tasks(), &state, true);

        let papers = facet_options(&view, Facet::Paper, None);
        assert_eq!(papers.len(), 2);
        assert!(papers[0].disabled);
        assert_eq!(papers[0].label(), "P1 (0)");
        assert!(!papers[1].disabled);

        // B selected, then a query that excludes it
        state.set_query("present");
        let view = apply_filters(tasks(), &state, true);
        assert!(view.is_empty());
        let archetypes = facet_options(&view, Facet::Archetype, Some("B"));
        let b = archetypes.iter().find(|o| o.value == "B").unwrap();
        assert!(b.selected && !b.disabled);
        assert_eq!(b.label(), "B (0)");
    }
}
