use crate::data::datatable::DataTable;
use crate::utils::labels::{sentence_case, title_case};
use std::collections::BTreeSet;
use std::fmt;

/// Task-level categories and the sub-values each one can take. The group
/// name is also the catalog column holding the paper's value.
pub const TAXONOMY: &[(&str, &[&str])] = &[
    ("identify", &["mapped", "distorted", "abstract"]),
    ("monitor", &["single", "mapped_or_abstract", "multiple"]),
    (
        "analyse",
        &[
            "passive",
            "exploration",
            "navigation",
            "filter_and_focus",
            "personalisation",
        ],
    ),
];

/// Data-type tags; each is a catalog column holding "yes" when it applies
pub const DATA_TYPES: &[&str] = &[
    "3D",
    "animation",
    "AR",
    "bar_charts",
    "box_plots",
    "chord_diagrams",
    "colour_hue",
    "colour_value_or_intensity",
    "contours",
    "flow_maps",
    "glyphs",
    "histograms",
    "line_charts",
    "orientation",
    "parallel_coordinates",
    "pie_charts",
    "radial_charts",
    "sankey_diagrams",
    "shape",
    "size",
    "tables_and_panels",
    "texture",
    "tooltips",
    "vector_fields",
    "VE",
    "VR",
];

/// Publication-type tags, same "yes" convention as the data types
pub const PUB_TYPES: &[&str] = &[
    "computer_science",
    "engineering",
    "physics",
    "systems",
    "visualisation",
];

/// Value a tag column must hold for a checked tag to match
pub const TAG_MATCH: &str = "yes";

/// Identity of one catalog checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterCheckbox {
    Taxonomy {
        group: &'static str,
        value: &'static str,
    },
    DataType(&'static str),
    PubType(&'static str),
}

impl FilterCheckbox {
    pub fn label(&self) -> String {
        match self {
            FilterCheckbox::Taxonomy { value, .. } => title_case(value),
            FilterCheckbox::DataType(tag) | FilterCheckbox::PubType(tag) => sentence_case(tag),
        }
    }

    pub fn section(&self) -> FilterSection {
        match self {
            FilterCheckbox::Taxonomy { group, .. } => FilterSection::Taxonomy(*group),
            FilterCheckbox::DataType(_) => FilterSection::DataTypes,
            FilterCheckbox::PubType(_) => FilterSection::PubTypes,
        }
    }

    /// Every checkbox in panel order: taxonomy groups, data types, pub types
    pub fn all() -> Vec<FilterCheckbox> {
        let taxonomy = TAXONOMY.iter().flat_map(|(group, values)| {
            values
                .iter()
                .map(move |value| FilterCheckbox::Taxonomy {
                    group: *group,
                    value: *value,
                })
        });
        taxonomy
            .chain(DATA_TYPES.iter().map(|t| FilterCheckbox::DataType(*t)))
            .chain(PUB_TYPES.iter().map(|t| FilterCheckbox::PubType(*t)))
            .collect()
    }

    /// Resolve `group:value` or a bare tag name (case-insensitive)
    pub fn parse(spec: &str) -> Option<FilterCheckbox> {
        let spec = spec.trim();
        if let Some((group, value)) = spec.split_once(':') {
            return TAXONOMY
                .iter()
                .find(|(g, _)| g.eq_ignore_ascii_case(group.trim()))
                .and_then(|(g, values)| {
                    values
                        .iter()
                        .find(|v| v.eq_ignore_ascii_case(value.trim()))
                        .map(|v| FilterCheckbox::Taxonomy {
                            group: *g,
                            value: *v,
                        })
                });
        }
        DATA_TYPES
            .iter()
            .find(|t| t.eq_ignore_ascii_case(spec))
            .map(|t| FilterCheckbox::DataType(*t))
            .or_else(|| {
                PUB_TYPES
                    .iter()
                    .find(|t| t.eq_ignore_ascii_case(spec))
                    .map(|t| FilterCheckbox::PubType(*t))
            })
    }
}

impl fmt::Display for FilterCheckbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCheckbox::Taxonomy { group, value } => write!(f, "{}:{}", group, value),
            FilterCheckbox::DataType(tag) | FilterCheckbox::PubType(tag) => f.write_str(tag),
        }
    }
}

/// Panel a checkbox is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSection {
    Taxonomy(&'static str),
    DataTypes,
    PubTypes,
}

impl FilterSection {
    pub fn heading(&self) -> String {
        match self {
            FilterSection::Taxonomy(group) => title_case(group),
            FilterSection::DataTypes => "Data features".to_string(),
            FilterSection::PubTypes => "Publication type".to_string(),
        }
    }
}

/// Checked state of every catalog checkbox
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    checked: BTreeSet<FilterCheckbox>,
}

impl CatalogFilters {
    pub fn is_checked(&self, checkbox: &FilterCheckbox) -> bool {
        self.checked.contains(checkbox)
    }

    pub fn set_checked(&mut self, checkbox: FilterCheckbox, checked: bool) {
        if checked {
            self.checked.insert(checkbox);
        } else {
            self.checked.remove(&checkbox);
        }
    }

    /// Flip a checkbox, returning its new state
    pub fn toggle(&mut self, checkbox: FilterCheckbox) -> bool {
        let now_checked = !self.is_checked(&checkbox);
        self.set_checked(checkbox, now_checked);
        now_checked
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn checked(&self) -> impl Iterator<Item = &FilterCheckbox> {
        self.checked.iter()
    }

    /// Checked sub-values of one taxonomy group
    pub fn checked_values(&self, group: &str) -> Vec<&'static str> {
        self.checked
            .iter()
            .filter_map(|c| match c {
                FilterCheckbox::Taxonomy { group: g, value } if *g == group => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// A paper matches when, for every taxonomy group with a checked value,
    /// its value is one of the checked ones, and every checked tag column
    /// reads "yes"
    pub fn matches(&self, table: &DataTable, row: usize) -> bool {
        let taxonomy_ok = TAXONOMY.iter().all(|(group, _)| {
            let selected = self.checked_values(group);
            let value = table.get_value_by_name(row, group);
            selected.is_empty() || selected.iter().any(|v| *v == value)
        });

        taxonomy_ok
            && self.checked.iter().all(|c| match c {
                FilterCheckbox::Taxonomy { .. } => true,
                FilterCheckbox::DataType(tag) | FilterCheckbox::PubType(tag) => {
                    table.get_value_by_name(row, tag) == TAG_MATCH
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_checkboxes_in_panel_order() {
        let all = FilterCheckbox::all();
        assert_eq!(all.len(), 11 + DATA_TYPES.len() + PUB_TYPES.len());
        assert_eq!(
            all[0],
            FilterCheckbox::Taxonomy {
                group: "identify",
                value: "mapped"
            }
        );
        assert_eq!(all.last(), Some(&FilterCheckbox::PubType("visualisation")));
    }

    #[test]
    fn test_parse_checkbox_specs() {
        assert_eq!(
            FilterCheckbox::parse("Monitor:Single"),
            Some(FilterCheckbox::Taxonomy {
                group: "monitor",
                value: "single"
            })
        );
        assert_eq!(FilterCheckbox::parse("vr"), Some(FilterCheckbox::DataType("VR")));
        assert_eq!(
            FilterCheckbox::parse("physics"),
            Some(FilterCheckbox::PubType("physics"))
        );
        assert_eq!(FilterCheckbox::parse("identify:nothing"), None);
        assert_eq!(FilterCheckbox::parse("hologram"), None);
    }

    #[test]
    fn test_labels() {
        let checkbox = FilterCheckbox::parse("analyse:filter_and_focus").unwrap();
        assert_eq!(checkbox.label(), "Filter And Focus");
        assert_eq!(checkbox.section().heading(), "Analyse");
        assert_eq!(FilterCheckbox::DataType("flow_maps").label(), "Flow maps");
    }

    #[test]
    fn test_toggle() {
        let mut filters = CatalogFilters::default();
        let vr = FilterCheckbox::DataType("VR");
        assert!(filters.toggle(vr));
        assert!(filters.is_checked(&vr));
        assert!(!filters.toggle(vr));
        assert!(filters.is_empty());
    }
}
