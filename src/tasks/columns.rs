use std::collections::BTreeSet;

pub const TASK_ID: &str = "task_ID";
pub const PAPER_ID: &str = "paper_ID";
pub const USER_TASK: &str = "User Task";
pub const TASK_TYPE: &str = "Task Type (network, geospatial, temporal, neither, all)";
pub const ARCHETYPE: &str = "Archetype";
pub const WHY_L1: &str = "Why L1 Action";
pub const WHY_L2: &str = "Why L2 Action";
pub const WHAT_CATEGORY: &str = "What Cat.";
pub const WHAT_SUBCATEGORY: &str = "What Subcat.";

/// Width used for columns missing from the lookup table
pub const DEFAULT_WIDTH: u16 = 10;

/// Columns shown when a task view first opens, in display order
pub const DEFAULT_COLUMNS: &[&str] = &[
    TASK_ID,
    PAPER_ID,
    USER_TASK,
    TASK_TYPE,
    "Rule",
    ARCHETYPE,
    WHY_L1,
    WHY_L2,
    WHAT_CATEGORY,
    WHAT_SUBCATEGORY,
];

/// Boolean-like encoding indicators, rendered as glyphs
pub const VISUAL_CHANNELS: &[&str] = &[
    "Colour",
    "Shape",
    "Position",
    "Size",
    "Orientation",
    "Texture",
    "Saturation/Luminance",
    "Fill (Coverage)",
    "Animation",
];

/// Free-text columns that get truncated in the grid and shown whole in the
/// row detail
pub const LONG_TEXT_COLUMNS: &[&str] = &[USER_TASK, "Direct Quote from Paper", "How User Carries Out Task"];

const LABELS: &[(&str, &str)] = &[
    (TASK_ID, "Task ID"),
    (PAPER_ID, "Paper ID"),
    ("Direct Quote from Paper", "Direct Quote"),
    ("Visualisation Tools/Technique", "Vis Tools/Technique"),
    (TASK_TYPE, "Task Type"),
    ("Geo_Modifier", "Geo Modifier"),
    ("WHY Details", "Why Details"),
    ("HOW Encode", "How Encode"),
    ("HOW Manipulate (Interactive)", "How Manipulate"),
    ("HOW Facet (Dashboards/Multiple Views)", "How Facet"),
    ("HOW Reduce (Large datasets)", "How Reduce"),
    (WHAT_CATEGORY, "What Category"),
    (WHAT_SUBCATEGORY, "What Subcategory"),
];

// Terminal cells, scaled down from the pixel widths of the web table
const WIDTHS: &[(&str, u16)] = &[
    (TASK_ID, 6),
    (PAPER_ID, 14),
    (USER_TASK, 30),
    ("Direct Quote from Paper", 40),
    ("How User Carries Out Task", 40),
    (TASK_TYPE, 10),
    ("Rule", 6),
    (ARCHETYPE, 10),
    (WHY_L1, 10),
    (WHY_L2, 10),
    ("Why L3 Action", 10),
    (WHAT_CATEGORY, 12),
    (WHAT_SUBCATEGORY, 12),
];

/// Human-readable header for a column; unknown columns keep their raw name
pub fn column_label(column: &str) -> &str {
    LABELS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, label)| *label)
        .unwrap_or(column)
}

pub fn column_width(column: &str) -> u16 {
    WIDTHS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, width)| *width)
        .unwrap_or(DEFAULT_WIDTH)
}

pub fn is_visual_channel(column: &str) -> bool {
    VISUAL_CHANNELS.contains(&column)
}

pub fn is_long_text(column: &str) -> bool {
    LONG_TEXT_COLUMNS.contains(&column)
}

/// Columns that are always on. The paper identifier only counts when the
/// dataset links tasks to papers.
pub fn is_locked(column: &str, paper_linked: bool) -> bool {
    column == TASK_ID || column == USER_TASK || (paper_linked && column == PAPER_ID)
}

/// Set of columns the user wants to see.
///
/// Only membership is stored. Display order always comes from the dataset
/// header, so a column toggled off and on lands back where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleColumns {
    members: BTreeSet<String>,
}

impl Default for VisibleColumns {
    fn default() -> Self {
        Self {
            members: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl VisibleColumns {
    pub fn contains(&self, column: &str) -> bool {
        self.members.contains(column)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Flip a column, returning whether it is now visible. Locked columns
    /// stay on.
    pub fn toggle(&mut self, column: &str, paper_linked: bool) -> bool {
        if is_locked(column, paper_linked) {
            self.members.insert(column.to_string());
            return true;
        }
        if self.members.remove(column) {
            false
        } else {
            self.members.insert(column.to_string());
            true
        }
    }

    /// Show every header column (the paper identifier only when linked)
    pub fn select_all(&mut self, headers: &[String], paper_linked: bool) {
        for column in headers {
            if column != PAPER_ID || paper_linked {
                self.members.insert(column.clone());
            }
        }
    }

    pub fn reset_to_default(&mut self) {
        *self = Self::default();
    }

    /// Visible columns in display order: header order first, then members
    /// the dataset lacks in default order, then anything else by name.
    /// The paper identifier is dropped for unlinked datasets.
    pub fn ordered(&self, headers: &[String], paper_linked: bool) -> Vec<String> {
        let mut ordered: Vec<String> = headers
            .iter()
            .filter(|h| self.members.contains(h.as_str()))
            .cloned()
            .collect();

        for column in DEFAULT_COLUMNS {
            if self.members.contains(*column) && !ordered.iter().any(|c| c == column) {
                ordered.push(column.to_string());
            }
        }
        for column in &self.members {
            if !ordered.contains(column) {
                ordered.push(column.clone());
            }
        }

        if !paper_linked {
            ordered.retain(|c| c != PAPER_ID);
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_labels_and_widths() {
        assert_eq!(column_label(TASK_TYPE), "Task Type");
        assert_eq!(column_label(WHAT_CATEGORY), "What Category");
        assert_eq!(column_label("Mystery"), "Mystery");
        assert_eq!(column_width(USER_TASK), 30);
        assert_eq!(column_width("Mystery"), DEFAULT_WIDTH);
    }

    #[test]
    fn test_toggle_keeps_header_position() {
        let header = headers(&[TASK_ID, PAPER_ID, USER_TASK, "Rule", ARCHETYPE, "Colour"]);
        let mut visible = VisibleColumns::default();
        let before = visible.ordered(&header, true);

        assert!(!visible.toggle("Rule", true));
        assert!(!visible.ordered(&header, true).contains(&"Rule".to_string()));
        assert!(visible.toggle("Rule", true));
        assert_eq!(visible.ordered(&header, true), before);
    }

    #[test]
    fn test_locked_columns_stay_on() {
        let mut visible = VisibleColumns::default();
        assert!(visible.toggle(TASK_ID, true));
        assert!(visible.toggle(PAPER_ID, true));
        assert!(visible.contains(PAPER_ID));
        assert!(!visible.toggle(PAPER_ID, false));
    }

    #[test]
    fn test_unlinked_dataset_hides_paper_column() {
        let header = headers(&[TASK_ID, PAPER_ID, USER_TASK, "Colour"]);
        let mut visible = VisibleColumns::default();
        visible.select_all(&header, false);
        let ordered = visible.ordered(&header, false);
        assert!(!ordered.contains(&PAPER_ID.to_string()));
        assert_eq!(ordered[0], TASK_ID);
        assert!(ordered.contains(&"Colour".to_string()));

        visible.reset_to_default();
        assert_eq!(visible, VisibleColumns::default());
    }

    #[test]
    fn test_empty_header_falls_back_to_default_order() {
        let visible = VisibleColumns::default();
        let ordered = visible.ordered(&[], true);
        assert_eq!(ordered.len(), DEFAULT_COLUMNS.len());
        assert_eq!(ordered[2], USER_TASK);
    }
}
