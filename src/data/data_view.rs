use std::sync::Arc;

use crate::data::datatable::DataTable;

/// A view over a DataTable holding the rows that passed the active filters,
/// without modifying the underlying data
#[derive(Debug, Clone)]
pub struct DataView {
    /// The underlying immutable data source
    source: Arc<DataTable>,

    /// Row indices that are visible (after filtering), in source order
    visible_rows: Vec<usize>,
}

impl DataView {
    /// Create a new view showing all data from the table
    pub fn new(source: Arc<DataTable>) -> Self {
        let row_count = source.row_count();
        Self {
            source,
            visible_rows: (0..row_count).collect(),
        }
    }

    /// Filter rows based on a predicate. Starts again from the full table;
    /// earlier filtering is discarded.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&DataTable, usize) -> bool,
    {
        self.visible_rows = (0..self.source.row_count())
            .filter(|&row_idx| predicate(&self.source, row_idx))
            .collect();
        self
    }

    /// Show every row of the table again
    pub fn clear_filter(&mut self) {
        self.visible_rows = (0..self.source.row_count()).collect();
    }

    pub fn source(&self) -> &DataTable {
        &self.source
    }

    pub fn source_arc(&self) -> Arc<DataTable> {
        Arc::clone(&self.source)
    }

    /// Get the number of visible rows
    pub fn row_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn total_count(&self) -> usize {
        self.source.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_rows.is_empty()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.visible_rows.len() == self.source.row_count()
    }

    /// Source indices of the visible rows
    pub fn visible_rows(&self) -> &[usize] {
        &self.visible_rows
    }

    /// Map a view row to its source row index
    pub fn source_row(&self, view_row: usize) -> Option<usize> {
        self.visible_rows.get(view_row).copied()
    }
}
