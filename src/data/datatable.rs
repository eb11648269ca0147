use std::collections::BTreeSet;
use std::fmt;

/// A named column of a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataColumn {
    pub name: String,
}

impl DataColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A row of data in the table. Every value is kept as the raw string from
/// the source file; the datasets have no typed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow {
    pub values: Vec<String>,
}

impl DataRow {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered, immutable collection of rows loaded from one source.
/// The column set is whatever the header row declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub rows: Vec<DataRow>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn add_column(&mut self, column: DataColumn) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn add_row(&mut self, row: DataRow) -> Result<(), String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "Row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column_index(name).is_some()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column names as a vector
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get a value at specific row and column
    pub fn get_value(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)
    }

    /// Value of a named column. A column the dataset never declared reads
    /// as empty for every row.
    pub fn get_value_by_name(&self, row: usize, col_name: &str) -> &str {
        self.get_column_index(col_name)
            .and_then(|col| self.get_value(row, col))
            .unwrap_or("")
    }

    /// All values of the row joined by a single space, in column order
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| r.values.join(" "))
            .unwrap_or_default()
    }

    /// Distinct non-empty values of a column, sorted
    pub fn unique_values(&self, col_name: &str) -> Vec<String> {
        let Some(col) = self.get_column_index(col_name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|r| r.get(col))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataTable '{}' ({} rows, {} columns)",
            self.name,
            self.row_count(),
            self.column_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        let mut table = DataTable::new("sample");
        table.add_column(DataColumn::new("task_ID"));
        table.add_column(DataColumn::new("Archetype"));
        table
            .add_row(DataRow::new(vec!["1".into(), "B".into()]))
            .unwrap();
        table
            .add_row(DataRow::new(vec!["2".into(), "".into()]))
            .unwrap();
        table
            .add_row(DataRow::new(vec!["3".into(), "A".into()]))
            .unwrap();
        table
            .add_row(DataRow::new(vec!["4".into(), "B".into()]))
            .unwrap();
        table
    }

    #[test]
    fn test_add_row_rejects_wrong_width() {
        let mut table = sample();
        let err = table.add_row(DataRow::new(vec!["5".into()])).unwrap_err();
        assert!(err.contains("1 values"));
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_missing_column_reads_empty() {
        let table = sample();
        assert_eq!(table.get_value_by_name(0, "Archetype"), "B");
        assert_eq!(table.get_value_by_name(0, "paper_ID"), "");
        assert_eq!(table.get_value_by_name(99, "Archetype"), "");
    }

    #[test]
    fn test_unique_values_sorted_without_blanks() {
        let table = sample();
        assert_eq!(table.unique_values("Archetype"), vec!["A", "B"]);
        assert!(table.unique_values("nope").is_empty());
    }

    #[test]
    fn test_row_text_joins_with_space() {
        let table = sample();
        assert_eq!(table.row_text(2), "3 A");
    }
}
