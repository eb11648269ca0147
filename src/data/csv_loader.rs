/// CSV text to DataTable loader
use crate::data::datatable::{DataColumn, DataRow, DataTable};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub struct CsvLoader;

impl CsvLoader {
    /// Parse CSV text with a header row into a DataTable.
    ///
    /// Records shorter than the header are padded with empty values and
    /// longer ones are truncated, so every row carries exactly one value per
    /// declared column.
    pub fn parse_str(text: &str, table_name: &str) -> Result<DataTable> {
        let text = text.trim_start_matches('\u{feff}');
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read CSV header for {}", table_name))?
            .clone();

        let mut table = DataTable::new(table_name);
        for header in headers.iter() {
            table.add_column(DataColumn::new(header.trim()));
        }

        let width = table.column_count();
        for (line, result) in reader.records().enumerate() {
            let record =
                result.with_context(|| format!("Malformed CSV record {} in {}", line + 1, table_name))?;
            let mut values: Vec<String> = record.iter().take(width).map(str::to_string).collect();
            if values.len() < width {
                debug!(
                    target: "csv_loader",
                    "Record {} in {} has {} of {} fields, padding",
                    line + 1,
                    table_name,
                    values.len(),
                    width
                );
                values.resize(width, String::new());
            }
            table
                .add_row(DataRow::new(values))
                .map_err(|e| anyhow::anyhow!(e))?;
        }

        info!(
            target: "csv_loader",
            "Parsed {}: {} rows, {} columns",
            table_name,
            table.row_count(),
            table.column_count()
        );

        Ok(table)
    }

    /// Load a CSV file from disk
    pub fn load_file<P: AsRef<Path>>(path: P, table_name: &str) -> Result<DataTable> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_str(&text, table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_rows() {
        let text = "task_ID,paper_ID,Archetype\n1,P1,A\n2,P2,B\n";
        let table = CsvLoader::parse_str(text, "tasks").unwrap();
        assert_eq!(table.column_names(), vec!["task_ID", "paper_ID", "Archetype"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get_value_by_name(1, "paper_ID"), "P2");
    }

    #[test]
    fn test_short_records_are_padded() {
        let text = "a,b,c\n1,2\n4,5,6,7\n";
        let table = CsvLoader::parse_str(text, "ragged").unwrap();
        assert_eq!(table.get_value_by_name(0, "c"), "");
        assert_eq!(table.rows[1].values, vec!["4", "5", "6"]);
    }

    #[test]
    fn test_quoted_fields_and_bom() {
        let text = "\u{feff}task_ID,User Task\n1,\"Compare flows, per line\"\n";
        let table = CsvLoader::parse_str(text, "quoted").unwrap();
        assert_eq!(table.column_names()[0], "task_ID");
        assert_eq!(table.get_value_by_name(0, "User Task"), "Compare flows, per line");
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = CsvLoader::parse_str("task_ID,User Task\n", "empty").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field_tasks.csv");
        fs::write(&path, "task_ID,User Task\nF1,Check outage reports\n").unwrap();

        let table = CsvLoader::load_file(&path, "field_tasks").unwrap();
        assert_eq!(table.name, "field_tasks");
        assert_eq!(table.get_value_by_name(0, "task_ID"), "F1");

        let err = CsvLoader::load_file(dir.path().join("missing.csv"), "x").unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
    }
}
