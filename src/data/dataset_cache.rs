use crate::config::config::DataConfig;
use crate::data::csv_loader::CsvLoader;
use crate::data::data_source::DataSource;
use crate::data::datatable::DataTable;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// The three independent datasets of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    Catalog,
    LiteratureTasks,
    FieldTasks,
}

impl DatasetKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            DatasetKind::Catalog => "catalog",
            DatasetKind::LiteratureTasks => "literature_tasks",
            DatasetKind::FieldTasks => "field_tasks",
        }
    }

    pub fn file_name<'a>(&self, files: &'a DataConfig) -> &'a str {
        match self {
            DatasetKind::Catalog => &files.catalog_file,
            DatasetKind::LiteratureTasks => &files.literature_file,
            DatasetKind::FieldTasks => &files.field_file,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Result of asking the cache for a dataset. `error` is set when the fetch
/// or parse failed; the table is then empty.
pub struct LoadOutcome {
    pub table: Arc<DataTable>,
    pub error: Option<anyhow::Error>,
}

/// Session-lifetime store of loaded datasets.
///
/// A dataset is fetched only when it is first asked for and never again once
/// it loaded. Failed loads are not stored, so the next explicit request
/// fetches again.
pub struct DatasetCache {
    source: Box<dyn DataSource>,
    files: DataConfig,
    loaded: HashMap<DatasetKind, Arc<DataTable>>,
    fetches: HashMap<DatasetKind, usize>,
}

impl DatasetCache {
    pub fn new(source: Box<dyn DataSource>, files: DataConfig) -> Self {
        Self {
            source,
            files,
            loaded: HashMap::new(),
            fetches: HashMap::new(),
        }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub fn file_name(&self, kind: DatasetKind) -> &str {
        kind.file_name(&self.files)
    }

    pub fn is_loaded(&self, kind: DatasetKind) -> bool {
        self.loaded.contains_key(&kind)
    }

    /// Number of fetches issued for a dataset this session
    pub fn fetch_count(&self, kind: DatasetKind) -> usize {
        self.fetches.get(&kind).copied().unwrap_or(0)
    }

    /// The cached table, or `None` when it has not loaded yet
    pub fn get(&self, kind: DatasetKind) -> Option<Arc<DataTable>> {
        self.loaded.get(&kind).cloned()
    }

    pub fn get_or_load(&mut self, kind: DatasetKind) -> LoadOutcome {
        if let Some(table) = self.loaded.get(&kind) {
            return LoadOutcome {
                table: Arc::clone(table),
                error: None,
            };
        }

        match self.fetch(kind) {
            Ok(table) => {
                let table = Arc::new(table);
                self.loaded.insert(kind, Arc::clone(&table));
                LoadOutcome { table, error: None }
            }
            Err(e) => {
                error!(target: "dataset_cache", "Error loading {}: {:#}", kind, e);
                LoadOutcome {
                    table: Arc::new(DataTable::new(kind.table_name())),
                    error: Some(e),
                }
            }
        }
    }

    fn fetch(&mut self, kind: DatasetKind) -> Result<DataTable> {
        let file = kind.file_name(&self.files).to_string();
        *self.fetches.entry(kind).or_insert(0) += 1;
        info!(
            target: "dataset_cache",
            "Fetching {} from {} ({})",
            kind,
            self.source.describe(),
            file
        );
        let text = self.source.fetch_text(&file)?;
        CsvLoader::parse_str(&text, kind.table_name())
    }
}
