use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the dataset files come from. Every dataset is fetched by its
/// relative file name, as the page fetched `energynetworks.csv` and friends.
pub trait DataSource: Send + Sync {
    /// Fetch the full UTF-8 text of a dataset file
    fn fetch_text(&self, name: &str) -> Result<String>;

    /// Human readable description for logs and the status bar
    fn describe(&self) -> String;
}

/// Reads dataset files from a local directory
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for FileSource {
    fn fetch_text(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        debug!(target: "data_source", "Reading {}", path.display());
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches dataset files with a relative GET against a base URL
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }
}

impl DataSource for HttpSource {
    fn fetch_text(&self, name: &str) -> Result<String> {
        let url = self.url_for(name);
        info!(target: "data_source", "GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP error! status: {}", status.as_u16());
        }

        response
            .text()
            .with_context(|| format!("Failed to read body of {}", url))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Pick a source for a location: `http://` and `https://` are fetched over
/// the network, anything else is a directory
pub fn open_source(location: &str) -> Box<dyn DataSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_source_by_scheme() {
        assert_eq!(open_source("https://example.org/vis/").describe(), "https://example.org/vis");
        assert_eq!(open_source("data").describe(), "data");
    }

    #[test]
    fn test_url_join() {
        let source = HttpSource::new("http://localhost:8000/");
        assert_eq!(
            source.url_for("literature_tasks.csv"),
            "http://localhost:8000/literature_tasks.csv"
        );
    }

    #[test]
    fn test_file_source_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path());
        let err = source.fetch_text("field_tasks.csv").unwrap_err();
        assert!(err.to_string().contains("field_tasks.csv"));
    }
}
