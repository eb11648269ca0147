//! Data layer for the catalog and task datasets
//!
//! Rows are loaded from CSV text into an immutable `DataTable` and shared
//! through `Arc`. Filtering never touches the table; it produces a
//! `DataView` holding the indices of the rows that survive.

pub mod csv_loader;
pub mod data_source;
pub mod data_view;
pub mod dataset_cache;
pub mod datatable;
