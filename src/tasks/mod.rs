//! Task Table Viewer
//!
//! Tabbed switching between the paper catalog and the literature and field
//! task datasets. Each task tab keeps its own column choices; filters reset
//! whenever the tab is entered.

pub mod cell_renderer;
pub mod columns;
pub mod filter;
pub mod viewer;

pub use cell_renderer::{CellAlign, CellRenderer, RenderedCell};
pub use columns::VisibleColumns;
pub use filter::{Facet, FacetOption, TaskFilterState};
pub use viewer::{RegionVisibility, TableBody, TableModel, TaskTableViewer, TaskView, ViewMode};
