//! Catalog Filter Controller
//!
//! One card per paper, narrowed by taxonomy checkboxes (any-of within a
//! group, all groups combined) and data/publication-type tags (all checked
//! tags must read "yes").

pub mod controller;
pub mod taxonomy;

pub use controller::{CardLayout, CatalogController, PaperCard};
pub use taxonomy::{CatalogFilters, FilterCheckbox, FilterSection};
