//! Utility functions and helpers
//!
//! Paths, logging, input debouncing and label formatting shared by the
//! controllers and the UI.

pub mod app_paths;
pub mod debouncer;
pub mod labels;
pub mod logging;
