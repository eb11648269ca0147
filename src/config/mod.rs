//! Configuration module
//!
//! Settings are read from a TOML file; every section falls back to its
//! defaults when absent.

pub mod config;
