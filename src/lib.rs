pub mod app_state;
pub mod catalog;
pub mod config;
pub mod data;
pub mod notice;
pub mod sidebar;
pub mod table_display;
pub mod tasks;
pub mod ui;
pub mod utils;
pub mod widgets;
