pub mod search_input;
pub mod tab_bar_widget;
