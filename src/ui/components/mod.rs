pub mod highlight;
pub mod history_list;
pub mod reference_panel;
