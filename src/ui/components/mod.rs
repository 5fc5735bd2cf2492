pub mod canvas_view;
pub mod feedback_panel;
pub mod info_page;
pub mod menu;
