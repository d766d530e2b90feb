pub mod board_view;
pub mod icons;

pub use board_view::{render_board, render_notification, render_task_detail, spinner};
