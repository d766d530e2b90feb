pub mod config;
pub mod errors;
pub mod ui;
pub mod workflow;
