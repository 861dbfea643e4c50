pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod render;
pub mod state;
pub mod ui;
