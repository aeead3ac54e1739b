pub mod app;
pub mod menu;
pub mod pipeline;
