pub mod app;
pub mod commands;
pub mod config;
pub mod effects;
#[cfg(test)]
mod fake;
pub mod logging;
pub mod render;
