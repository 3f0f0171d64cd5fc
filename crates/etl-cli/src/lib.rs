//! CLI library components for `semietl`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
pub mod summary;
