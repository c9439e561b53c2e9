//! Shared utilities

pub mod config;
pub mod process;
pub mod search;

pub use config::ToolkitConfig;
pub use process::ProcessBuilder;
