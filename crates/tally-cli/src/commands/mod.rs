pub mod add;
pub mod bump;
pub mod common;
pub mod completions;
pub mod config;
pub mod dark_mode;
pub mod export;
pub mod list;
pub mod log;
pub mod profile;
pub mod ranking;
pub mod remove;
pub mod reset;
pub mod stats;
pub mod status;
