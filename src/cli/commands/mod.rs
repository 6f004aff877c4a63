//! CLI command implementations

pub mod utils;

pub mod cache;
pub mod category;
pub mod completions;
pub mod config;
pub mod login;
pub mod project;
pub mod status;
pub mod unit;
pub mod wing;
