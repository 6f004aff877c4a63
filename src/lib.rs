//! VIT: Vantage Inventory Toolkit
//!
//! A terminal admin console for a real-estate inventory API: projects,
//! wings/towers, units, categories, sessions, and a cache-backed data layer.

pub mod cli;
pub mod core;
pub mod entities;
pub mod remote;
