//! Core module - configuration, session, cache, and domain services

pub mod cache;
pub mod config;
pub mod menu;
pub mod sample;
pub mod session;
pub mod store;

pub use cache::{QueryCache, QueryKey};
pub use config::{Config, StatePaths};
pub use session::{Role, Session, SessionStore, UserIdentity};
pub use store::InventoryStore;
