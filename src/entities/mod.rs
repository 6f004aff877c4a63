//! Typed records for the remote inventory collections

pub mod category;
pub mod project;
pub mod unit;
pub mod wing;

pub use category::{Category, SubCategory};
pub use project::Project;
pub use unit::{Unit, UnitStatus, UnitType};
pub use wing::Wing;
