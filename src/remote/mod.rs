//! Remote data gateway - HTTP access to the inventory API

pub mod envelope;
pub mod error;
pub mod gateway;

pub use error::ApiError;
pub use gateway::{Credential, Gateway, HttpGateway};
