//! Application layer: services and use cases
//!
//! This layer turns intents into management API calls and depends on I/O boundary traits.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
