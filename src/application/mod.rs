//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod reader;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, Location};
pub use error_ext::{IoResultExt, LocateExt};
pub use reader::{LineCursor, LogicalLine};
pub use services::Session;
