//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod builder;
mod dependencies;
mod render;
mod session;

pub use builder::TreeBuilder;
pub use dependencies::DependencyWalker;
pub use render::HtmlRenderer;
pub use session::Session;
