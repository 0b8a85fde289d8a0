//! dorothy: a compiler for an indentation-structured markup language
//! that renders to HTML.
//!
//! Layers, innermost first: [`domain`] (nodes, registries, parsing rules),
//! [`application`] (tree builder, renderer, dependency reports, [`Session`]),
//! [`infrastructure`] (filesystem boundary), [`cli`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, Session};
pub use domain::{DomainError, Options};
