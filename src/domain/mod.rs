//! Domain layer: template nodes and compiler rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod names;
pub mod node;
pub mod options;
pub mod registry;
pub mod tag;
pub mod tokens;

pub use arena::{FileId, NodeArena, NodeId, SourcePos, TreeNode};
pub use error::{DomainError, DomainResult, ErrorCategory};
pub use names::{is_valid_name, Namespace};
pub use node::{
    classify, CloneNode, CloneTarget, DefineNode, FileNode, IncludeNode, NamespaceNode, NodeKind,
};
pub use options::Options;
pub use registry::{FileEntry, FileRegistry, NameEntry, NameRegistry, STDIN_PATH};
pub use tag::TagNode;
pub use tokens::{bind, encode_html, format_tokens, replace_tokens, split_arguments, Tokens};
