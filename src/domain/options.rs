//! Session options, immutable for the lifetime of a compilation session.

use crate::domain::tokens::Tokens;

/// Verbosity above which directive trace comments are written into the output.
pub const TRACE_VERBOSITY: u8 = 3;

/// Default extension tried when an include target cannot be read as given.
pub const DEFAULT_EXTENSION: &str = "dorothy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Omit indentation and comments from the output
    pub strip: bool,
    /// Deepest allowed tree level, checked while parsing and while rendering.
    ///
    /// Rendering recurses once per level. The default of 1000 fits the 8 MiB
    /// main thread; callers on smaller stacks (2 MiB spawned threads) should
    /// lower it or render on a thread with a larger stack.
    pub max_depth: usize,
    pub verbosity: u8,
    /// Tag name used when a tag line omits it
    pub default_tag: String,
    /// Bindings visible at the top level of every input
    pub tokens: Tokens,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strip: false,
            max_depth: 1000,
            verbosity: 0,
            default_tag: "div".to_string(),
            tokens: Tokens::new(),
        }
    }
}

impl Options {
    pub fn depth_allowed(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }

    pub fn trace_output(&self) -> bool {
        !self.strip && self.verbosity > TRACE_VERBOSITY
    }
}
