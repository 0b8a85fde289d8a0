//! Identifier validation and namespace qualification.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// A leading `-` on a name or namespace segment means "start from the root scope".
pub const ROOT_MARKER: char = '-';

/// Separator used when joining namespace segments into a qualified name.
pub const SEPARATOR: char = '-';

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    let item = r"[A-Za-z0-9_$]+";
    Regex::new(&format!(r"^(?:(?:{item})?(?:-{item})+|{item})$")).expect("valid name regex")
});

/// Check a define/clone/namespace identifier: hyphen-joined runs of
/// alphanumerics, `_` and `$`, optionally starting with the root marker.
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

/// Ordered scope segments threaded top-down through rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    segments: Vec<String>,
}

impl Namespace {
    pub fn root() -> Self {
        Self::default()
    }

    /// Scope in effect below a `% namespace` node.
    pub fn nested(&self, reset: bool, segments: &[String]) -> Self {
        let mut next = if reset { Self::root() } else { self.clone() };
        next.segments.extend(segments.iter().cloned());
        next
    }

    /// Qualify `name` with this scope; a root-marked name ignores the scope.
    pub fn qualify(&self, name: &str) -> String {
        if let Some(rest) = name.strip_prefix(ROOT_MARKER) {
            return rest.to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(segment);
            out.push(SEPARATOR);
        }
        out.push_str(name);
        out
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.segments.join(", "))
    }
}
