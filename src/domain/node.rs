//! Node variants and the line classifier.
//!
//! One logical line becomes exactly one [`NodeKind`]. Adding a directive means
//! adding a variant here and a match arm in [`classify`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::arena::FileId;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::names::{is_valid_name, ROOT_MARKER, SEPARATOR};
use crate::domain::tag::TagNode;
use crate::domain::tokens::{bind, is_blank, split_arguments, Tokens};

pub const DIRECTIVE_MARKER: char = '%';
pub const TEXT_MARKER: &str = "-";
pub const HTML_MARKER: &str = "=";
pub const COMMENT_MARKER: &str = "/";
pub const MOCK_MARKER: &str = "//";

static DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^%[ \t]*([A-Za-z]+)(?:[ \t]+(.*))?$").expect("valid directive regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of one source file
    File(FileNode),
    Include(IncludeNode),
    Namespace(NamespaceNode),
    Define(DefineNode),
    Clone(CloneNode),
    /// Escaped literal text
    Text(String),
    /// Verbatim markup
    Html(String),
    Comment(String),
    /// Author annotation, never rendered
    Mock,
    Tag(TagNode),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::File(_) => "file",
            NodeKind::Include(_) => "include",
            NodeKind::Namespace(_) => "namespace",
            NodeKind::Define(_) => "define",
            NodeKind::Clone(_) => "clone",
            NodeKind::Text(_) => "text",
            NodeKind::Html(_) => "html",
            NodeKind::Comment(_) => "comment",
            NodeKind::Mock => "mock",
            NodeKind::Tag(_) => "tag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileNode {
    pub file: FileId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeNode {
    /// Path as written, resolved against the including file's directory
    pub path: String,
    pub tokens: Tokens,
    /// Set by the builder once the target is registered
    pub file: Option<FileId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceNode {
    /// A root-marked token discards the inherited scope
    pub reset: bool,
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineNode {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneTarget {
    /// 0 selects every sibling, N the N-th one
    Sibling(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneNode {
    pub target: CloneTarget,
    pub tokens: Tokens,
}

/// Classify one logical line with its indentation already removed.
pub fn classify(line: &str, default_tag: &str) -> DomainResult<NodeKind> {
    if line.starts_with(DIRECTIVE_MARKER) {
        return parse_directive(line);
    }
    if let Some(text) = marked_text(line, TEXT_MARKER) {
        return Ok(NodeKind::Text(text.to_string()));
    }
    if let Some(text) = marked_text(line, HTML_MARKER) {
        return Ok(NodeKind::Html(text.to_string()));
    }
    if let Some(text) = marked_text(line, COMMENT_MARKER) {
        return Ok(NodeKind::Comment(text.to_string()));
    }
    if marked_text(line, MOCK_MARKER).is_some() {
        return Ok(NodeKind::Mock);
    }
    Ok(NodeKind::Tag(TagNode::parse(line, default_tag)?))
}

/// Remainder of `line` after `marker` and at least one blank.
fn marked_text<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if rest.starts_with(is_blank) {
        Some(rest.trim_start_matches(is_blank))
    } else {
        None
    }
}

fn parse_directive(line: &str) -> DomainResult<NodeKind> {
    let caps = DIRECTIVE_REGEX
        .captures(line)
        .ok_or_else(|| DomainError::UnknownDirective(line.to_string()))?;
    let keyword = caps.get(1).map_or("", |m| m.as_str());
    let args = split_arguments(caps.get(2).map_or("", |m| m.as_str()))?;

    match keyword {
        "include" => IncludeNode::parse(args).map(NodeKind::Include),
        "namespace" => NamespaceNode::parse(args).map(NodeKind::Namespace),
        "clone" => CloneNode::parse(args).map(NodeKind::Clone),
        "define" => DefineNode::parse(args).map(NodeKind::Define),
        other => Err(DomainError::UnknownDirective(other.to_string())),
    }
}

fn check_name(directive: &'static str, name: &str) -> DomainResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(DomainError::InvalidName {
            directive,
            name: name.to_string(),
        })
    }
}

impl IncludeNode {
    fn parse(args: Vec<String>) -> DomainResult<Self> {
        let (path, rest) = args
            .split_first()
            .filter(|(path, _)| !path.is_empty())
            .ok_or(DomainError::MissingArgument {
                directive: "include",
            })?;
        Ok(Self {
            path: path.clone(),
            tokens: bind(rest),
            file: None,
        })
    }
}

impl NamespaceNode {
    fn parse(args: Vec<String>) -> DomainResult<Self> {
        if args.is_empty() {
            return Err(DomainError::MissingArgument {
                directive: "namespace",
            });
        }
        let mut node = Self {
            reset: false,
            segments: Vec::new(),
        };
        for arg in &args {
            check_name("namespace", arg)?;
            let scoped = match arg.strip_prefix(ROOT_MARKER) {
                Some(rest) => {
                    node.reset = true;
                    node.segments.clear();
                    rest
                }
                None => arg.as_str(),
            };
            node.segments
                .extend(scoped.split(SEPARATOR).map(str::to_string));
        }
        Ok(node)
    }
}

impl DefineNode {
    fn parse(args: Vec<String>) -> DomainResult<Self> {
        if args.is_empty() {
            return Err(DomainError::MissingArgument { directive: "define" });
        }
        for name in &args {
            check_name("define", name)?;
        }
        Ok(Self { names: args })
    }
}

impl CloneNode {
    fn parse(args: Vec<String>) -> DomainResult<Self> {
        let (target, rest) = args
            .split_first()
            .filter(|(target, _)| !target.is_empty())
            .ok_or(DomainError::MissingArgument { directive: "clone" })?;

        let target = if target.chars().all(|c| c.is_ascii_digit()) {
            let index = target.parse().map_err(|_| DomainError::InvalidName {
                directive: "clone",
                name: target.clone(),
            })?;
            CloneTarget::Sibling(index)
        } else {
            check_name("clone", target)?;
            CloneTarget::Name(target.clone())
        };
        Ok(Self {
            target,
            tokens: bind(rest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(line: &str) -> NodeKind {
        classify(line, "div").unwrap()
    }

    #[test]
    fn test_classify_markers() {
        assert_eq!(kind("- a <b>"), NodeKind::Text("a <b>".into()));
        assert_eq!(kind("=  <hr>"), NodeKind::Html("<hr>".into()));
        assert_eq!(kind("/ note"), NodeKind::Comment("note".into()));
        assert_eq!(kind("// hidden"), NodeKind::Mock);
        assert!(matches!(kind("-x"), NodeKind::Tag(ref t) if t.name == "-x"));
    }

    #[test]
    fn test_classify_include_binds_from_zero() {
        let NodeKind::Include(node) = kind(r#"% include "parts/head" Title 'b c'"#) else {
            panic!("expected include");
        };
        assert_eq!(node.path, "parts/head");
        assert_eq!(node.tokens.get(&0).map(String::as_str), Some("Title"));
        assert_eq!(node.tokens.get(&1).map(String::as_str), Some("b c"));
        assert_eq!(node.file, None);
    }

    #[test]
    fn test_classify_namespace_reset_and_split() {
        let NodeKind::Namespace(node) = kind("%namespace a-b -c d") else {
            panic!("expected namespace");
        };
        assert!(node.reset);
        assert_eq!(node.segments, vec!["c", "d"]);
    }

    #[test]
    fn test_classify_clone_targets() {
        let NodeKind::Clone(node) = kind("% clone 2 x") else {
            panic!("expected clone");
        };
        assert_eq!(node.target, CloneTarget::Sibling(2));
        assert_eq!(node.tokens.get(&0).map(String::as_str), Some("x"));

        let NodeKind::Clone(node) = kind("% clone -card") else {
            panic!("expected clone");
        };
        assert_eq!(node.target, CloneTarget::Name("-card".into()));
    }

    #[test]
    fn test_classify_directive_errors() {
        assert_eq!(
            classify("% include", "div").unwrap_err(),
            DomainError::MissingArgument {
                directive: "include"
            }
        );
        assert_eq!(
            classify("% define foo.bar", "div").unwrap_err(),
            DomainError::InvalidName {
                directive: "define",
                name: "foo.bar".into()
            }
        );
        assert_eq!(
            classify("% frobnicate x", "div").unwrap_err(),
            DomainError::UnknownDirective("frobnicate".into())
        );
        assert!(matches!(
            classify("% clone 'x", "div").unwrap_err(),
            DomainError::UnterminatedQuote { .. }
        ));
    }
}
