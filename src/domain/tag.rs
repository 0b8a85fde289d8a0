//! Tag lines: `tag.class#id(attr=val,...)~ inline text`
//!
//! A small state machine walks the line once. Quotes and backslash escapes
//! are honoured in every part of the element line except the inline text,
//! which is taken verbatim.

use std::collections::BTreeMap;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::names::Namespace;
use crate::domain::tokens::{encode_html, is_blank, replace_tokens, unescape, Tokens};

/// Marker that suppresses the self-closing short form.
pub const FORCE_EXPAND: char = '~';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub name: String,
    pub classes: Vec<String>,
    pub id: Option<String>,
    /// Attributes in output order (sorted by name)
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub force_expand: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Name,
    Class,
    Id,
    AttrName,
    AttrValue,
    Space,
    Text,
}

impl TagNode {
    pub fn parse(line: &str, default_tag: &str) -> DomainResult<Self> {
        let mut scanner = Scanner::new();
        for c in line.chars() {
            scanner.feed(c);
        }
        let mut node = scanner.finish()?;
        if node.name.is_empty() {
            node.name = default_tag.to_string();
        }
        Ok(node)
    }

    /// Nothing to put between an open and a close tag.
    pub fn is_short(&self, has_children: bool) -> bool {
        self.text.is_empty() && !has_children && !self.force_expand
    }

    /// Attribute string including the leading space of each entry.
    ///
    /// Class names and the id are qualified with `namespace`; `.class` names
    /// are appended to a `class` attribute given in the attribute list.
    pub fn render_attributes(&self, namespace: &Namespace, tokens: &Tokens) -> String {
        let mut attrs = self.attributes.clone();
        for class in self.classes.iter().filter(|c| !c.is_empty()) {
            let value = attrs.entry("class".to_string()).or_default();
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(&namespace.qualify(class));
        }
        if let Some(id) = self.id.as_ref().filter(|id| !id.is_empty()) {
            attrs.insert("id".to_string(), namespace.qualify(id));
        }

        let mut out = String::new();
        for (name, value) in &attrs {
            out.push(' ');
            out.push_str(&encode_html(&replace_tokens(name, tokens)));
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&encode_html(&replace_tokens(value, tokens)));
                out.push('"');
            }
        }
        out
    }
}

struct Scanner {
    node: TagNode,
    stage: Stage,
    token: String,
    started: bool,
    attr_name: Option<String>,
    quote: Option<char>,
    escaped: bool,
    prev: Option<char>,
}

impl Scanner {
    fn new() -> Self {
        Self {
            node: TagNode {
                name: String::new(),
                classes: Vec::new(),
                id: None,
                attributes: BTreeMap::new(),
                text: String::new(),
                force_expand: false,
            },
            stage: Stage::Start,
            token: String::new(),
            started: false,
            attr_name: None,
            quote: None,
            escaped: false,
            prev: None,
        }
    }

    fn feed(&mut self, c: char) {
        match self.stage {
            Stage::Start => {
                if !is_blank(c) {
                    self.stage = Stage::Name;
                    self.scan(c);
                }
            }
            Stage::Text => self.node.text.push(c),
            Stage::Space => {
                let after_blank = self.prev.is_some_and(is_blank);
                if c == FORCE_EXPAND && !after_blank && !self.node.force_expand {
                    self.node.force_expand = true;
                } else if !is_blank(c) {
                    self.stage = Stage::Text;
                    self.node.text.push(c);
                }
            }
            _ => self.scan(c),
        }
        self.prev = Some(c);
    }

    fn scan(&mut self, c: char) {
        if self.escaped {
            self.token.push(unescape(c));
            self.escaped = false;
            return;
        }
        if c == '\\' {
            self.escaped = true;
            self.started = true;
            return;
        }
        if let Some(q) = self.quote {
            if c == q {
                self.quote = None;
            } else {
                self.token.push(c);
            }
            return;
        }
        if c == '"' || c == '\'' {
            self.quote = Some(c);
            self.started = true;
            return;
        }
        match self.next_stage(c) {
            Some(next) => {
                self.flush();
                self.stage = next;
            }
            None => {
                self.token.push(c);
                self.started = true;
            }
        }
    }

    /// Stage entered when `c` is a control character in the current stage.
    fn next_stage(&mut self, c: char) -> Option<Stage> {
        let in_attributes = matches!(self.stage, Stage::AttrName | Stage::AttrValue);
        if is_blank(c) {
            return Some(if in_attributes { self.stage } else { Stage::Space });
        }
        if c == FORCE_EXPAND && !in_attributes {
            self.node.force_expand = true;
            return Some(Stage::Space);
        }
        match (self.stage, c) {
            (Stage::Name | Stage::Class, '.') => Some(Stage::Class),
            (Stage::Name | Stage::Class, '#') => Some(Stage::Id),
            (Stage::Name | Stage::Class | Stage::Id, '(') => Some(Stage::AttrName),
            (Stage::AttrName, '=') => Some(Stage::AttrValue),
            (Stage::AttrName | Stage::AttrValue, ',') => Some(Stage::AttrName),
            (Stage::AttrName | Stage::AttrValue, ')') => Some(Stage::Space),
            _ => None,
        }
    }

    fn flush(&mut self) {
        if !self.started {
            return;
        }
        let token = std::mem::take(&mut self.token);
        self.started = false;
        match self.stage {
            Stage::Name => {
                self.node.name = token;
                self.attr_name = None;
            }
            Stage::Class => {
                self.node.classes.push(token);
                self.attr_name = None;
            }
            Stage::Id => {
                self.node.id = Some(token);
                self.attr_name = None;
            }
            Stage::AttrName => {
                if !token.is_empty() {
                    self.node.attributes.insert(token.clone(), String::new());
                }
                self.attr_name = Some(token);
            }
            Stage::AttrValue => {
                if let Some(name) = self.attr_name.as_ref().filter(|n| !n.is_empty()) {
                    self.node.attributes.insert(name.clone(), token);
                }
            }
            Stage::Start | Stage::Space | Stage::Text => {}
        }
    }

    fn finish(mut self) -> DomainResult<TagNode> {
        if let Some(quote) = self.quote {
            return Err(DomainError::UnterminatedQuote { quote });
        }
        if matches!(self.stage, Stage::AttrName | Stage::AttrValue) {
            self.flush();
            return Err(DomainError::UnterminatedAttributes {
                tag: self.node.name,
            });
        }
        self.flush();
        Ok(self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> TagNode {
        TagNode::parse(line, "div").unwrap()
    }

    #[test]
    fn test_parse_full_element_line() {
        let tag = parse(r#"a.btn.primary#go(href="/x?a=1&b=2",target=_blank) Click me"#);
        assert_eq!(tag.name, "a");
        assert_eq!(tag.classes, vec!["btn", "primary"]);
        assert_eq!(tag.id.as_deref(), Some("go"));
        assert_eq!(tag.attributes.get("href").map(String::as_str), Some("/x?a=1&b=2"));
        assert_eq!(tag.attributes.get("target").map(String::as_str), Some("_blank"));
        assert_eq!(tag.text, "Click me");
        assert!(!tag.force_expand);
    }

    #[test]
    fn test_parse_default_tag_when_omitted() {
        let tag = parse(".card#main");
        assert_eq!(tag.name, "div");
        assert_eq!(tag.classes, vec!["card"]);
        assert_eq!(tag.id.as_deref(), Some("main"));
    }

    #[test]
    fn test_parse_force_expand_marker() {
        assert!(parse(r#"img.photo(src="a.png")~"#).force_expand);
        assert!(parse("script~").force_expand);
        let tilde_text = parse("p ~");
        assert!(!tilde_text.force_expand);
        assert_eq!(tilde_text.text, "~");
    }

    #[test]
    fn test_parse_bare_attribute_and_spaces_in_list() {
        let tag = parse("input(type=checkbox, checked)");
        assert_eq!(tag.attributes.get("type").map(String::as_str), Some("checkbox"));
        assert_eq!(tag.attributes.get("checked").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_escapes_in_attribute_value() {
        let tag = parse(r"pre(data-x=a\tb\,c)");
        assert_eq!(tag.attributes.get("data-x").map(String::as_str), Some("a\tb,c"));
    }

    #[test]
    fn test_parse_text_is_verbatim() {
        let tag = parse(r#"p   "quoted" (parens) \n"#);
        assert_eq!(tag.text, r#""quoted" (parens) \n"#);
    }

    #[test]
    fn test_parse_unterminated_attribute_list() {
        let err = TagNode::parse("a(href=x", "div").unwrap_err();
        assert_eq!(err, DomainError::UnterminatedAttributes { tag: "a".into() });
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = TagNode::parse(r#"a(href="x)"#, "div").unwrap_err();
        assert_eq!(err, DomainError::UnterminatedQuote { quote: '"' });
    }

    #[test]
    fn test_render_attributes_qualifies_and_merges_classes() {
        let tag = parse(r#"div.box#bar(class=extra,title="a<b")"#);
        let ns = Namespace::root().nested(false, &["foo".to_string()]);
        assert_eq!(
            tag.render_attributes(&ns, &Tokens::new()),
            r#" class="extra foo-box" id="foo-bar" title="a&lt;b""#
        );
    }

    #[test]
    fn test_render_attributes_substitutes_tokens() {
        let tag = parse("a(href=$0$)");
        let tokens = crate::domain::tokens::bind(&["/home".to_string()]);
        assert_eq!(
            tag.render_attributes(&Namespace::root(), &tokens),
            r#" href="/home""#
        );
    }
}
