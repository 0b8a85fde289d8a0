//! HTML renderer: serializes a built forest.
//!
//! Rendering is a read-only walk of the arena. Namespace, bindings and the
//! sibling list are passed down as context, never stored on nodes, so a
//! define body can be rendered any number of times. The only state written
//! during the walk is the name registry (defines register when reached).

use tracing::{debug, instrument, warn};

use crate::application::error_ext::LocateExt;
use crate::application::{ApplicationError, ApplicationResult, Location};
use crate::domain::{
    encode_html, format_tokens, CloneNode, CloneTarget, DefineNode, DomainError, FileId,
    FileRegistry, NameEntry, NameRegistry, Namespace, NodeArena, NodeId, NodeKind, Options,
    TagNode, Tokens, TreeNode,
};
use crate::domain::tokens::replace_tokens;

/// Context threaded through one level of the walk.
#[derive(Clone, Copy)]
struct Scope<'s> {
    namespace: &'s Namespace,
    tokens: &'s Tokens,
    /// Nodes nested under the closest include or clone site
    siblings: &'s [NodeId],
    /// Render nesting level, 1 for top-level nodes
    depth: usize,
    /// Number of enclosing comments
    comments: usize,
}

impl<'s> Scope<'s> {
    fn indent(&self, options: &Options) -> String {
        if options.strip {
            String::new()
        } else {
            " ".repeat(self.depth.saturating_sub(1))
        }
    }

    fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    fn marks(&self) -> (&'static str, &'static str) {
        if self.comments > 0 {
            ("/* ", " */")
        } else {
            ("<!-- ", " -->")
        }
    }
}

pub struct HtmlRenderer<'a> {
    arena: &'a NodeArena,
    files: &'a FileRegistry,
    names: &'a mut NameRegistry,
    options: &'a Options,
    /// Files currently being expanded, innermost last
    active: Vec<FileId>,
    out: String,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(
        arena: &'a NodeArena,
        files: &'a FileRegistry,
        names: &'a mut NameRegistry,
        options: &'a Options,
    ) -> Self {
        Self {
            arena,
            files,
            names,
            options,
            active: Vec::new(),
            out: String::new(),
        }
    }

    /// Render one top-level input with the session's initial bindings.
    #[instrument(level = "debug", skip(self))]
    pub fn render_root(&mut self, file: FileId) -> ApplicationResult<()> {
        let root = self.file_root(file)?;
        let options = self.options;
        let namespace = Namespace::root();
        let scope = Scope {
            namespace: &namespace,
            tokens: &options.tokens,
            siblings: &[],
            depth: 0,
            comments: 0,
        };
        self.active.push(file);
        let result = self.render_children(root, scope);
        self.active.pop();
        result
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn file_root(&self, file: FileId) -> ApplicationResult<NodeId> {
        self.files
            .get(file)
            .and_then(|entry| entry.root)
            .ok_or_else(|| {
                ApplicationError::Domain(DomainError::Internal(format!(
                    "file #{} has no root node",
                    file
                )))
            })
    }

    /// Render the children of `parent` one level below `scope`.
    fn render_children(&mut self, parent: NodeId, scope: Scope<'_>) -> ApplicationResult<()> {
        let arena = self.arena;
        let node = arena.node(parent)?;
        let inner = scope.deeper();
        for &child in &node.children {
            self.render_node(child, inner)?;
        }
        Ok(())
    }

    fn render_node(&mut self, idx: NodeId, scope: Scope<'_>) -> ApplicationResult<()> {
        let arena = self.arena;
        let node = arena.node(idx)?;
        if !self.options.depth_allowed(scope.depth) {
            return Err(DomainError::MaxDepthExceeded(self.options.max_depth))
                .at(|| self.location(node));
        }

        match &node.kind {
            NodeKind::File(file) => {
                let root = self.file_root(file.file)?;
                self.render_children(root, scope)
            }
            NodeKind::Include(include) => {
                let file = include
                    .file
                    .ok_or_else(|| DomainError::Internal("unresolved include".to_string()))
                    .at(|| self.location(node))?;
                self.render_include(node, file, &include.tokens, scope)
            }
            NodeKind::Namespace(ns) => {
                let namespace = scope.namespace.nested(ns.reset, &ns.segments);
                self.trace(scope, "namespace", "start", &namespace.to_string());
                self.render_children(
                    idx,
                    Scope {
                        namespace: &namespace,
                        ..scope
                    },
                )?;
                let count = node.children.len();
                self.trace(scope, "namespace", &format!("stop,{}", count), &namespace.to_string());
                Ok(())
            }
            NodeKind::Define(define) => self.register_define(idx, node, define, scope),
            NodeKind::Clone(clone) => self.render_clone(node, clone, scope),
            NodeKind::Text(text) => {
                let line = encode_html(&replace_tokens(text, scope.tokens));
                self.push_line(scope, &line);
                self.render_children(idx, scope)
            }
            NodeKind::Html(html) => {
                let line = replace_tokens(html, scope.tokens);
                self.push_line(scope, &line);
                self.render_children(idx, scope)
            }
            NodeKind::Comment(text) => self.render_comment(idx, node, text, scope),
            NodeKind::Mock => Ok(()),
            NodeKind::Tag(tag) => self.render_tag(idx, node, tag, scope),
        }
    }

    fn render_include(
        &mut self,
        node: &TreeNode,
        file: FileId,
        tokens: &Tokens,
        scope: Scope<'_>,
    ) -> ApplicationResult<()> {
        if self.active.contains(&file) {
            warn!(
                "{}: recursive include of {} expands to nothing",
                self.location(node),
                self.files.display_path(file)
            );
            return Ok(());
        }
        let root = self.file_root(file)?;
        let count = self.arena.node(root)?.children.len();
        let args = format_tokens(tokens);

        self.trace(scope, "include", "start", &args);
        self.active.push(file);
        let result = self.render_children(
            root,
            Scope {
                tokens,
                siblings: &node.children,
                ..scope
            },
        );
        self.active.pop();
        result?;
        self.trace(scope, "include", &format!("stop,{}", count), &args);
        Ok(())
    }

    /// Register the define's names in the current namespace; emits nothing.
    fn register_define(
        &mut self,
        idx: NodeId,
        node: &TreeNode,
        define: &DefineNode,
        scope: Scope<'_>,
    ) -> ApplicationResult<()> {
        let names = define.names.join(" ");
        self.trace(scope, "define", "start", &names);
        let entry = NameEntry {
            node: idx,
            file: node.pos.file,
            line: node.pos.line,
        };
        for name in &define.names {
            let qualified = scope.namespace.qualify(name);
            match self.names.register(&qualified, entry) {
                Ok(true) => {
                    debug!("{}: name {} registered", self.location(node), qualified);
                    let (begin, end) = scope.marks();
                    if self.options.trace_output() {
                        let line = format!(
                            " {}Directive 'define' has registered new name: {}{}",
                            begin, qualified, end
                        );
                        self.push_line(scope, &line);
                    }
                }
                Ok(false) => {}
                Err(first) => {
                    let first = format!("{}:{}", self.files.display_path(first.file), first.line);
                    return Err(DomainError::DuplicateName {
                        name: qualified,
                        first,
                    })
                    .at(|| self.location(node));
                }
            }
        }
        self.trace(scope, "define", &format!("stop,{}", node.children.len()), &names);
        Ok(())
    }

    fn render_clone(
        &mut self,
        node: &TreeNode,
        clone: &CloneNode,
        scope: Scope<'_>,
    ) -> ApplicationResult<()> {
        let args = format_tokens(&clone.tokens);
        self.trace(scope, "clone", "start", &args);
        let inner = Scope {
            tokens: &clone.tokens,
            siblings: &node.children,
            ..scope
        };

        match &clone.target {
            CloneTarget::Sibling(0) => {
                for &sibling in scope.siblings {
                    self.render_node(sibling, inner)?;
                }
            }
            CloneTarget::Sibling(n) => {
                if let Some(&sibling) = scope.siblings.get(n - 1) {
                    self.render_node(sibling, inner)?;
                }
            }
            CloneTarget::Name(name) => {
                let qualified = scope.namespace.qualify(name);
                let define = self
                    .names
                    .get(&qualified)
                    .map(|entry| entry.node)
                    .ok_or(DomainError::NameNotFound(qualified))
                    .at(|| self.location(node))?;
                self.render_children(define, inner)?;
            }
        }

        self.trace(scope, "clone", &format!("stop,{}", node.children.len()), &args);
        Ok(())
    }

    fn render_comment(
        &mut self,
        idx: NodeId,
        node: &TreeNode,
        text: &str,
        scope: Scope<'_>,
    ) -> ApplicationResult<()> {
        if self.options.strip {
            return Ok(());
        }
        let (begin, end) = scope.marks();
        let indent = scope.indent(self.options);
        self.out.push_str(&indent);
        self.out.push_str(begin);
        self.out.push_str(&replace_tokens(text, scope.tokens));
        if !node.children.is_empty() {
            self.out.push('\n');
            self.render_children(
                idx,
                Scope {
                    comments: scope.comments + 1,
                    ..scope
                },
            )?;
            self.out.push_str(&indent);
        }
        self.out.push_str(end);
        self.out.push('\n');
        Ok(())
    }

    fn render_tag(
        &mut self,
        idx: NodeId,
        node: &TreeNode,
        tag: &TagNode,
        scope: Scope<'_>,
    ) -> ApplicationResult<()> {
        let indent = scope.indent(self.options);
        let name = encode_html(&replace_tokens(&tag.name, scope.tokens));
        let attributes = tag.render_attributes(scope.namespace, scope.tokens);
        let has_children = !node.children.is_empty();

        if tag.is_short(has_children) {
            self.out
                .push_str(&format!("{}<{}{}/>\n", indent, name, attributes));
            return Ok(());
        }

        let text = encode_html(&replace_tokens(&tag.text, scope.tokens));
        self.out
            .push_str(&format!("{}<{}{}>{}", indent, name, attributes, text));
        if has_children {
            self.out.push('\n');
            self.render_children(idx, scope)?;
            self.out.push_str(&indent);
        }
        self.out.push_str(&format!("</{}>\n", name));
        Ok(())
    }

    fn push_line(&mut self, scope: Scope<'_>, line: &str) {
        self.out.push_str(&scope.indent(self.options));
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// Directive trace comment, written only at the highest verbosity.
    fn trace(&mut self, scope: Scope<'_>, directive: &str, phase: &str, args: &str) {
        if !self.options.trace_output() {
            return;
        }
        let (begin, end) = scope.marks();
        let line = format!("{}Directive '{}' ({}): {}{}", begin, directive, phase, args, end);
        self.push_line(scope, &line);
    }

    fn location(&self, node: &TreeNode) -> Location {
        Location {
            path: self.files.display_path(node.pos.file),
            line: node.pos.line,
            depth: node.pos.depth,
        }
    }
}
