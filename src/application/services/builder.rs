//! Tree builder: reads sources into the node arena.
//!
//! Includes are resolved and parsed depth-first while the including file is
//! being read. A file is registered before its lines are read, so a file
//! reached again (diamond or cycle) links to the first entry and is never
//! parsed twice.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::error_ext::{IoResultExt, LocateExt};
use crate::application::reader::LineCursor;
use crate::application::{ApplicationError, ApplicationResult, Location};
use crate::domain::options::DEFAULT_EXTENSION;
use crate::domain::{
    classify, format_tokens, DomainError, FileId, FileNode, FileRegistry, NodeArena, NodeId,
    NodeKind, Options, SourcePos, STDIN_PATH,
};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

pub struct TreeBuilder<'a> {
    fs: &'a dyn FileSystem,
    options: &'a Options,
    arena: &'a mut NodeArena,
    files: &'a mut FileRegistry,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        options: &'a Options,
        arena: &'a mut NodeArena,
        files: &'a mut FileRegistry,
    ) -> Self {
        Self {
            fs,
            options,
            arena,
            files,
        }
    }

    /// Parse one top-level input; `-` reads standard input.
    #[instrument(level = "debug", skip(self))]
    pub fn build_root(&mut self, input: &str) -> ApplicationResult<FileId> {
        info!("Parsing input {} (start)", input);
        let id = if input == STDIN_PATH {
            self.load(PathBuf::from(STDIN_PATH))?
        } else {
            let cwd = self
                .fs
                .current_dir()
                .with_path_context("read working directory", Path::new("."))?;
            let path = self.resolve(&cwd, input)?;
            self.load(path)?
        };
        info!("Parsing input {} (stop)", input);
        Ok(id)
    }

    /// Resolve `path` against `base`, retrying once with the default extension.
    pub fn resolve(&self, base: &Path, path: &str) -> Result<PathBuf, DomainError> {
        let candidate = base.join(path);
        let readable = if self.fs.is_file(&candidate) {
            Some(candidate.clone())
        } else if !candidate.has_extension(DEFAULT_EXTENSION) {
            let mut with_ext = OsString::from(candidate.as_os_str());
            with_ext.push(".");
            with_ext.push(DEFAULT_EXTENSION);
            let with_ext = PathBuf::from(with_ext);
            self.fs.is_file(&with_ext).then_some(with_ext)
        } else {
            None
        };

        let found = readable.ok_or_else(|| DomainError::FileNotFound(candidate.clone()))?;
        self.fs
            .canonicalize(&found)
            .map_err(|_| DomainError::FileNotFound(candidate))
    }

    /// Register `canonical` and parse it unless it is already known.
    fn load(&mut self, canonical: PathBuf) -> ApplicationResult<FileId> {
        let (id, fresh) = self.files.register(&canonical);
        if !fresh {
            return Ok(id);
        }

        let (source, base) = if canonical.as_os_str() == STDIN_PATH {
            let source = self
                .fs
                .read_stdin()
                .with_path_context("read", Path::new(STDIN_PATH))?;
            let cwd = self
                .fs
                .current_dir()
                .with_path_context("read working directory", Path::new("."))?;
            (source, cwd)
        } else {
            let source = self
                .fs
                .read_to_string(&canonical)
                .with_path_context("read", &canonical)?;
            let base = canonical
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (source, base)
        };

        let root = self.arena.insert_root(
            NodeKind::File(FileNode { file: id }),
            SourcePos {
                file: id,
                line: 0,
                depth: 0,
            },
        );
        self.files.set_root(id, root);
        self.parse_lines(id, root, &source, &base)?;
        Ok(id)
    }

    fn parse_lines(
        &mut self,
        id: FileId,
        root: NodeId,
        source: &str,
        base: &Path,
    ) -> ApplicationResult<()> {
        let mut last = root;
        for line in LineCursor::new(source) {
            let pos = SourcePos {
                file: id,
                line: line.number,
                depth: line.depth,
            };
            let location = self.location(pos);

            let mut kind = classify(&line.text, &self.options.default_tag).at(|| location.clone())?;
            if !self.options.depth_allowed(pos.depth) {
                return Err(ApplicationError::Compile {
                    location,
                    source: DomainError::MaxDepthExceeded(self.options.max_depth),
                });
            }

            match &mut kind {
                NodeKind::Include(include) => {
                    let target = self.resolve(base, &include.path).at(|| location.clone())?;
                    info!(
                        "{}: Directive 'include' added: {} {}",
                        location,
                        include.path,
                        format_tokens(&include.tokens)
                    );
                    include.file = Some(self.load(target)?);
                }
                NodeKind::Namespace(ns) => {
                    info!(
                        "{}: Directive 'namespace' added{}: [{}]",
                        location,
                        if ns.reset { " (root)" } else { "" },
                        ns.segments.join(", ")
                    );
                }
                NodeKind::Define(define) => {
                    info!("{}: Directive 'define' added: {:?}", location, define.names);
                }
                NodeKind::Clone(clone) => {
                    info!(
                        "{}: Directive 'clone' added: {:?} {}",
                        location,
                        clone.target,
                        format_tokens(&clone.tokens)
                    );
                }
                other => debug!("{}: {} added", location, other.label()),
            }

            last = self.arena.attach(last, kind, pos).at(|| location.clone())?;
        }
        Ok(())
    }

    fn location(&self, pos: SourcePos) -> Location {
        Location {
            path: self.files.display_path(pos.file),
            line: pos.line,
            depth: pos.depth,
        }
    }
}
