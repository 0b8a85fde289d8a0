//! Compilation session
//!
//! Owns the node arena and both registries for one compilation. Nothing is
//! shared between sessions: dropping a session releases every tree and clears
//! the registries with it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::builder::TreeBuilder;
use crate::application::services::dependencies::DependencyWalker;
use crate::application::services::render::HtmlRenderer;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, FileId, FileRegistry, NameRegistry, NodeArena, Options, STDIN_PATH};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::{normalize_path_separator, PathExt};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Collecting,
    Parsed,
    /// Parsing aborted; holds the first error message
    Failed(String),
}

pub struct Session {
    fs: Arc<dyn FileSystem>,
    options: Options,
    arena: NodeArena,
    files: FileRegistry,
    names: NameRegistry,
    inputs: Vec<String>,
    roots: Vec<FileId>,
    phase: Phase,
    started: bool,
}

impl Session {
    pub fn new(fs: Arc<dyn FileSystem>, options: Options) -> Self {
        debug!("Session options: {:?}", options);
        Self {
            fs,
            options,
            arena: NodeArena::new(),
            files: FileRegistry::new(),
            names: NameRegistry::new(),
            inputs: Vec::new(),
            roots: Vec::new(),
            phase: Phase::Collecting,
            started: false,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn files(&self) -> &FileRegistry {
        &self.files
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Root file ids in input order, available after `parse`.
    pub fn roots(&self) -> &[FileId] {
        &self.roots
    }

    /// Register a top-level input (`-` for standard input).
    ///
    /// Ignored, returning false, once parsing or rendering has started.
    pub fn add_input(&mut self, input: impl Into<String>) -> bool {
        let input = input.into();
        if self.started {
            debug!("Input {} ignored, session already started", input);
            return false;
        }
        self.inputs.push(input);
        true
    }

    /// Parse every input in order; the first failure aborts.
    ///
    /// A failed session stays failed: later calls return an error instead of
    /// the partially built trees.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&mut self) -> ApplicationResult<()> {
        self.started = true;
        match &self.phase {
            Phase::Parsed => return Ok(()),
            Phase::Failed(first) => {
                return Err(ApplicationError::Domain(DomainError::Internal(format!(
                    "session aborted by an earlier error: {}",
                    first
                ))))
            }
            Phase::Collecting => {}
        }
        if let Err(e) = self.build_all() {
            self.phase = Phase::Failed(e.to_string());
            return Err(e);
        }
        self.phase = Phase::Parsed;
        Ok(())
    }

    fn build_all(&mut self) -> ApplicationResult<()> {
        let mut builder = TreeBuilder::new(
            self.fs.as_ref(),
            &self.options,
            &mut self.arena,
            &mut self.files,
        );
        let mut roots = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            roots.push(builder.build_root(input)?);
        }
        info!(
            "Parsed {} input(s), {} file(s), {} node(s)",
            roots.len(),
            self.files.len(),
            self.arena.len()
        );
        self.roots = roots;
        Ok(())
    }

    /// Render every input's tree, in input order, into one HTML string.
    #[instrument(level = "debug", skip(self))]
    pub fn serialize(&mut self) -> ApplicationResult<String> {
        self.parse()?;
        let mut renderer =
            HtmlRenderer::new(&self.arena, &self.files, &mut self.names, &self.options);
        for &root in &self.roots {
            renderer.render_root(root)?;
        }
        Ok(renderer.finish())
    }

    /// One line per input: `input: dep dep ...` with every distinct file
    /// reachable from it.
    #[instrument(level = "debug", skip(self))]
    pub fn dependences(&mut self) -> ApplicationResult<String> {
        self.parse()?;
        let walker = DependencyWalker::new(&self.arena, &self.files);
        let mut out = String::new();
        for &root in &self.roots {
            let deps = walker.transitive(root)?;
            out.push_str(&self.dependency_line(root, &deps));
        }
        Ok(out)
    }

    /// One line per registered file, listing only its immediate includes.
    #[instrument(level = "debug", skip(self))]
    pub fn dependences_all(&mut self) -> ApplicationResult<String> {
        self.parse()?;
        let walker = DependencyWalker::new(&self.arena, &self.files);
        let mut out = String::new();
        for entry in self.files.iter() {
            let deps = walker.immediate(entry.id)?;
            out.push_str(&self.dependency_line(entry.id, &deps));
        }
        Ok(out)
    }

    /// Include hierarchy of every input.
    pub fn tree(&mut self) -> ApplicationResult<String> {
        self.parse()?;
        let walker = DependencyWalker::new(&self.arena, &self.files);
        let label = |id: FileId| self.display_path(id);
        let mut out = String::new();
        for &root in &self.roots {
            out.push_str(&walker.tree(root, &label)?.to_string());
        }
        Ok(out)
    }

    fn dependency_line(&self, file: FileId, deps: &[FileId]) -> String {
        let mut line = format!("{}:", self.display_path(file));
        for &dep in deps {
            line.push(' ');
            line.push_str(&self.display_path(dep));
        }
        line.push('\n');
        line
    }

    /// Registered path relative to the working directory.
    pub fn display_path(&self, id: FileId) -> String {
        let Some(entry) = self.files.get(id) else {
            return "?".to_string();
        };
        if entry.path.as_os_str() == STDIN_PATH {
            return STDIN_PATH.to_string();
        }
        let cwd = self.fs.current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        relative_display(&entry.path, &cwd)
    }
}

fn relative_display(path: &Path, base: &Path) -> String {
    normalize_path_separator(&path.relative_to(base).display().to_string())
}
