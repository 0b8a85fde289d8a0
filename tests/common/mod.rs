//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use dorothy::domain::Options;
use dorothy::infrastructure::traits::{FileSystem, RealFileSystem};
use dorothy::{ApplicationResult, Session};

/// Real filesystem rooted at a temp directory, with canned stdin and
/// captured stdout.
pub struct ProjectFs {
    pub root: PathBuf,
    pub stdin: String,
    pub stdout: Mutex<String>,
    real: RealFileSystem,
}

impl ProjectFs {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            stdin: String::new(),
            stdout: Mutex::new(String::new()),
            real: RealFileSystem,
        }
    }

    pub fn with_stdin(mut self, stdin: &str) -> Self {
        self.stdin = stdin.to_string();
        self
    }
}

impl FileSystem for ProjectFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.real.read_to_string(path)
    }

    fn read_stdin(&self) -> io::Result<String> {
        Ok(self.stdin.clone())
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.real.write(path, content)
    }

    fn write_stdout(&self, content: &str) -> io::Result<()> {
        self.stdout.lock().unwrap().push_str(content);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.real.is_file(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.real.canonicalize(path)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.root.clone())
    }
}

/// Temp project directory; the canonical root keeps relative paths stable.
pub struct Project {
    _temp: TempDir,
    pub root: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        dorothy::util::testing::init_test_setup();
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path().canonicalize().expect("canonical temp dir");
        Self { _temp: temp, root }
    }

    /// Create a template file (parent directories included).
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write template");
        path
    }

    pub fn fs(&self) -> Arc<ProjectFs> {
        Arc::new(ProjectFs::new(&self.root))
    }

    pub fn session(&self, options: Options) -> Session {
        Session::new(self.fs(), options)
    }

    /// Compile `inputs` to HTML with `options`.
    pub fn compile_with(&self, inputs: &[&str], options: Options) -> ApplicationResult<String> {
        let mut session = self.session(options);
        for input in inputs {
            session.add_input(*input);
        }
        session.serialize()
    }

    pub fn compile(&self, input: &str) -> ApplicationResult<String> {
        self.compile_with(&[input], Options::default())
    }
}
