//! Service container for dependency injection
//!
//! Wires settings and I/O implementations into compilation sessions.

use std::sync::Arc;

use crate::application::{ApplicationResult, Session};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and shared I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Fresh compilation session configured from the settings.
    pub fn session(&self) -> ApplicationResult<Session> {
        let options = self.settings.to_options()?;
        Ok(Session::new(Arc::clone(&self.fs), options))
    }
}
