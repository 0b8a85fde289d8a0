//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dorothy/dorothy.toml`
//! 3. Local config: `./.dorothy.toml` (working directory)
//! 4. Environment variables: `DOROTHY_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Options, Tokens};

/// Unified configuration for dorothy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Omit indentation and comments from the output
    pub strip: bool,
    /// Deepest allowed tree level
    pub max_depth: usize,
    /// Tag used when a tag line omits the name
    pub default_tag: String,
    /// Verbosity level (same scale as repeated -v)
    pub verbosity: u8,
    /// Initial token bindings, keyed by index
    pub tokens: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        let options = Options::default();
        Self {
            strip: options.strip,
            max_depth: options.max_depth,
            default_tag: options.default_tag,
            verbosity: options.verbosity,
            tokens: BTreeMap::new(),
        }
    }
}

/// Get the XDG config directory for dorothy.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dorothy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dorothy.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".dorothy.toml")
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.dorothy.toml` (usually the cwd)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        let local = local_dir.map(local_config_path);
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load settings from explicit config file locations plus environment.
    ///
    /// Missing files are skipped; unreadable or malformed files are errors.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("strip", defaults.strip)
            .map_err(config_err)?
            .set_default("max_depth", defaults.max_depth as u64)
            .map_err(config_err)?
            .set_default("default_tag", defaults.default_tag.clone())
            .map_err(config_err)?
            .set_default("verbosity", defaults.verbosity as u64)
            .map_err(config_err)?;

        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                debug!("Loading config file {}", path.display());
                builder = builder.add_source(File::from(path).required(true));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("DOROTHY")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.default_tag.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "default_tag must not be empty".to_string(),
            });
        }
        self.token_bindings().map(|_| ())
    }

    /// Token table with numeric indices.
    pub fn token_bindings(&self) -> Result<Tokens, ApplicationError> {
        self.tokens
            .iter()
            .map(|(key, value)| {
                key.parse::<usize>()
                    .map(|index| (index, value.clone()))
                    .map_err(|_| ApplicationError::Config {
                        message: format!("token index must be a number: {}", key),
                    })
            })
            .collect()
    }

    /// Immutable session options derived from these settings.
    pub fn to_options(&self) -> Result<Options, ApplicationError> {
        Ok(Options {
            strip: self.strip,
            max_depth: self.max_depth,
            verbosity: self.verbosity,
            default_tag: self.default_tag.clone(),
            tokens: self.token_bindings()?,
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# dorothy configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/dorothy/dorothy.toml
#   Local:  ./.dorothy.toml
#   Env:    DOROTHY_* environment variables (DOROTHY_TOKENS__0=value for tokens)
#   Command-line flags override all of the above.

# Omit indentation and comments from the output
# strip = false

# Deepest allowed tree level
# max_depth = 1000

# Tag used when a tag line starts with '.', '#' or '('
# default_tag = "div"

# Diagnostic verbosity (4 and above writes directive traces into the output)
# verbosity = 0

# Initial token bindings ($0, $1, ...)
# [tokens]
# 0 = "Site title"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
