//! Layered application configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file: `--config PATH`, or `config.toml` in the platform config
//!    directory when present
//! 3. Environment variables prefixed `DUPSWEEP_` (e.g. `DUPSWEEP_IO_THREADS=8`)
//! 4. Command-line flags, applied with [`Config::merge_cli`]
//!
//! ```toml
//! sort_order = "ascending"
//! extension = ".jpg"
//! io_threads = 2
//! lowercase_names = false
//! continue_on_error = true
//! delete_method = "trash"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{DeleteConfig, DeleteMethod};
use crate::cli::Cli;
use crate::duplicates::{HashConfig, SortOrder};
use crate::scanner::WalkerConfig;

/// Prefix of the environment variables read as configuration.
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Errors raised while assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No directory was given on the command line.
    #[error("Directory is not specified")]
    MissingDirectory,

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    /// A source could not be parsed or holds a value of the wrong type.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// A value parsed but is not acceptable.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listing order; asked for interactively when unset.
    pub sort_order: Option<SortOrder>,
    /// Extension filter; asked for interactively when unset.
    pub extension: Option<String>,
    /// Threads used for hashing.
    pub io_threads: usize,
    /// Rename scanned files to lowercase names.
    pub lowercase_names: bool,
    /// Keep deleting after a failure.
    pub continue_on_error: bool,
    /// How selected files are removed.
    pub delete_method: DeleteMethod,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sort_order: None,
            extension: None,
            io_threads: 4,
            lowercase_names: false,
            continue_on_error: false,
            delete_method: DeleteMethod::Permanent,
        }
    }
}

impl Config {
    /// Default config file location, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupsweep", "dupsweep")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults, file and environment layers, without CLI flags.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from an explicit file (which must exist) or the default location
    /// (which may be absent).
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileNotFound`] for a missing explicit file,
    /// [`ConfigError::Invalid`] for unparsable sources and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()))
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        if let Some(ref path) = path {
            log::debug!("Reading configuration from {}", path.display());
        }
        Self::load_from_path(path.as_deref())
    }

    /// Load the defaults, file and environment layers.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load), minus the missing-file check.
    pub fn load_from_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line flags on top of the loaded layers.
    ///
    /// Only flags actually given override; switches can turn options on but
    /// never off.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(order) = cli.sort {
            self.sort_order = Some(order);
        }
        if let Some(ref extension) = cli.extension {
            self.extension = Some(extension.clone());
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads;
        }
        if cli.lowercase_names {
            self.lowercase_names = true;
        }
        if cli.keep_going {
            self.continue_on_error = true;
        }
        if cli.trash {
            self.delete_method = DeleteMethod::Trash;
        }
    }

    /// Check values the type system can't.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for a zero thread count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "io_threads",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Walker options for this configuration and extension choice.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_extension(self.extension.clone())
            .with_lowercase_names(self.lowercase_names)
    }

    /// Hashing options.
    #[must_use]
    pub fn hash_config(&self) -> HashConfig {
        HashConfig::default().with_io_threads(self.io_threads)
    }

    /// Deletion options.
    #[must_use]
    pub fn delete_config(&self) -> DeleteConfig {
        DeleteConfig::default()
            .with_method(self.delete_method)
            .with_continue_on_error(self.continue_on_error)
    }
}
