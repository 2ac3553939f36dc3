//! Layered application configuration.
//!
//! Settings are merged from lowest to highest priority:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config FILE`, or `config.toml` in the platform config directory)
//! 3. `BAYAN_*` environment variables (`BAYAN_BLOCK_SIZE=4096`)
//! 4. Command-line flags
//!
//! # Example
//!
//! ```toml
//! block_size = 4096
//! min_size = 1
//! recursive = true
//! threads = 4
//! strategy = "representative"
//! masks = ["*.jpg", "*.png"]
//! excludes = ["/home/me/photos/cache"]
//! output = "json"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, ScanArgs};
use crate::duplicates::{FinderConfig, MatchStrategy};
use crate::scanner::{WalkerConfig, DEFAULT_BLOCK_SIZE};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "BAYAN_";

/// Invalid or unloadable configuration. Always reported before scanning.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Block size must be at least one byte.
    #[error("Invalid block size {0}: must be at least 1 byte")]
    InvalidBlockSize(u64),

    /// Thread count must be at least one.
    #[error("Invalid thread count: must be at least 1")]
    InvalidThreads,

    /// The configuration file or environment could not be parsed.
    #[error("Failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bytes per comparison block.
    pub block_size: u64,
    /// Smallest file size admitted, in bytes.
    pub min_size: u64,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Comparison threads.
    pub threads: usize,
    /// Matching strategy.
    pub strategy: MatchStrategy,
    /// File name wildcards; empty admits every file.
    pub masks: Vec<String>,
    /// Directories pruned from the walk.
    pub excludes: Vec<PathBuf>,
    /// Report format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE as u64,
            min_size: 1,
            recursive: false,
            threads: 1,
            strategy: MatchStrategy::default(),
            masks: Vec::new(),
            excludes: Vec::new(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// `path` overrides the platform default location. A missing file is
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file or an environment value
    /// cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        Self::figment(path.as_deref(), ENV_PREFIX)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "bayan", "bayan").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn figment(path: Option<&Path>, env_prefix: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if path.is_file() {
                log::debug!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            } else {
                log::warn!(
                    "Configuration file {} not found, using defaults",
                    path.display()
                );
            }
        }
        figment.merge(Env::prefixed(env_prefix).split("__"))
    }

    /// Apply command-line flags on top of the loaded configuration.
    ///
    /// Only flags that were given override; repeated lists replace the
    /// configured lists rather than extending them.
    pub fn merge_cli(&mut self, args: &ScanArgs) {
        if let Some(block_size) = args.block_size {
            self.block_size = block_size;
        }
        if let Some(min_size) = args.min_size {
            self.min_size = min_size;
        }
        if let Some(recursive) = args.recursion() {
            self.recursive = recursive;
        }
        if let Some(threads) = args.threads {
            self.threads = threads;
        }
        if let Some(strategy) = args.strategy {
            self.strategy = strategy;
        }
        if !args.masks.is_empty() {
            self.masks.clone_from(&args.masks);
        }
        if !args.excludes.is_empty() {
            self.excludes.clone_from(&args.excludes);
        }
        if let Some(output) = args.output {
            self.output = output;
        }
    }

    /// Check the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] for a zero (or
    /// unaddressable) block size and [`ConfigError::InvalidThreads`] for
    /// zero threads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.block_size_bytes()?;
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreads);
        }
        Ok(())
    }

    fn block_size_bytes(&self) -> Result<usize, ConfigError> {
        match usize::try_from(self.block_size) {
            Ok(0) | Err(_) => Err(ConfigError::InvalidBlockSize(self.block_size)),
            Ok(size) => Ok(size),
        }
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(
            self.recursive,
            self.min_size,
            self.masks.clone(),
            self.excludes.clone(),
        )
    }

    /// Finder settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Config::validate`].
    pub fn finder_config(&self) -> Result<FinderConfig, ConfigError> {
        self.validate()?;
        Ok(FinderConfig::default()
            .with_block_size(self.block_size_bytes()?)
            .with_threads(self.threads)
            .with_strategy(self.strategy)
            .with_walker_config(self.walker_config()))
    }
}
