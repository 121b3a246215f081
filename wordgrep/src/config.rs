use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of
/// precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.wordgrep.yaml` in the current directory
/// 3. Global `$HOME/.config/wordgrep/config.yaml`
///
/// # Configuration Format
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Search terms, matched as whole words
/// terms:
///   - "the"
///   - "cat"
///
/// # Root directory to search in
/// root_path: "."
///
/// # Case handling: "exact" or "insensitive"
/// case_mode: "insensitive"
///
/// # Maximum number of files searched at once (default: CPU cores)
/// max_concurrency: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// # CLI Integration
///
/// Command-line arguments take precedence over config file values; the
/// merging behavior is defined in [`SearchConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The search terms, matched as whole words. Order is preserved and
    /// duplicates are allowed; an empty list yields no matches.
    #[serde(default)]
    pub terms: Vec<String>,

    /// Root directory to start the search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Whether terms match exactly or ignoring ASCII case
    #[serde(default)]
    pub case_mode: CaseMode,

    /// Maximum number of files searched concurrently.
    /// Defaults to the number of CPU cores.
    #[serde(default = "default_concurrency")]
    pub max_concurrency: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// How a word is compared against a search term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Byte-exact comparison
    Exact,
    /// ASCII case-insensitive comparison
    #[default]
    Insensitive,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_concurrency() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            root_path: default_root_path(),
            case_mode: CaseMode::default(),
            max_concurrency: default_concurrency(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("wordgrep/config.yaml")),
            // Local config
            Some(PathBuf::from(".wordgrep.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.terms.is_empty() {
            self.terms = cli_config.terms;
        }
        if cli_config.root_path != default_root_path() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.case_mode != CaseMode::default() {
            self.case_mode = cli_config.case_mode;
        }
        // Always use CLI concurrency
        self.max_concurrency = cli_config.max_concurrency;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }

    /// Validates the configuration before a run starts.
    ///
    /// The concurrency limit must stay within `[1, num_cpus]`; anything else
    /// aborts before traversal.
    pub fn validate(&self) -> SearchResult<()> {
        let cores = num_cpus::get().max(1);
        if self.max_concurrency.get() > cores {
            return Err(SearchError::config_error(format!(
                "thread count must be between 1 and {}, got {}",
                cores, self.max_concurrency
            )));
        }
        Ok(())
    }
}
