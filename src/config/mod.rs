//! Configuration for pathwalker.
//!
//! Two layers live here. [`WalkerOptions`] is what a [`PathWalker`] is built
//! from: an optional separator and an optional base location. [`Config`] is the
//! command-line tool's settings file, which embeds walker options and adds
//! output preferences. Both deserialize with serde and ignore unknown keys.
//!
//! # Example
//!
//! ```
//! use pathwalker::config::Config;
//!
//! let config: Config = toml::from_str(
//!     r#"
//!     output_format = "yaml"
//!
//!     [walker]
//!     separator = ":"
//!     "#,
//! )
//! .unwrap();
//!
//! let walker = config.walker();
//! assert_eq!(walker.separator(), ":");
//! assert_eq!(walker.location(), "");
//! ```
//!
//! [`PathWalker`]: crate::walker::PathWalker

use serde::{Deserialize, Serialize};

use crate::walker::PathWalker;

/// Construction options for a [`PathWalker`].
///
/// `None` and empty strings mean "use the default": separator `"."` and an
/// empty base location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerOptions {
    /// Delimiter between location segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Prefix for every reported location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Settings for the pathwalker command.
///
/// # Fields
///
/// * `output_format` - How `search` prints its result: "json" or "yaml" (default: "json")
/// * `create_backup` - Create .bak files before `search --write` saves (default: false)
/// * `walker` - Separator and base location (default: `"."` and empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Output format for search results: "json" or "yaml"
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Create .bak files before saving
    #[serde(default)]
    pub create_backup: bool,

    /// Path walker options
    #[serde(default)]
    pub walker: WalkerOptions,
}

/// Returns the default output format.
fn default_output_format() -> String {
    "json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            create_backup: false,
            walker: WalkerOptions::default(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/pathwalker/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("pathwalker");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|err| {
            log::warn!("ignoring {}: {:#}", config_path.display(), err);
            Self::default()
        })
    }

    /// Loads configuration from a specific file.
    pub fn load_from<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Builds the walker described by this configuration.
    pub fn walker(&self) -> PathWalker {
        PathWalker::with_options(&self.walker)
    }
}
