//! User settings for devtree.
//!
//! Settings control how the `devtree` binary renders a tree. They are stored
//! as TOML and every field falls back to a default when absent, so a partial
//! file is always valid.
//!
//! # Example
//!
//! ```
//! use devtree::settings::Settings;
//!
//! let settings = Settings::default();
//! assert_eq!(settings.indent_size, 2);
//! assert!(settings.show_values);
//!
//! let custom = Settings {
//!     show_types: true,
//!     ..Settings::default()
//! };
//! assert!(custom.show_types);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::document::tree::ROOT_SENTINEL_KEY;

/// Rendering settings for the `devtree` binary.
///
/// # Fields
///
/// * `indent_size` - Spaces per depth level when printing (default: 2)
/// * `show_values` - Print scalar values after keys (default: true)
/// * `show_types` - Annotate scalars with int/float/string (default: false)
/// * `root_key` - Key of the in-memory root used when grafting (default: "Root")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Spaces per depth level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Print scalar values after keys
    #[serde(default = "default_show_values")]
    pub show_values: bool,

    /// Annotate scalars with their coerced type
    #[serde(default)]
    pub show_types: bool,

    /// Key of the in-memory root that documents are grafted under
    #[serde(default = "default_root_key")]
    pub root_key: String,
}

fn default_indent_size() -> usize {
    2
}

fn default_show_values() -> bool {
    true
}

fn default_root_key() -> String {
    ROOT_SENTINEL_KEY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            show_values: default_show_values(),
            show_types: false,
            root_key: default_root_key(),
        }
    }
}

impl Settings {
    /// Returns the path to the settings file.
    ///
    /// Uses `~/.config/devtree/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("devtree");
            path.push("config.toml");
            path
        })
    }

    /// Loads settings from the default location.
    ///
    /// Returns the defaults if the file is missing, unreadable or invalid.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads settings from `path`, falling back to the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid settings file");
                Self::default()
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read settings file");
                Self::default()
            }
        }
    }

    /// Saves settings to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Saves settings to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = toml::from_str("show_types = true\n").unwrap();
        assert!(settings.show_types);
        assert_eq!(settings.indent_size, 2);
        assert_eq!(settings.root_key, "Root");
    }

    #[test]
    fn test_config_path_ends_with_devtree() {
        if let Some(path) = Settings::config_path() {
            assert!(path.ends_with(".config/devtree/config.toml"));
        }
    }
}
