use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::style::Theme;

/// Default maximum number of table rows on screen
pub const DEFAULT_HEIGHT: usize = 20;

fn default_height() -> usize {
    DEFAULT_HEIGHT
}

fn default_theme_name() -> String {
    "default".to_string()
}

/// Settings read from `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Maximum visible rows
    #[serde(default = "default_height")]
    pub height: usize,
    /// Built-in theme name
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Path of a TOML theme file
    #[serde(default)]
    pub theme_file: Option<PathBuf>,
    /// Inline theme; takes precedence over `theme` and `theme_file`
    #[serde(default)]
    pub colors: Option<Theme>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            theme: default_theme_name(),
            theme_file: None,
            colors: None,
        }
    }
}

impl AppConfig {
    /// `$XDG_CONFIG_HOME/tablespy/config.toml`, falling back to `~/.config`
    pub fn default_path() -> PathBuf {
        if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
            PathBuf::from(dir).join("tablespy/config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config/tablespy/config.toml")
        } else {
            PathBuf::from(".config/tablespy/config.toml")
        }
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))?;
        if config.height == 0 {
            return Err("Failed to parse config file: height must be at least 1".to_string());
        }
        Ok(config)
    }

    /// Read the config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::parse(&content)
    }

    /// Like `from_file`, but a broken file is logged and replaced by defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring config file");
            Self::default()
        })
    }

    /// Resolve the theme to draw with
    pub fn resolve_theme(&self) -> Theme {
        if let Some(theme) = &self.colors {
            return theme.clone();
        }
        if let Some(path) = &self.theme_file {
            match Theme::from_file(path) {
                Ok(theme) => return theme,
                Err(e) => warn!(path = %path.display(), error = %e, "falling back to named theme"),
            }
        }
        Theme::by_name(&self.theme).unwrap_or_else(|| {
            warn!(
                theme = %self.theme,
                available = ?Theme::builtin_names(),
                "unknown theme, using default"
            );
            Theme::default()
        })
    }
}
