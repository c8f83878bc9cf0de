//! Configuration file support
//!
//! Settings load from ~/.pynote.toml (or %USERPROFILE%\.pynote.toml on
//! Windows). Missing files and malformed values fall back to defaults;
//! configuration loading never fails.
//!
//! Example:
//! ```text
//! # pynote configuration
//! tab-size = 4
//! font-size = 16
//! wrap-mode = false
//! encoding = "utf-8"
//! line-numbers = true
//! ```

use std::fs;
use std::path::PathBuf;

use toml::Table;

/// Editor configuration
///
/// Owned by the application shell and handed to the indent engine and
/// renderer at call time. The core never caches these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tab stop width in columns
    pub tab_size: usize,
    /// Font size hint, carried for gutter padding (clamped 6..=99)
    pub font_size: u32,
    /// Whether long lines wrap instead of truncating
    pub wrap_mode: bool,
    /// Encoding tag for opened files (informational)
    pub encoding: String,
    /// Whether to draw the line-number gutter
    pub show_line_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_size: 4,
            font_size: 16,
            wrap_mode: false,
            encoding: "utf-8".to_string(),
            show_line_numbers: true,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        let home = std::env::var("USERPROFILE").ok();

        #[cfg(not(windows))]
        let home = std::env::var("HOME").ok();

        home.map(|h| PathBuf::from(h).join(".pynote.toml"))
    }

    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                if let Ok(table) = contents.parse::<Table>() {
                    config.apply(&table);
                }
            }
        }

        config
    }

    /// Apply settings from a parsed TOML table
    fn apply(&mut self, table: &Table) {
        if let Some(n) = table.get("tab-size").and_then(|v| v.as_integer()) {
            self.tab_size = (n.max(1) as usize).clamp(1, 16);
        }

        if let Some(n) = table.get("font-size").and_then(|v| v.as_integer()) {
            self.font_size = (n.max(0) as u32).clamp(6, 99);
        }

        if let Some(b) = table.get("wrap-mode").and_then(|v| v.as_bool()) {
            self.wrap_mode = b;
        }

        if let Some(s) = table.get("encoding").and_then(|v| v.as_str()) {
            self.encoding = s.to_string();
        }

        if let Some(b) = table.get("line-numbers").and_then(|v| v.as_bool()) {
            self.show_line_numbers = b;
        }
    }

    /// Save current configuration to file
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::config_path() {
            let contents = format!(
                "# pynote configuration\n\
                 # Generated automatically\n\n\
                 tab-size = {}\n\
                 font-size = {}\n\
                 wrap-mode = {}\n\
                 encoding = \"{}\"\n\
                 line-numbers = {}\n",
                self.tab_size, self.font_size, self.wrap_mode, self.encoding, self.show_line_numbers
            );
            fs::write(path, contents)?;
        }
        Ok(())
    }
}
