//! Configuration to acknowledge site preferences as well as set defaults.
//!
//! Specifically, we try to find a sidenav.toml, and if present we load settings from there.
//! This provides the content container, anchor naming, and the affix/scroll-spy geometry.

use crate::error::{Result, SidenavError};
use facet::Facet;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file looked up in the working directory.
pub const CONFIG_FILE: &str = "sidenav.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from sidenav.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 100)]
    /// Maximum line width for preview text wrapping.
    pub wrap_width: usize,
    #[facet(default = vec!["html".to_string(), "htm".to_string(), "md".to_string(), "markdown".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
    #[facet(default = "article".to_string())]
    /// Tag of the element whose headings feed the TOC.
    pub container: String,
    #[facet(default = String::new())]
    /// Prefix prepended to the sequential anchor ids.
    pub anchor_prefix: String,
    #[facet(default = 40)]
    /// Distance before the sidebar reaches the viewport top at which pinning engages.
    pub lead_margin: u32,
    #[facet(default = 10)]
    /// Pixels added to the scroll position before matching headings (fixed headers).
    pub spy_offset: u32,
    #[facet(default = 100)]
    /// Fallback wait before affix boundaries are measured.
    pub settle_delay_ms: u64,
    #[facet(default = 16)]
    /// Minimum interval between handled scroll events.
    pub scroll_throttle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrap_width: 100,
            file_extensions: ["html", "htm", "md", "markdown"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            container: "article".to_string(),
            anchor_prefix: String::new(),
            lead_margin: 40,
            spy_offset: 10,
            settle_delay_ms: 100,
            scroll_throttle_ms: 16,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from sidenav.toml if present.
    ///
    /// A missing or unreadable file yields the defaults; a file that fails to parse is
    /// reported and also falls back to the defaults.
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {CONFIG_FILE}: {e}");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for this struct.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| SidenavError::io(path, e))?;
        Self::parse(&contents)
    }

    /// Parse configuration text, filling absent keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this struct.
    pub fn parse(contents: &str) -> Result<Self> {
        facet_toml::from_str::<Self>(contents).map_err(|e| SidenavError::Config(e.to_string()))
    }

    #[must_use]
    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    /// Scroll throttle interval as a duration.
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
