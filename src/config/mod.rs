//! Configuration management for chatstats

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::stats::AnalyzeOptions;

/// Upper bound for `server.max_upload_mb`
pub const MAX_UPLOAD_MB_LIMIT: u64 = 1024;

impl Config {
    /// Get the config file path (~/.config/chatstats/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/chatstats)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from an explicit path, or return defaults if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Save configuration to the given path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        io::save_to(self, path)
    }

    /// Validate configuration values.
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.bind.trim().is_empty() {
            return Err("server.bind must not be empty".to_string());
        }
        if self.server.max_upload_mb == 0 {
            return Err("server.max_upload_mb must be > 0".to_string());
        }
        if self.server.max_upload_mb > MAX_UPLOAD_MB_LIMIT {
            return Err(format!(
                "server.max_upload_mb {} exceeds maximum ({})",
                self.server.max_upload_mb, MAX_UPLOAD_MB_LIMIT
            ));
        }
        if self.server.timeout_secs == 0 {
            return Err("server.timeout_secs must be > 0".to_string());
        }
        if self.server.max_concurrent == 0 {
            return Err("server.max_concurrent must be > 0".to_string());
        }
        if let Some(word) = self
            .analysis
            .apology_words
            .iter()
            .find(|w| w.trim().is_empty())
        {
            return Err(format!(
                "analysis.apology_words contains a blank entry ({:?})",
                word
            ));
        }
        if self.chart.first_year > self.chart.last_year {
            return Err(format!(
                "chart.first_year {} is after chart.last_year {}",
                self.chart.first_year, self.chart.last_year
            ));
        }
        Ok(())
    }

    /// Analysis settings derived from the parser and analysis sections
    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions::default()
            .date_order(self.parser.date_order)
            .apology_words(self.analysis.apology_words.clone())
            .media_placeholders(self.analysis.media_placeholders.clone())
    }

    /// Upload limit in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.server.max_upload_mb * 1024 * 1024
    }

    /// Per-analysis wall-clock limit
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    /// Years shown in trend output
    pub fn chart_years(&self) -> RangeInclusive<i32> {
        self.chart.first_year..=self.chart.last_year
    }
}
