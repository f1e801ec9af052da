//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::stats::classify::DEFAULT_APOLOGY_WORDS;
use crate::transcript::DateOrder;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Upload server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest accepted transcript upload in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    /// Wall-clock limit for one analysis in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Analyses allowed to run at once, including ones past their timeout
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

pub fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

pub fn default_max_upload_mb() -> u64 {
    10
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_max_concurrent() -> usize {
    4
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_mb: default_max_upload_mb(),
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Transcript parser configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// "month-first" (M/D/YY) or "day-first" (D/M/YY)
    #[serde(default)]
    pub date_order: DateOrder,
}

/// Message classification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Words counted as apologies
    #[serde(default = "default_apology_words")]
    pub apology_words: Vec<String>,
    /// Extra attachment placeholders (added to the built-in list)
    #[serde(default)]
    pub media_placeholders: Vec<String>,
}

pub fn default_apology_words() -> Vec<String> {
    DEFAULT_APOLOGY_WORDS.iter().map(|w| w.to_string()).collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            apology_words: default_apology_words(),
            media_placeholders: Vec::new(),
        }
    }
}

/// Year range shown in monthly trend output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_first_year")]
    pub first_year: i32,
    #[serde(default = "default_last_year")]
    pub last_year: i32,
}

pub fn default_first_year() -> i32 {
    2022
}

pub fn default_last_year() -> i32 {
    2025
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            first_year: default_first_year(),
            last_year: default_last_year(),
        }
    }
}
