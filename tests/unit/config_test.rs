//! Unit tests for config module

use chatstats::{Config, DateOrder};
use std::fs;
use tempfile::TempDir;

#[test]
fn default_config_has_expected_values() {
    let config = Config::default();
    assert_eq!(config.server.bind, "127.0.0.1:5000");
    assert_eq!(config.server.max_upload_mb, 10);
    assert_eq!(config.server.timeout_secs, 30);
    assert_eq!(config.server.max_concurrent, 4);
    assert_eq!(config.parser.date_order, DateOrder::MonthFirst);
    assert_eq!(config.analysis.apology_words, vec!["sorry".to_string()]);
    assert!(config.analysis.media_placeholders.is_empty());
    assert_eq!(config.chart_years(), 2022..=2025);
}

#[test]
fn config_serialization_roundtrip() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn sections_default_when_missing() {
    let toml_str = r#"
[parser]
date_order = "day-first"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.parser.date_order, DateOrder::DayFirst);
    assert_eq!(config.server.timeout_secs, 30);
    assert_eq!(config.analysis.apology_words, vec!["sorry".to_string()]);
}

#[test]
fn unknown_date_order_is_rejected() {
    let toml_str = r#"
[parser]
date_order = "year-first"
"#;
    assert!(toml::from_str::<Config>(toml_str).is_err());
}

#[test]
fn validate_rejects_bad_values() {
    let mut config = Config::default();
    config.server.max_upload_mb = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.server.max_upload_mb = 4096;
    assert!(config.validate().unwrap_err().contains("exceeds maximum"));

    let mut config = Config::default();
    config.server.max_concurrent = 0;
    assert!(config.validate().unwrap_err().contains("max_concurrent"));

    let mut config = Config::default();
    config.analysis.apology_words.push("  ".to_string());
    assert!(config.validate().unwrap_err().contains("apology_words"));

    let mut config = Config::default();
    config.chart.first_year = 2030;
    assert!(config.validate().unwrap_err().contains("first_year"));
}

#[test]
fn load_from_missing_file_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn load_from_reports_invalid_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[server]\ntimeout_secs = 0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid config"));
}

#[test]
fn save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sub").join("config.toml");
    let mut config = Config::default();
    config.analysis.apology_words = vec!["sorry".to_string(), "apologies".to_string()];
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn analyze_options_follow_config() {
    let mut config = Config::default();
    config.parser.date_order = DateOrder::DayFirst;
    config.analysis.media_placeholders = vec!["<attached>".to_string()];

    let options = config.analyze_options();
    assert_eq!(options.date_order, DateOrder::DayFirst);
    assert_eq!(options.media_placeholders, vec!["<attached>".to_string()]);
    assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
}
