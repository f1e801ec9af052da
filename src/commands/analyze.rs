//! Analyze command handler

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};
use tracing::debug;

use chatstats::stats::{self, Analysis};
use chatstats::transcript;
use chatstats::{Config, DateOrder};

/// Analyze a transcript file and print the report.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &str, json: bool, day_first: bool) -> Result<()> {
    let config = Config::load()?;

    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("File not found: {}", file);
    }
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", file))?;
    debug!(file = %file, size = %format_size(bytes.len() as u64, BINARY), "read transcript");

    let mut options = config.analyze_options();
    if day_first {
        options = options.date_order(DateOrder::DayFirst);
    }

    let text = transcript::decode(&bytes);
    let analysis = stats::analyze(&text, &options)
        .with_context(|| format!("Failed to analyze {}", file))?;

    debug!(
        lines = analysis.parse_stats.lines,
        skipped = analysis.parse_stats.skipped(),
        deleted = analysis.deleted_messages,
        "parse summary"
    );
    for warning in warnings(&analysis) {
        eprintln!("Warning: {}", warning);
    }
    print!("{}", render(&analysis, json, config.chart_years())?);
    Ok(())
}

/// Render the report as pretty JSON or as the summary and trend tables.
pub fn render(analysis: &Analysis, json: bool, years: RangeInclusive<i32>) -> Result<String> {
    if json {
        let mut out =
            serde_json::to_string_pretty(&analysis.report).context("Failed to serialize report")?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = analysis.report.summary_table();
    let trend = analysis.report.trend_table(years);
    if !trend.is_empty() {
        out.push('\n');
        out.push_str(&trend);
    }
    Ok(out)
}

/// Notes for the user about data left out of the report.
pub fn warnings(analysis: &Analysis) -> Vec<String> {
    let mut warnings = Vec::new();
    if !analysis.excluded_senders.is_empty() {
        let names: Vec<String> = analysis
            .excluded_senders
            .iter()
            .map(|s| format!("{} ({} messages)", s.name, s.messages))
            .collect();
        warnings.push(format!(
            "only the two most active senders are reported; excluded {}",
            names.join(", ")
        ));
    }
    warnings
}
