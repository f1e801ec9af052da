//! CLI definitions for chatstats
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so the command handlers and completion generation can share them.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Build clap styles.
///
/// - Green: headers, usage, command names (accent color)
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "chatstats")]
#[command(about = "[ chatstats ] - statistics for exported two-person chat transcripts")]
#[command(
    long_about = "chatstats - Analyze exported two-person chat transcripts.

chatstats reads a plain-text chat export, attributes every message to its
sender and computes per-participant statistics: message and character
counts, average message length, apologies, media, links, emoji, active-day
share, monthly growth and a month-by-month message matrix.

QUICK START:
    chatstats analyze chat.txt            Print the statistics tables
    chatstats analyze chat.txt --json     Print the report as JSON
    chatstats serve                       Start the HTTP upload endpoint

Configuration is read from ~/.config/chatstats/config.toml."
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a transcript file
    #[command(long_about = "Analyze an exported chat transcript.

Supported line formats:
    [1/15/24, 9:05:12 PM] Alice: message text
    1/15/24, 21:05 - Alice: message text

Lines without a header continue the previous message. System notices
(no sender) and deleted-message tombstones are skipped. Only the two
most active senders are reported; others are listed as a warning.

EXAMPLES:
    chatstats analyze chat.txt                Tables for the configured years
    chatstats analyze chat.txt --json         Full report as JSON
    chatstats analyze chat.txt --day-first    Dates written as D/M/YY

OUTPUT:
                         Alice         Bob
    Messages                 1           1
    Characters               2           8
    ...")]
    Analyze {
        /// Path to the transcript file
        #[arg(help = "Path to the exported transcript (.txt)")]
        file: String,
        /// Print the report as JSON
        #[arg(long, help = "Print the report as pretty JSON")]
        json: bool,
        /// Treat header dates as day/month/year
        #[arg(long, help = "Read header dates as D/M/YY (overrides config)")]
        day_first: bool,
    },

    /// Start the HTTP upload endpoint
    #[command(long_about = "Start the HTTP server.

POST a transcript as multipart/form-data (field \"file\") to /analyze to
receive the report as JSON. GET /health reports liveness.

EXAMPLES:
    chatstats serve                               Listen on the configured address
    chatstats serve --bind 0.0.0.0:8080           Override the listen address
    chatstats serve --max-upload-mb 5 --timeout 10

    curl -F file=@chat.txt http://127.0.0.1:5000/analyze")]
    Serve {
        /// Address to listen on
        #[arg(long, help = "Listen address (overrides config)")]
        bind: Option<String>,
        /// Largest accepted upload in megabytes
        #[arg(long, help = "Upload limit in MB (overrides config)")]
        max_upload_mb: Option<u64>,
        /// Per-analysis timeout in seconds
        #[arg(long, help = "Analysis timeout in seconds (overrides config)")]
        timeout: Option<u64>,
    },

    /// Configuration management
    #[command(
        subcommand,
        long_about = "View and create the chatstats configuration file.

Configuration is stored in ~/.config/chatstats/config.toml and includes
server limits, the header date order, apology words, extra media
placeholders and the year range of the trend tables.

EXAMPLES:
    chatstats config show          Display current configuration
    chatstats config path          Print the config file location
    chatstats config init          Write the default configuration"
    )]
    Config(ConfigCommands),

    /// Generate shell completions (internal use)
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    #[command(long_about = "Display the effective configuration in TOML format.

Values missing from the config file are shown with their defaults.

EXAMPLE:
    chatstats config show")]
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration file
    #[command(long_about = "Write the default configuration to the config file.

Refuses to overwrite an existing file unless --force is given.

EXAMPLE:
    chatstats config init
    chatstats config init --force")]
    Init {
        /// Overwrite an existing file
        #[arg(long, help = "Overwrite an existing config file")]
        force: bool,
    },
}
