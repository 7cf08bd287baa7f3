//! CLI parse: clap types for gplay. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gplay - Google Play Console from the command line
#[derive(Parser, Debug)]
#[command(name = "gplay", version)]
#[command(about = "Query Google Play reviews and Android vitals with machine-readable output")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table, markdown, csv)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<String>,

    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Comma-separated dot paths to keep, e.g. data.*.reviewId,meta.pagination
    #[arg(long, global = true)]
    pub fields: Option<String>,

    /// Whole-command deadline in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Items per upstream page
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Resume from this page token
    #[arg(long, global = true)]
    pub page_token: Option<String>,

    /// Follow page tokens until exhausted
    #[arg(long, global = true)]
    pub all: bool,

    /// Stop --all after this many pages
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, file, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// User reviews (Google Play Developer API)
    Reviews {
        #[command(subcommand)]
        command: ReviewsCommands,
    },
    /// Android vitals (Play Developer Reporting API)
    Vitals {
        #[command(subcommand)]
        command: VitalsCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReviewsCommands {
    /// List recent reviews
    List {
        /// Application package name
        #[arg(long)]
        package: String,
        /// Translate review text into this language
        #[arg(long)]
        translation_language: Option<String>,
    },
    /// Fetch a single review
    Get {
        /// Application package name
        #[arg(long)]
        package: String,
        /// Review identifier
        #[arg(long)]
        review_id: String,
        /// Translate review text into this language
        #[arg(long)]
        translation_language: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum VitalsCommands {
    /// Query a vitals metric set
    Query {
        /// Application package name
        #[arg(long)]
        package: String,
        /// Metric set (crash-rate, anr-rate, excessive-wakeup-rate,
        /// stuck-background-wakelock-rate, slow-start-rate, slow-rendering-rate, error-count)
        #[arg(long)]
        metric_set: String,
        /// Metric to request (repeatable; defaults per metric set)
        #[arg(long = "metric")]
        metrics: Vec<String>,
        /// Dimension to break down by (repeatable)
        #[arg(long = "dimension")]
        dimensions: Vec<String>,
        /// Number of full days to query, ending yesterday
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}
