//! Term Schema CLI - discover keys, dependencies and normalized tables in a CSV file
//!
//! Usage:
//!   term-schema <file.csv> [--max-combination-size N] [--max-lhs-size N]
//!                          [--format human|json|markdown] [--exact] [--verbose]
//!
//! Examples:
//!   term-schema data/orders.csv
//!   term-schema data/orders.csv --max-combination-size 3 --format markdown
//!   term-schema data/orders.tsv --delimiter '\t' --format json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use term_schema::discovery::SchemaProfiler;
use term_schema::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, MarkdownFormatter, ResultFormatter,
};
use term_schema::logging::setup::{init_logging, LoggingConfig};
use term_schema::logging::LogConfig;
use term_schema::sources::{load_csv, CsvOptions};

#[derive(Parser)]
#[command(name = "term-schema")]
#[command(about = "Term Schema - Discover candidate keys, functional dependencies and normalized tables")]
#[command(version)]
struct Cli {
    /// Path to the CSV file
    file: PathBuf,

    /// Largest column combination tested for uniqueness
    #[arg(long, default_value_t = 2)]
    max_combination_size: usize,

    /// Largest determinant tested for functional dependencies
    #[arg(long, default_value_t = 2)]
    max_lhs_size: usize,

    /// Output format
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Count every key combination exactly instead of estimating wide ones
    #[arg(long)]
    exact: bool,

    /// Leave out dependencies whose determinant is unique
    #[arg(long)]
    skip_unique_determinants: bool,

    /// Maximum number of key rows to print (all by default)
    #[arg(long)]
    max_key_rows: Option<i32>,

    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// Treat the first row as data rather than a header
    #[arg(long)]
    no_header: bool,

    /// Disable ANSI colors in human output
    #[arg(long)]
    no_color: bool,

    /// Log search progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Console tables
    Human,
    /// Pretty-printed JSON
    Json,
    /// Markdown report
    Markdown,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        if let Err(e) = init_logging(LoggingConfig::development()) {
            eprintln!("Warning: failed to initialize logging: {e}");
        }
    }

    let delimiter = match parse_delimiter(&cli.delimiter) {
        Some(d) => d,
        None => {
            eprintln!(
                "Error: delimiter must be a single byte, got '{}'",
                cli.delimiter
            );
            return ExitCode::FAILURE;
        }
    };

    let options = CsvOptions {
        delimiter,
        has_header: !cli.no_header,
        ..Default::default()
    };
    let dataset = match load_csv(&cli.file, &options) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let log = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::production()
    };
    let profiler = match SchemaProfiler::builder()
        .max_combination_size(cli.max_combination_size)
        .max_lhs_size(cli.max_lhs_size)
        .exact_unique_counts(cli.exact)
        .include_unique_determinants(!cli.skip_unique_determinants)
        .log_config(log)
        .build()
    {
        Ok(profiler) => profiler,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match profiler.profile(&dataset) {
        Ok(profile) => profile.to_result(),
        Err(e) => {
            eprintln!("Profiling error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = FormatterConfig::default().with_colors(!cli.no_color);
    if let Some(max) = cli.max_key_rows {
        config = config.with_max_key_rows(max);
    }

    let rendered = match cli.format {
        OutputFormat::Human => HumanFormatter::with_config(config).format(&result),
        OutputFormat::Json => JsonFormatter::with_config(config).format(&result),
        OutputFormat::Markdown => MarkdownFormatter::with_config(config).format(&result),
    };

    match rendered {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Formatting error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Accepts a single byte or the escape `\t`.
fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "\\t" => Some(b'\t'),
        _ if raw.len() == 1 => raw.bytes().next(),
        _ => None,
    }
}
