//! Result formatting for schema discovery results.
//!
//! This module renders a [`ProfileResult`] as JSON, as human-readable console
//! text, or as Markdown for documentation purposes.
//!
//! # Examples
//!
//! ```rust
//! use term_schema::dataset::{Column, Dataset};
//! use term_schema::formatters::{HumanFormatter, ResultFormatter};
//!
//! # fn example() -> term_schema::error::Result<()> {
//! let dataset = Dataset::new(vec![Column::new("id", vec![1, 2, 3])])?;
//! let result = term_schema::profile(&dataset, 2, 2)?;
//!
//! let output = HumanFormatter::new().format(&result)?;
//! assert!(output.contains("Analyzed 3 rows × 1 columns"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::fmt::Write;

use crate::discovery::{KeyRow, ProfileResult};
use crate::error::Result;

/// Configuration options for formatting profile results.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the key report
    pub include_keys: bool,
    /// Include discovered functional dependencies
    pub include_dependencies: bool,
    /// Include the proposed normalized tables
    pub include_tables: bool,
    /// Maximum number of key rows to display (-1 for all)
    pub max_key_rows: i32,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_keys: true,
            include_dependencies: true,
            include_tables: true,
            max_key_rows: -1,
            use_colors: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only keys.
    pub fn minimal() -> Self {
        Self {
            include_keys: true,
            include_dependencies: false,
            include_tables: false,
            max_key_rows: 10,
            use_colors: false,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self::default()
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_keys: true,
            include_dependencies: true,
            include_tables: true,
            max_key_rows: 50,
            use_colors: false,
        }
    }

    /// Sets whether to include the key report.
    pub fn with_keys(mut self, include: bool) -> Self {
        self.include_keys = include;
        self
    }

    /// Sets whether to include functional dependencies.
    pub fn with_dependencies(mut self, include: bool) -> Self {
        self.include_dependencies = include;
        self
    }

    /// Sets whether to include normalized tables.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Sets the maximum number of key rows to display.
    pub fn with_max_key_rows(mut self, max: i32) -> Self {
        self.max_key_rows = max;
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn visible_keys<'a>(&self, rows: &'a [KeyRow]) -> &'a [KeyRow] {
        if self.max_key_rows < 0 {
            rows
        } else {
            &rows[..rows.len().min(self.max_key_rows as usize)]
        }
    }
}

/// Trait for formatting profile results into different output formats.
///
/// # Examples
///
/// ```rust
/// use term_schema::formatters::ResultFormatter;
/// use term_schema::discovery::ProfileResult;
///
/// struct KeyCount;
///
/// impl ResultFormatter for KeyCount {
///     fn format(&self, result: &ProfileResult) -> term_schema::prelude::Result<String> {
///         Ok(format!("{} keys", result.key_results.len()))
///     }
/// }
/// ```
pub trait ResultFormatter {
    /// Formats a profile result into a string representation.
    fn format(&self, result: &ProfileResult) -> Result<String>;

    /// Formats a profile result with custom configuration.
    fn format_with_config(&self, result: &ProfileResult, _config: &FormatterConfig) -> Result<String> {
        self.format(result)
    }
}

/// Formats profile results as structured JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, result: &ProfileResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(&self, result: &ProfileResult, config: &FormatterConfig) -> Result<String> {
        let filtered = filter_result_for_config(result, config);
        let json = if self.pretty {
            serde_json::to_string_pretty(&filtered)?
        } else {
            serde_json::to_string(&filtered)?
        };
        Ok(json)
    }
}

/// Formats profile results for console output.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, result: &ProfileResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(&self, result: &ProfileResult, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        let paint = |text: &str, code: &str| {
            if config.use_colors {
                format!("\x1b[{code}m{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };

        writeln!(output)?;
        writeln!(output, "🔎 {}", paint("Schema Discovery", "1"))?;
        writeln!(output, "{}", summary_line(result))?;

        if config.include_keys {
            writeln!(output)?;
            writeln!(output, "🔑 Key Analysis:")?;
            let rows = config.visible_keys(&result.key_results);
            if rows.is_empty() {
                writeln!(output, "   (none)")?;
            } else {
                let width = rows
                    .iter()
                    .map(|r| r.columns_label.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max("Columns".len());
                writeln!(
                    output,
                    "   {:<width$}  {:>8}  {:>8}  Type",
                    "Columns", "Unique", "Ratio"
                )?;
                for row in rows {
                    let label = match row.key_type_label.as_str() {
                        "" => String::new(),
                        label if label.starts_with('★') => paint(label, "32"),
                        label => paint(label, "33"),
                    };
                    writeln!(
                        output,
                        "   {:<width$}  {:>8}  {:>8}  {}",
                        row.columns_label, row.unique_count, row.uniqueness_ratio_label, label
                    )?;
                }
            }
            if result.key_results.len() > rows.len() {
                writeln!(
                    output,
                    "   ... and {} more combinations (use --max-key-rows to show more)",
                    result.key_results.len() - rows.len()
                )?;
            }
        }

        if config.include_dependencies {
            writeln!(output)?;
            writeln!(output, "🔗 Functional Dependencies:")?;
            if result.fd_results.is_empty() {
                writeln!(output, "   (none)")?;
            }
            for fd in &result.fd_results {
                writeln!(output, "   {} → {}", fd.lhs_label, fd.rhs_label)?;
            }
        }

        if config.include_tables {
            writeln!(output)?;
            writeln!(output, "🧩 Proposed Tables:")?;
            if result.normalized_tables.is_empty() {
                writeln!(output, "   (none)")?;
            }
            for table in &result.normalized_tables {
                writeln!(
                    output,
                    "   {} [PK: {}]: {}",
                    paint(&table.table_name, "36"),
                    table.primary_key_label,
                    table.attributes.join(", ")
                )?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }
}

/// Formats profile results as Markdown suitable for documentation.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    /// Creates a new Markdown formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    /// Creates a new Markdown formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, result: &ProfileResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(&self, result: &ProfileResult, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        writeln!(output, "{h} 🔎 Schema Discovery Report")?;
        writeln!(output)?;
        writeln!(output, "{}", summary_line(result))?;
        writeln!(output)?;
        writeln!(output, "**Columns:** {}", result.columns.join(", "))?;

        if config.include_keys {
            writeln!(output)?;
            writeln!(output, "{h}# Keys")?;
            writeln!(output)?;
            writeln!(output, "| Columns | Unique | Ratio | Type |")?;
            writeln!(output, "|---------|--------|-------|------|")?;
            let rows = config.visible_keys(&result.key_results);
            for row in rows {
                writeln!(
                    output,
                    "| {} | {} | {} | {} |",
                    row.columns_label, row.unique_count, row.uniqueness_ratio_label, row.key_type_label
                )?;
            }
            if result.key_results.len() > rows.len() {
                writeln!(output)?;
                writeln!(
                    output,
                    "> **Note:** {} additional combinations not shown in this report.",
                    result.key_results.len() - rows.len()
                )?;
            }
        }

        if config.include_dependencies {
            writeln!(output)?;
            writeln!(output, "{h}# Functional Dependencies")?;
            writeln!(output)?;
            if result.fd_results.is_empty() {
                writeln!(output, "_None found._")?;
            } else {
                writeln!(output, "| Determinant | Dependent |")?;
                writeln!(output, "|-------------|-----------|")?;
                for fd in &result.fd_results {
                    writeln!(output, "| {} | {} |", fd.lhs_label, fd.rhs_label)?;
                }
            }
        }

        if config.include_tables && !result.normalized_tables.is_empty() {
            writeln!(output)?;
            writeln!(output, "{h}# Proposed Tables")?;
            for table in &result.normalized_tables {
                writeln!(output)?;
                writeln!(output, "{h}## {}", table.table_name)?;
                writeln!(output)?;
                writeln!(output, "- **Primary key:** {}", table.primary_key_label)?;
                writeln!(output, "- **Attributes:** {}", table.attributes.join(", "))?;
            }
        }

        Ok(output)
    }
}

fn summary_line(result: &ProfileResult) -> String {
    format!(
        "Analyzed {} rows × {} columns; key combos up to size {}, FDs up to LHS size {}",
        result.n_rows,
        result.columns.len(),
        result.max_combination_size,
        result.max_lhs_size
    )
}

/// Helper function to filter a profile result based on configuration.
fn filter_result_for_config(result: &ProfileResult, config: &FormatterConfig) -> ProfileResult {
    let mut filtered = result.clone();

    if !config.include_keys {
        filtered.key_results.clear();
    } else if config.max_key_rows >= 0 {
        filtered.key_results.truncate(config.max_key_rows as usize);
    }

    if !config.include_dependencies {
        filtered.fd_results.clear();
    }

    if !config.include_tables {
        filtered.normalized_tables.clear();
    }

    filtered
}
