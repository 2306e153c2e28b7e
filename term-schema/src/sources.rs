//! Loading datasets from CSV files.
//!
//! Files are read with Arrow's CSV reader. Unless a schema is supplied, it is
//! inferred from the first `schema_infer_max_records` records; empty fields
//! become nulls.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use tracing::{debug, info, instrument};

use crate::dataset::{Column, Dataset, Value};
use crate::error::Result;

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Escape character (default: None)
    pub escape: Option<u8>,
    /// Comment prefix (lines starting with this are ignored)
    pub comment: Option<u8>,
    /// Schema to use (if None, will be inferred)
    pub schema: Option<Arc<Schema>>,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
    /// Rows per Arrow batch while reading
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            escape: None,
            comment: None,
            schema: None,
            schema_infer_max_records: 1000,
            batch_size: 8192,
        }
    }
}

impl CsvOptions {
    fn format(&self) -> Format {
        let mut format = Format::default()
            .with_header(self.has_header)
            .with_delimiter(self.delimiter)
            .with_quote(self.quote);
        if let Some(escape) = self.escape {
            format = format.with_escape(escape);
        }
        if let Some(comment) = self.comment {
            format = format.with_comment(comment);
        }
        format
    }
}

/// Reads a CSV file into a [`Dataset`].
///
/// # Examples
///
/// ```rust,no_run
/// use term_schema::sources::{load_csv, CsvOptions};
///
/// # fn example() -> term_schema::error::Result<()> {
/// let options = CsvOptions {
///     delimiter: b'\t',
///     ..Default::default()
/// };
/// let dataset = load_csv("data/orders.tsv", &options)?;
/// println!("{} rows", dataset.n_rows());
/// # Ok(())
/// # }
/// ```
#[instrument(skip(options), fields(path = %path.as_ref().display()))]
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Dataset> {
    let mut file = File::open(path.as_ref())?;
    let format = options.format();

    let schema = match &options.schema {
        Some(schema) => Arc::clone(schema),
        None => {
            let (schema, records) =
                format.infer_schema(&mut file, Some(options.schema_infer_max_records))?;
            debug!(records, fields = schema.fields().len(), "Inferred CSV schema");
            file.seek(SeekFrom::Start(0))?;
            Arc::new(schema)
        }
    };

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(format)
        .with_batch_size(options.batch_size)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<RecordBatch>, _>>()?;

    // A header-only file yields no batches but still names its columns.
    let dataset = if batches.is_empty() {
        Dataset::new(
            schema
                .fields()
                .iter()
                .map(|field| Column::new(field.name().as_str(), Vec::<Value>::new()))
                .collect(),
        )?
    } else {
        Dataset::from_record_batches(&batches)?
    };
    info!(
        n_rows = dataset.n_rows(),
        n_columns = dataset.n_columns(),
        batches = batches.len(),
        "Loaded CSV"
    );
    Ok(dataset)
}
