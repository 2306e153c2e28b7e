//! Column-major, in-memory tabular dataset.
//!
//! A [`Dataset`] is the read-only input of one profiling run: an ordered
//! sequence of named columns holding nullable cell [`Value`]s. Every column
//! has the same number of rows.
//!
//! Datasets are usually produced by a loader. Arrow record batches convert
//! directly:
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, StringArray};
//! use arrow::record_batch::RecordBatch;
//! use term_schema::dataset::{Dataset, Value};
//!
//! let batch = RecordBatch::try_from_iter(vec![
//!     ("id", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
//!     ("name", Arc::new(StringArray::from(vec![Some("a"), None, Some("a")])) as ArrayRef),
//! ]).unwrap();
//!
//! let dataset = Dataset::from_record_batch(&batch).unwrap();
//! assert_eq!(dataset.n_rows(), 3);
//! assert_eq!(dataset.column("name").unwrap().values()[1], Value::Null);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// A single nullable cell value.
///
/// `Null` is an ordinary value for grouping purposes: two nulls are equal
/// to each other and different from everything else. Floats compare by
/// bit pattern after folding `-0.0` into `0.0` and all NaNs into one NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn float_bits(f: f64) -> u64 {
        if f.is_nan() {
            f64::NAN.to_bits()
        } else if f == 0.0 {
            0.0f64.to_bits()
        } else {
            f.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => Self::float_bits(*f).hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A named column of cell values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Creates a column from anything convertible into [`Value`]s.
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cell values in row order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Counts distinct values, null included as one value.
    pub fn distinct_count(&self) -> usize {
        self.values.iter().collect::<HashSet<_>>().len()
    }
}

/// An ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Creates a dataset, validating unique names and equal column lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(SchemaError::LengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Creates a dataset with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Converts a single Arrow record batch.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        Self::from_record_batches(std::slice::from_ref(batch))
    }

    /// Converts a sequence of record batches sharing one schema, appending
    /// their rows in order.
    pub fn from_record_batches(batches: &[RecordBatch]) -> Result<Self> {
        let Some(first) = batches.first() else {
            return Ok(Self::empty());
        };
        let schema = first.schema();

        let mut columns: Vec<Column> = schema
            .fields()
            .iter()
            .map(|field| Column {
                name: field.name().clone(),
                values: Vec::new(),
            })
            .collect();

        for batch in batches {
            if batch.schema().fields() != schema.fields() {
                return Err(SchemaError::internal(
                    "record batches do not share one schema",
                ));
            }
            for (column, array) in columns.iter_mut().zip(batch.columns()) {
                column.values.extend(arrow_values(array)?);
            }
        }

        Self::new(columns)
    }

    /// Returns the number of rows (zero when there are no columns).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Returns the number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SchemaError::column_not_found(name))
    }
}

fn arrow_values(array: &ArrayRef) -> Result<Vec<Value>> {
    macro_rules! integers {
        ($t:ty) => {{
            let typed = array.as_primitive::<$t>();
            (0..array.len())
                .map(|i| {
                    if typed.is_null(i) {
                        Value::Null
                    } else {
                        Value::Integer(typed.value(i) as i64)
                    }
                })
                .collect()
        }};
    }
    macro_rules! floats {
        ($t:ty) => {{
            let typed = array.as_primitive::<$t>();
            (0..array.len())
                .map(|i| {
                    if typed.is_null(i) {
                        Value::Null
                    } else {
                        Value::Float(typed.value(i) as f64)
                    }
                })
                .collect()
        }};
    }

    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; array.len()],
        DataType::Boolean => {
            let typed = array.as_boolean();
            (0..array.len())
                .map(|i| {
                    if typed.is_null(i) {
                        Value::Null
                    } else {
                        Value::Boolean(typed.value(i))
                    }
                })
                .collect()
        }
        DataType::Int8 => integers!(Int8Type),
        DataType::Int16 => integers!(Int16Type),
        DataType::Int32 => integers!(Int32Type),
        DataType::Int64 => integers!(Int64Type),
        DataType::UInt8 => integers!(UInt8Type),
        DataType::UInt16 => integers!(UInt16Type),
        DataType::UInt32 => integers!(UInt32Type),
        // Values above i64::MAX keep their identity as text.
        DataType::UInt64 => {
            let typed = array.as_primitive::<UInt64Type>();
            (0..array.len())
                .map(|i| {
                    if typed.is_null(i) {
                        Value::Null
                    } else {
                        let v = typed.value(i);
                        i64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::Integer)
                    }
                })
                .collect()
        }
        DataType::Float32 => floats!(Float32Type),
        DataType::Float64 => floats!(Float64Type),
        DataType::Utf8 => {
            let typed = array.as_string::<i32>();
            (0..array.len())
                .map(|i| {
                    if typed.is_null(i) {
                        Value::Null
                    } else {
                        Value::Text(typed.value(i).to_string())
                    }
                })
                .collect()
        }
        DataType::LargeUtf8 => {
            let typed = array.as_string::<i64>();
            (0..array.len())
                .map(|i| {
                    if typed.is_null(i) {
                        Value::Null
                    } else {
                        Value::Text(typed.value(i).to_string())
                    }
                })
                .collect()
        }
        DataType::Utf8View => {
            let typed = array.as_string_view();
            (0..array.len())
                .map(|i| {
                    if typed.is_null(i) {
                        Value::Null
                    } else {
                        Value::Text(typed.value(i).to_string())
                    }
                })
                .collect()
        }
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            (0..array.len())
                .map(|i| {
                    if array.is_null(i) {
                        Value::Null
                    } else {
                        Value::Text(formatter.value(i).to_string())
                    }
                })
                .collect()
        }
    };

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Date32Array, Float64Array, Int32Array, StringArray};
    use std::sync::Arc;

    #[test]
    fn test_null_equals_null_only() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Null, Value::Integer(0));
        assert_ne!(Value::Text(String::new()), Value::Null);
    }

    #[test]
    fn test_float_canonicalization() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(-f64::NAN));
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_ne!(Value::Float(1.0), Value::Integer(1));

        let distinct: HashSet<Value> = [Value::Float(f64::NAN), Value::Float(f64::NAN)]
            .into_iter()
            .collect();
        assert_eq!(distinct.len(), 1);
    }

    #[test]
    fn test_distinct_count_includes_null() {
        let column = Column::new("c", vec![Some(1), None, Some(1), None]);
        assert_eq!(column.distinct_count(), 2);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::new("a", vec![1, 2]),
            Column::new("a", vec![3, 4]),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { column } if column == "a"));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::new("a", vec![1, 2, 3]),
            Column::new("b", vec![1, 2]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_from_record_batch() {
        let batch = RecordBatch::try_from_iter(vec![
            (
                "id",
                Arc::new(Int32Array::from(vec![Some(1), Some(2), None])) as ArrayRef,
            ),
            (
                "price",
                Arc::new(Float64Array::from(vec![1.5, 2.5, 1.5])) as ArrayRef,
            ),
            (
                "flag",
                Arc::new(BooleanArray::from(vec![true, false, true])) as ArrayRef,
            ),
            (
                "label",
                Arc::new(StringArray::from(vec![Some("x"), None, Some("y")])) as ArrayRef,
            ),
            (
                "day",
                Arc::new(Date32Array::from(vec![Some(0), Some(1), None])) as ArrayRef,
            ),
        ])
        .unwrap();

        let dataset = Dataset::from_record_batch(&batch).unwrap();
        assert_eq!(dataset.n_rows(), 3);
        assert_eq!(
            dataset.column_names(),
            vec!["id", "price", "flag", "label", "day"]
        );
        assert_eq!(dataset.column("id").unwrap().values()[2], Value::Null);
        assert_eq!(dataset.column("price").unwrap().values()[0], Value::Float(1.5));
        assert_eq!(dataset.column("flag").unwrap().values()[1], Value::Boolean(false));
        assert_eq!(dataset.column("label").unwrap().values()[1], Value::Null);
        assert_eq!(
            dataset.column("day").unwrap().values()[0],
            Value::Text("1970-01-01".to_string())
        );
        assert_eq!(dataset.column("day").unwrap().values()[2], Value::Null);
    }

    #[test]
    fn test_from_multiple_batches() {
        let first = RecordBatch::try_from_iter(vec![(
            "a",
            Arc::new(Int32Array::from(vec![1, 2])) as ArrayRef,
        )])
        .unwrap();
        let second = RecordBatch::try_from_iter(vec![(
            "a",
            Arc::new(Int32Array::from(vec![3])) as ArrayRef,
        )])
        .unwrap();

        let dataset = Dataset::from_record_batches(&[first, second]).unwrap();
        assert_eq!(dataset.n_rows(), 3);
        assert_eq!(dataset.column("a").unwrap().values()[2], Value::Integer(3));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::empty();
        assert_eq!(dataset.n_rows(), 0);
        assert_eq!(dataset.n_columns(), 0);
        assert!(dataset.column("missing").is_err());
    }
}
