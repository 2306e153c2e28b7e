//! End-to-end tests for `profile` and `SchemaProfiler`.

mod common;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use term_schema::prelude::*;

fn fd_pairs(result: &ProfileResult) -> Vec<(&str, &str)> {
    result
        .fd_results
        .iter()
        .map(|fd| (fd.lhs_label.as_str(), fd.rhs_label.as_str()))
        .collect()
}

fn key_label<'a>(result: &'a ProfileResult, columns: &str) -> Option<&'a str> {
    result
        .key_results
        .iter()
        .find(|row| row.columns_label == columns)
        .map(|row| row.key_type_label.as_str())
}

#[test]
fn test_customer_id_is_a_candidate_key() {
    let result = profile(&common::customers(), 2, 2).unwrap();

    let first = &result.key_results[0];
    assert_eq!(first.columns_label, "customer_id");
    assert_eq!(first.unique_count, 20);
    assert_eq!(first.uniqueness_ratio_label, "100.00%");
    assert_eq!(first.key_type_label, "★ Candidate Key");

    assert_eq!(
        key_label(&result, "customer_id, customer_name"),
        Some("⊃ Superkey")
    );
}

#[test]
fn test_customer_dependency_from_unique_determinant() {
    let dataset = common::customers();

    let result = profile(&dataset, 2, 2).unwrap();
    let pairs = fd_pairs(&result);
    assert!(pairs.contains(&("customer_id", "customer_name")));
    assert!(pairs.contains(&("customer_id", "order_amount")));
    assert_eq!(result.key_results[0].columns_label, "customer_id");
    assert_eq!(result.key_results[0].key_type_label, "★ Candidate Key");

    // The profiler skips unique determinants unless asked.
    let pruned = SchemaProfiler::new().profile(&dataset).unwrap().to_result();
    assert!(!fd_pairs(&pruned)
        .iter()
        .any(|(lhs, _)| *lhs == "customer_id"));
}

#[test]
fn test_composite_determinant_for_derived_column() {
    let result = profile(&common::line_items(), 2, 2).unwrap();
    let pairs = fd_pairs(&result);

    assert!(pairs.contains(&("quantity, unit_price", "total_price")));
    assert!(!pairs
        .iter()
        .any(|(lhs, rhs)| *rhs == "total_price" && !lhs.contains(',')));

    let result = profile(&common::line_items(), 2, 1).unwrap();
    assert!(!fd_pairs(&result).contains(&("quantity, unit_price", "total_price")));
}

#[test]
fn test_empty_dataset_yields_empty_results() {
    let result = profile(&Dataset::empty(), 2, 2).unwrap();
    assert!(result.fd_results.is_empty());
    assert!(result.key_results.is_empty());
    assert!(result.normalized_tables.is_empty());
    assert_eq!(result.n_rows, 0);

    let no_rows = Dataset::new(vec![
        Column::new("a", Vec::<i64>::new()),
        Column::new("b", Vec::<String>::new()),
    ])
    .unwrap();
    let result = profile(&no_rows, 2, 2).unwrap();
    assert!(result.fd_results.is_empty());
    assert!(result.key_results.is_empty());
    assert!(result.normalized_tables.is_empty());
    assert_eq!(result.columns, vec!["a", "b"]);
}

#[test]
fn test_all_null_column_is_one_group() {
    let dataset = common::all_null_with_unique();
    let result = profile(&dataset, 2, 2).unwrap();

    // A single null group determines nothing; the unique id determines it.
    assert_eq!(fd_pairs(&result), vec![("id", "missing")]);

    let missing = result
        .key_results
        .iter()
        .find(|row| row.columns_label == "missing")
        .unwrap();
    assert_eq!(missing.unique_count, 1);
    assert_eq!(missing.uniqueness_ratio_label, "20.00%");
    assert_eq!(missing.key_type_label, "");

    assert_eq!(key_label(&result, "id"), Some("★ Candidate Key"));
    assert_eq!(key_label(&result, "missing, id"), Some("⊃ Superkey"));
}

#[test]
fn test_order_lines_profile() {
    let dataset = common::order_lines();
    let profile = SchemaProfiler::new().profile(&dataset).unwrap();

    assert_eq!(
        profile.keys.candidate_keys,
        vec![
            ColumnSet::new(["order_id", "line"]),
            ColumnSet::new(["order_id", "product"]),
        ]
    );
    assert!(profile.keys.superkeys.is_empty());

    let result = profile.to_result();
    let pairs = fd_pairs(&result);
    assert!(pairs.contains(&("order_id", "customer")));
    assert!(pairs.contains(&("order_id", "city")));
    assert!(pairs.contains(&("customer", "city")));
    assert!(pairs.contains(&("city", "customer")));
    assert!(!pairs.iter().any(|(lhs, _)| *lhs == "line" || *lhs == "product"));

    let first_table = &result.normalized_tables[0];
    assert_eq!(first_table.table_name, "Table_1");
    assert_eq!(first_table.primary_key_label, "order_id");
    assert_eq!(first_table.attributes, vec!["order_id", "customer", "city"]);
}

#[test]
fn test_single_column_keys_are_candidate_keys() {
    for dataset in [
        common::customers(),
        common::line_items(),
        common::all_null_with_unique(),
        common::order_lines(),
        common::mixed_with_nulls(),
    ] {
        let result = profile(&dataset, 2, 2).unwrap();
        for column in dataset.columns() {
            if column.distinct_count() == dataset.n_rows() {
                assert_eq!(key_label(&result, column.name()), Some("★ Candidate Key"));
            }
        }
    }
}

#[test]
fn test_dependencies_are_sound() {
    for dataset in [
        common::customers(),
        common::line_items(),
        common::order_lines(),
        common::mixed_with_nulls(),
    ] {
        let profile = SchemaProfiler::builder()
            .include_unique_determinants(true)
            .build()
            .unwrap()
            .profile(&dataset)
            .unwrap();

        for fd in &profile.dependencies {
            let determinant: Vec<&[Value]> = fd
                .determinant
                .columns()
                .iter()
                .map(|name| dataset.column(name).unwrap().values())
                .collect();
            let dependent = dataset.column(&fd.dependent).unwrap().values();

            let mut seen: HashMap<Vec<&Value>, &Value> = HashMap::new();
            for row in 0..dataset.n_rows() {
                let key: Vec<&Value> = determinant.iter().map(|values| &values[row]).collect();
                let value = seen.entry(key).or_insert(&dependent[row]);
                assert_eq!(*value, &dependent[row], "{fd} violated at row {row}");
            }
        }
    }
}

#[test]
fn test_size_bound_limits_key_results() {
    let result = profile(&common::order_lines(), 1, 2).unwrap();
    assert_eq!(result.key_results.len(), 5);
    assert!(result
        .key_results
        .iter()
        .all(|row| !row.columns_label.contains(',')));
    assert!(result.key_results.iter().all(|row| row.key_type_label.is_empty()));
}

#[test]
fn test_profile_is_idempotent() {
    for dataset in [common::order_lines(), common::mixed_with_nulls()] {
        let first = profile(&dataset, 3, 2).unwrap();
        let second = profile(&dataset, 3, 2).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_tables_cover_every_column() {
    for dataset in [
        common::customers(),
        common::line_items(),
        common::all_null_with_unique(),
        common::order_lines(),
        common::mixed_with_nulls(),
    ] {
        let result = profile(&dataset, 2, 2).unwrap();
        let covered: HashSet<&str> = result
            .normalized_tables
            .iter()
            .flat_map(|table| table.attributes.iter().map(String::as_str))
            .collect();
        let expected: HashSet<&str> = result.columns.iter().map(String::as_str).collect();
        assert_eq!(covered, expected);
    }
}

#[test]
fn test_synthetic_table_when_no_key_overlaps() {
    let result = profile(&common::all_null_with_unique(), 2, 2).unwrap();
    assert_eq!(result.normalized_tables.len(), 1);
    assert_eq!(result.normalized_tables[0].primary_key_label, "id");
    assert_eq!(result.normalized_tables[0].attributes, vec!["missing", "id"]);

    let pruned = SchemaProfiler::new()
        .profile(&common::all_null_with_unique())
        .unwrap()
        .to_result();
    // No dependencies, so every column is left for the candidate key table.
    assert_eq!(pruned.normalized_tables.len(), 1);
    assert_eq!(pruned.normalized_tables[0].primary_key_label, "id");

    let dataset = Dataset::new(vec![
        Column::new("a", vec![1, 1, 2, 2]),
        Column::new("b", vec![1, 2, 1, 2]),
        Column::new("c", vec![5, 5, 5, 6]),
    ])
    .unwrap();
    let result = profile(&dataset, 1, 1).unwrap();
    assert_eq!(result.normalized_tables.len(), 1);
    assert_eq!(
        result.normalized_tables[0].primary_key_label,
        "surrogate_id (suggested)"
    );
    assert_eq!(result.normalized_tables[0].attributes, vec!["a", "b", "c"]);
}

#[test]
fn test_invalid_bounds_are_rejected() {
    let dataset = common::order_lines();
    assert!(profile(&dataset, 0, 2).unwrap_err().is_configuration());
    assert!(profile(&dataset, 2, 0).unwrap_err().is_configuration());
}

#[test]
fn test_bounds_are_echoed() {
    let result = profile(&common::line_items(), 3, 1).unwrap();
    assert_eq!(result.max_combination_size, 3);
    assert_eq!(result.max_lhs_size, 1);
    assert_eq!(result.n_rows, 10);
    assert_eq!(result.columns, vec!["quantity", "unit_price", "total_price"]);
}

#[test]
fn test_profile_from_record_batch() {
    let batch = RecordBatch::try_from_iter(vec![
        (
            "id",
            Arc::new(Int64Array::from(vec![1, 2, 3, 4])) as ArrayRef,
        ),
        (
            "group",
            Arc::new(StringArray::from(vec![Some("a"), Some("a"), None, None])) as ArrayRef,
        ),
        (
            "active",
            Arc::new(BooleanArray::from(vec![true, true, false, false])) as ArrayRef,
        ),
        (
            "score",
            Arc::new(Float64Array::from(vec![Some(1.0), None, Some(1.0), None])) as ArrayRef,
        ),
    ])
    .unwrap();

    let dataset = Dataset::from_record_batch(&batch).unwrap();
    let result = profile(&dataset, 2, 1).unwrap();

    let pairs = fd_pairs(&result);
    assert!(pairs.contains(&("group", "active")));
    assert!(pairs.contains(&("active", "group")));
    assert_eq!(key_label(&result, "id"), Some("★ Candidate Key"));
    assert_eq!(key_label(&result, "group, score"), Some("★ Candidate Key"));
}
