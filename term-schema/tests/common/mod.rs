//! Shared datasets for integration tests.

#![allow(dead_code)]

use term_schema::dataset::{Column, Dataset, Value};

/// Twenty customers, one order each; names repeat across customers.
pub fn customers() -> Dataset {
    let ids: Vec<i64> = (1..=20).collect();
    let names: Vec<String> = ids.iter().map(|id| format!("name_{}", id % 7)).collect();
    let amounts: Vec<f64> = ids.iter().map(|id| (id * 37 % 11) as f64 * 10.0).collect();
    Dataset::new(vec![
        Column::new("customer_id", ids),
        Column::new("customer_name", names),
        Column::new("order_amount", amounts),
    ])
    .unwrap()
}

/// `total_price = quantity * unit_price`, with pairs repeating across rows.
pub fn line_items() -> Dataset {
    let quantity = vec![1, 2, 3, 1, 2, 3, 1, 2, 1, 3];
    let unit_price = vec![10, 10, 10, 20, 20, 20, 10, 10, 20, 10];
    let total_price: Vec<i64> = quantity
        .iter()
        .zip(&unit_price)
        .map(|(q, p)| (q * p) as i64)
        .collect();
    Dataset::new(vec![
        Column::new("quantity", quantity),
        Column::new("unit_price", unit_price),
        Column::new("total_price", total_price),
    ])
    .unwrap()
}

/// A column of nulls next to an otherwise unique column.
pub fn all_null_with_unique() -> Dataset {
    Dataset::new(vec![
        Column::new("missing", vec![Value::Null; 5]),
        Column::new("id", vec![1, 2, 3, 4, 5]),
    ])
    .unwrap()
}

/// An order-lines table with a composite key and a transitive dependency.
pub fn order_lines() -> Dataset {
    Dataset::new(vec![
        Column::new("order_id", vec![1, 1, 2, 2, 3, 3]),
        Column::new("line", vec![1, 2, 1, 2, 1, 2]),
        Column::new("customer", vec!["ann", "ann", "bob", "bob", "ann", "ann"]),
        Column::new("city", vec!["Oslo", "Oslo", "Rome", "Rome", "Oslo", "Oslo"]),
        Column::new("product", vec!["pen", "ink", "pen", "cap", "ink", "pen"]),
    ])
    .unwrap()
}

/// Mixed types with nulls and no single-column key.
pub fn mixed_with_nulls() -> Dataset {
    Dataset::new(vec![
        Column::new("a", vec![Some(1), None, Some(1), None, Some(2), Some(2)]),
        Column::new(
            "b",
            vec![Some("x"), Some("x"), None, None, Some("y"), Some("y")],
        ),
        Column::new("c", vec![true, true, false, false, true, false]),
        Column::new(
            "d",
            vec![Some(0.5), Some(0.5), Some(1.5), None, Some(2.5), Some(2.5)],
        ),
    ])
    .unwrap()
}
