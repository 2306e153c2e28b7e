//! CSV ingestion through to formatted output.

use std::io::Write;

use tempfile::NamedTempFile;
use term_schema::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, MarkdownFormatter, ResultFormatter,
};
use term_schema::prelude::*;
use term_schema::sources::{load_csv, CsvOptions};

const ORDERS_CSV: &str = "\
order_id,customer_id,customer_name,city,amount
1,10,Ann,Oslo,25.5
2,10,Ann,Oslo,12.0
3,20,Bob,Rome,25.5
4,30,Cid,,8.25
5,20,Bob,Rome,12.0
6,30,Cid,,99.0
";

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_profile_end_to_end() {
    let file = write_csv(ORDERS_CSV);
    let dataset = load_csv(file.path(), &CsvOptions::default()).unwrap();
    assert_eq!(dataset.n_rows(), 6);
    assert_eq!(dataset.column("city").unwrap().values()[3], Value::Null);

    let result = profile(&dataset, 2, 1).unwrap();

    assert_eq!(result.key_results[0].columns_label, "order_id");
    assert_eq!(result.key_results[0].key_type_label, "★ Candidate Key");

    let pairs: Vec<(&str, &str)> = result
        .fd_results
        .iter()
        .map(|fd| (fd.lhs_label.as_str(), fd.rhs_label.as_str()))
        .collect();
    assert!(pairs.contains(&("customer_id", "customer_name")));
    assert!(pairs.contains(&("customer_id", "city")));
    // Null cities form one group, so city still determines the customer.
    assert!(pairs.contains(&("city", "customer_id")));

    // The unique order_id determines every other column.
    assert!(pairs.contains(&("order_id", "amount")));
    let orders = &result.normalized_tables[0];
    assert_eq!(orders.primary_key_label, "order_id");
    assert_eq!(orders.attributes.len(), 5);

    let customers = &result.normalized_tables[1];
    assert_eq!(customers.primary_key_label, "customer_id");
    assert_eq!(
        customers.attributes,
        vec!["customer_id", "customer_name", "city"]
    );
}

#[test]
fn test_csv_tab_delimited() {
    let file = write_csv("a\tb\n1\tx\n2\tx\n3\ty\n");
    let options = CsvOptions {
        delimiter: b'\t',
        ..Default::default()
    };
    let dataset = load_csv(file.path(), &options).unwrap();
    let result = profile(&dataset, 2, 2).unwrap();
    assert_eq!(result.columns, vec!["a", "b"]);
    assert!(result
        .key_results
        .iter()
        .any(|row| row.columns_label == "a" && row.key_type_label == "★ Candidate Key"));
}

#[test]
fn test_formatted_outputs() {
    let file = write_csv(ORDERS_CSV);
    let dataset = load_csv(file.path(), &CsvOptions::default()).unwrap();
    let result = profile(&dataset, 2, 2).unwrap();

    let json = JsonFormatter::new().format(&result).unwrap();
    let parsed: ProfileResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);

    let human = HumanFormatter::with_config(FormatterConfig::default().with_colors(false))
        .format(&result)
        .unwrap();
    assert!(human.contains(
        "Analyzed 6 rows × 5 columns; key combos up to size 2, FDs up to LHS size 2"
    ));
    assert!(human.contains("customer_id → customer_name"));

    let markdown = MarkdownFormatter::new().format(&result).unwrap();
    assert!(markdown.contains("| order_id | 6 | 100.00% | ★ Candidate Key |"));
}
