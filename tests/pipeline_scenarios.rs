//! End-to-end scenarios through [`run_pipeline`].

use std::fs;
use std::path::Path;

use unique_extract::config::{ExtractorConfig, OutputFormat, RowFormat};
use unique_extract::error::ExtractError;
use unique_extract::pipeline::{load_table, run_pipeline};

fn config(input: &str, output: &Path, field: &str) -> ExtractorConfig {
    ExtractorConfig::new(format!("tests/fixtures/{input}"), output, field)
}

#[test]
fn filtered_multi_rows_are_numerically_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ids.csv");
    let mut cfg = config("people.csv", &out, "id");
    cfg.filters = vec!["status=active".to_string()];
    cfg.row_format = RowFormat::Multi;

    let summary = run_pipeline(&cfg, None).unwrap();
    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_after_filter, 2);
    assert_eq!(summary.unique_count, 2);
    assert_eq!(fs::read_to_string(&out).unwrap(), "id\n1\n3\n");
}

#[test]
fn single_layout_joins_values_and_tags_filters() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ids.csv");
    let mut cfg = config("people.csv", &out, "id");
    cfg.filters = vec!["status=active".to_string()];

    run_pipeline(&cfg, None).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "id,filters\n1;3,status=active\n"
    );
}

#[test]
fn multi_valued_cells_are_exploded() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("contacts.csv");
    let mut cfg = config("contacts.csv", &out, "contact_ids");
    cfg.row_format = RowFormat::Multi;

    let summary = run_pipeline(&cfg, None).unwrap();
    // "a;b;a" and "c" explode into {a, b, c}.
    assert_eq!(summary.unique_count, 3);
    assert_eq!(fs::read_to_string(&out).unwrap(), "contact_ids\na\nb\nc\n");
}

#[test]
fn non_numeric_cell_under_comparison_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ages.csv");
    fs::write(&input, "name,age\nada,31\nbob,thirty\n").unwrap();
    let out = dir.path().join("out.csv");

    let mut cfg = ExtractorConfig::new(&input, &out, "name");
    cfg.filters = vec!["age>30".to_string()];

    let err = run_pipeline(&cfg, None).unwrap_err();
    assert!(matches!(err, ExtractError::NumericConversion { .. }));
    assert_eq!(err.exit_code(), 3);
    assert!(!out.exists());
}

#[test]
fn dry_run_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never.csv");
    let mut cfg = config("people.csv", &out, "email");
    cfg.dry_run = true;

    run_pipeline(&cfg, None).unwrap();
    assert!(!out.exists());
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let out_a = dir.path().join("a.json");
    let out_b = dir.path().join("b.json");

    let mut cfg = config("people.csv", &out_a, "email");
    cfg.output_format = OutputFormat::Json;
    cfg.row_format = RowFormat::Multi;
    run_pipeline(&cfg, None).unwrap();

    cfg.output_file = out_b.clone();
    run_pipeline(&cfg, None).unwrap();

    assert_eq!(fs::read(&out_a).unwrap(), fs::read(&out_b).unwrap());
}

#[test]
fn unknown_filter_field_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let mut cfg = config("people.csv", &out, "id");
    cfg.filters = vec!["statuz=active".to_string()];

    let err = run_pipeline(&cfg, None).unwrap_err();
    assert!(matches!(err, ExtractError::FieldNotFound { .. }));
    assert!(!out.exists());
}

#[test]
fn column_name_override_renames_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let mut cfg = config("people.csv", &out, "email");
    cfg.column_name = Some("contact".to_string());
    cfg.row_format = RowFormat::Multi;

    run_pipeline(&cfg, None).unwrap();
    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("contact\n"));
}

#[test]
fn load_table_supports_the_prompt_boundary() {
    let cfg = config("people.csv", Path::new("unused.csv"), "id");
    let t = load_table(&cfg).unwrap();
    assert_eq!(t.column_names().len(), 3);
    assert_eq!(
        t.distinct_raw_values("email").unwrap(),
        vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "c@x.com".to_string()
        ]
    );
}
