use late_fees::core::ConfigProvider;
use late_fees::{FeesError, FeesPipeline, LocalStorage, OutputFormat, ReportEngine, ReportOrder, TomlConfig};
use std::path::Path;
use tempfile::TempDir;

const SAMPLE: &str = include_str!("../data/book_returns_short.csv");

fn setup(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn toml_config(output: &str, format: &str, order: &str) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[report]
name = "integration"

[input]
path = "returns.csv"

[output]
path = "{}"
format = "{}"
order = "{}"
"#,
        output, format, order
    ))
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_report_with_local_storage() {
    let temp_dir = TempDir::new().unwrap();
    setup(temp_dir.path(), "returns.csv", SAMPLE);

    let config = toml_config("out/book_fees.csv", "csv", "first_seen");
    let storage = LocalStorage::new(temp_dir.path());
    let engine = ReportEngine::new(FeesPipeline::new(storage, config));

    let output_path = engine.run().await.unwrap();
    assert!(output_path.ends_with("book_fees.csv"));

    let written = std::fs::read_to_string(temp_dir.path().join("out/book_fees.csv")).unwrap();
    assert_eq!(
        written,
        "patron_id,late_fees\n\
         17-873-8783,2.25\n\
         83-279-0036,2.50\n\
         28-224-0454,0.25\n\
         41-279-4458,0.00\n"
    );
}

#[tokio::test]
async fn test_sorted_json_report() {
    let temp_dir = TempDir::new().unwrap();
    setup(temp_dir.path(), "returns.csv", SAMPLE);

    let config = toml_config("book_fees.json", "json", "patron_id");
    assert_eq!(config.output_format(), OutputFormat::Json);
    assert_eq!(config.report_order(), ReportOrder::PatronId);

    let engine = ReportEngine::new(FeesPipeline::new(LocalStorage::new(temp_dir.path()), config));
    engine.run().await.unwrap();

    let written = std::fs::read(temp_dir.path().join("book_fees.json")).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&written).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r["patron_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["17-873-8783", "28-224-0454", "41-279-4458", "83-279-0036"]);
    assert_eq!(rows[3]["late_fees"], "2.50");
}

#[tokio::test]
async fn test_malformed_row_leaves_previous_report_untouched() {
    let temp_dir = TempDir::new().unwrap();
    setup(
        temp_dir.path(),
        "returns.csv",
        "patron_id,date_checkout,date_due,date_returned\n\
         p1,01/01/2018,01/15/2018,01/19/2018\n\
         p2,01/01/2018,01/15/2018,19/01/2018\n",
    );
    setup(temp_dir.path(), "book_fees.csv", "previous report\n");

    let config = toml_config("book_fees.csv", "csv", "first_seen");
    let engine = ReportEngine::new(FeesPipeline::new(LocalStorage::new(temp_dir.path()), config));

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, FeesError::DateFormatError { line: Some(3), .. }));

    let existing = std::fs::read_to_string(temp_dir.path().join("book_fees.csv")).unwrap();
    assert_eq!(existing, "previous report\n");
}

#[tokio::test]
async fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = toml_config("book_fees.csv", "csv", "first_seen");
    let engine = ReportEngine::new(FeesPipeline::new(LocalStorage::new(temp_dir.path()), config));

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, FeesError::IoError(_)));
    assert!(!temp_dir.path().join("book_fees.csv").exists());
}
