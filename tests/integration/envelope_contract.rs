//! Envelope contract through the public output stage: key order, JSON
//! round-trip and tabular rendering of mixed rows.

use gplay::cli::{emit, OutputOptions};
use gplay::envelope::Envelope;
use gplay::error::ClassifiedError;
use gplay::render::OutputFormat;
use serde_json::{json, Value};
use std::time::Duration;

fn options(format: OutputFormat) -> OutputOptions {
    OutputOptions {
        format,
        ..OutputOptions::default()
    }
}

#[test]
fn test_compact_json_round_trip_preserves_data_and_key_order() {
    let data = json!([
        {"reviewId": "r1", "comments": [{"userComment": {"starRating": 4}}]},
        {"reviewId": "r2", "authorName": null}
    ]);
    let envelope = Envelope::new(data.clone())
        .with_services(["androidpublisher"])
        .with_pagination("", "t2")
        .with_duration(Duration::from_millis(12));

    let rendered = emit(&envelope, &OutputOptions::default());
    assert_eq!(rendered.exit_code, 0);
    assert!(!rendered.stdout.contains('\n'));

    let data_at = rendered.stdout.find("\"data\"").unwrap();
    let error_at = rendered.stdout.find("\"error\"").unwrap();
    let meta_at = rendered.stdout.find("\"meta\"").unwrap();
    assert!(data_at < error_at && error_at < meta_at);

    let decoded: Value = serde_json::from_str(&rendered.stdout).unwrap();
    assert_eq!(decoded["data"], data);
    assert_eq!(decoded["error"], Value::Null);
    assert_eq!(decoded["meta"]["durationMs"], 12);
    assert_eq!(decoded["meta"]["pagination"]["nextToken"], "t2");
}

#[test]
fn test_pretty_json_is_indented() {
    let envelope = Envelope::new(json!({"a": 1}));
    let rendered = emit(
        &envelope,
        &OutputOptions {
            pretty: true,
            ..OutputOptions::default()
        },
    );
    assert!(rendered.stdout.starts_with("{\n  \"data\""));
}

#[test]
fn test_table_column_union() {
    let envelope = Envelope::new(json!([{"a": 1}, {"b": 2}]));
    let rendered = emit(&envelope, &options(OutputFormat::Table));
    let header = rendered.stdout.lines().nth(1).unwrap();
    assert!(header.find('a').unwrap() < header.find('b').unwrap());
}

#[test]
fn test_markdown_column_union() {
    let envelope = Envelope::new(json!([{"a": 1}, {"b": 2}]));
    let rendered = emit(&envelope, &options(OutputFormat::Markdown));
    assert_eq!(
        rendered.stdout,
        "| a | b |\n| --- | --- |\n| 1 |  |\n|  | 2 |"
    );
}

#[test]
fn test_scalar_data_renders_single_column() {
    let envelope = Envelope::new(json!(["x", "y"]));
    let rendered = emit(&envelope, &options(OutputFormat::Markdown));
    assert_eq!(rendered.stdout, "|  |\n| --- |\n| x |\n| y |");
}

#[test]
fn test_error_envelope_exit_code_and_shape() {
    let envelope = Envelope::from_error(
        ClassifiedError::rate_limited("Quota exceeded").with_http_status(429),
    )
    .with_services(["androidpublisher"]);
    let rendered = emit(&envelope, &options(OutputFormat::Markdown));
    assert_eq!(rendered.exit_code, 5);

    let decoded: Value = serde_json::from_str(&rendered.stdout).unwrap();
    assert_eq!(decoded["data"], Value::Null);
    assert_eq!(decoded["error"]["code"], "RATE_LIMITED");
    assert_eq!(decoded["error"]["httpStatus"], 429);
    assert_eq!(decoded["meta"]["services"], json!(["androidpublisher"]));
}
