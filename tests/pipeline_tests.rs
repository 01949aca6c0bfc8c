//! Pipeline integration tests
//!
//! Tests the full flow: event log → provenance export → partition
//! extraction → classification, through both the library API and the CLI.

use clap::Parser;
use pbix_lineage::classify::enrich_partitions;
use pbix_lineage::cli::{Cli, Runner};
use pbix_lineage::eventlog::{parse_log_file, EventLog, EventRecord, MemorySink};
use pbix_lineage::export::{export_provenance, ProvenanceTable};
use pbix_lineage::partition::extract_partitions;
use pbix_lineage::{PartitionType, RunId, UNKNOWN_SOURCE};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const EXCEL_EXPRESSION: &str = r#"let Source = Excel.Workbook(File.Contents("C:\data.xlsx")), S = Source{[Item="Sales"]}[Data] in S"#;

const SUMMARY_LINE: &str = r#"20240131_0915 : what="extract", file="C:\in\Report.pbix", name="Report.pbix", output="C:\out\Report_ab12""#;

fn write_model_document(output: &Path, run: &str, document: &Value) {
    let model_dir = output.join(run).join("Model");
    fs::create_dir_all(&model_dir).unwrap();
    fs::write(
        model_dir.join("database.json"),
        serde_json::to_string_pretty(document).unwrap(),
    )
    .unwrap();
}

fn excel_document() -> Value {
    json!({
        "model": {
            "tables": [{
                "name": "Sales",
                "partitions": [{
                    "name": "Sales-1",
                    "mode": "import",
                    "source": { "expression": EXCEL_EXPRESSION }
                }]
            }]
        }
    })
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Library API
// ============================================================================

#[test]
fn test_library_pipeline_end_to_end() {
    let dir = TempDir::new().unwrap();
    let output = dir.path();

    fs::write(output.join("summary_log.txt"), format!("{SUMMARY_LINE}\n")).unwrap();
    write_model_document(output, "Report_ab12", &excel_document());

    let sink = MemorySink::new();
    let records = parse_log_file(output.join("summary_log.txt"), &sink).unwrap();
    assert_eq!(records.len(), 1);
    assert!(sink.error_messages().is_empty());

    let provenance = export_provenance(
        records,
        output.join("summary_log.csv"),
        output.join("summary_log.json"),
    )
    .unwrap();
    assert_eq!(provenance.len(), 1);

    let partitions = extract_partitions(output, "Model/database.json", &sink).unwrap();
    assert_eq!(partitions.len(), 1);

    let enriched = enrich_partitions(&partitions, &provenance);
    assert_eq!(enriched.len(), 1);

    let record = &enriched[0];
    assert_eq!(record.run_id, RunId::new("Report_ab12"));
    assert_eq!(record.source_file_name, "Report.pbix");
    assert_eq!(record.source_full_path, r"C:\in\Report.pbix");
    assert_eq!(record.name.as_deref(), Some("Sales-1"));
    assert_eq!(record.mode.as_deref(), Some("import"));
    assert_eq!(record.partition_type, PartitionType::Excel);
    assert_eq!(record.source_location.as_deref(), Some(r"C:\data.xlsx"));
    assert_eq!(record.source_object_name.as_deref(), Some("Sales"));
}

#[test]
fn test_corrupt_lines_are_skipped_and_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary_log.txt");
    fs::write(
        &path,
        format!("{SUMMARY_LINE}\nthis is not a record\n{SUMMARY_LINE}\n"),
    )
    .unwrap();

    let sink = MemorySink::new();
    let records = parse_log_file(&path, &sink).unwrap();

    assert_eq!(records.len(), 2);
    let errors = sink.error_messages();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("line 2"));
}

#[test]
fn test_unknown_run_resolves_to_sentinel() {
    let dir = TempDir::new().unwrap();
    let output = dir.path();
    write_model_document(output, "Orphan_00ff", &excel_document());

    let sink = MemorySink::new();
    let partitions = extract_partitions(output, "Model/database.json", &sink).unwrap();
    let enriched = enrich_partitions(&partitions, &ProvenanceTable::default());

    assert_eq!(enriched.len(), 1);
    assert_eq!(enriched[0].source_file_name, UNKNOWN_SOURCE);
    assert_eq!(enriched[0].source_full_path, UNKNOWN_SOURCE);
    assert_eq!(enriched[0].partition_type, PartitionType::Excel);
}

#[test]
fn test_written_log_round_trips_through_parser() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::open(
        dir.path(),
        "summary_log.txt",
        "extraction_log.txt",
        "error_log.txt",
    )
    .unwrap()
    .with_clock(|| "20240131_0915".to_string());

    let written = log
        .record_action("extract", r"C:\in\Report.pbix", r"C:\out\Report_ab12")
        .unwrap();

    let sink = MemorySink::new();
    let parsed = parse_log_file(log.records_path(), &sink).unwrap();
    assert_eq!(parsed, vec![written]);
    assert_eq!(
        parsed[0],
        EventRecord::at(
            "20240131_0915",
            "extract",
            r"C:\in\Report.pbix",
            r"C:\out\Report_ab12"
        )
    );
}

// ============================================================================
// CLI
// ============================================================================

#[tokio::test]
async fn test_cli_run_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let output = dir.path();

    fs::write(
        output.join("summary_log.txt"),
        format!("{SUMMARY_LINE}\ngarbage\n"),
    )
    .unwrap();
    write_model_document(output, "Report_ab12", &excel_document());

    let cli = Cli::parse_from([
        "pbix-lineage",
        "-o",
        output.to_str().unwrap(),
        "run",
        "--format",
        "csv",
    ]);
    Runner::new(cli).run().await.unwrap();

    let provenance = read_json(&output.join("summary_log.json"));
    assert_eq!(provenance.as_array().unwrap().len(), 1);
    assert_eq!(provenance[0]["name"], "Report.pbix");

    let partitions = read_json(&output.join("partition_summary.json"));
    assert_eq!(partitions[0]["pbix"], "Report_ab12");

    let classified = read_json(&output.join("partition_classified.json"));
    assert_eq!(classified.as_array().unwrap().len(), 1);
    assert_eq!(classified[0]["partition_type"], "excel");
    assert_eq!(classified[0]["sheet_table_location"], r"C:\data.xlsx");
    assert_eq!(classified[0]["sheet_table_name"], "Sales");
    assert_eq!(classified[0]["pbix_file_name"], "Report.pbix");

    let csv = fs::read_to_string(output.join("partition_classified.csv")).unwrap();
    assert!(csv.starts_with("pbix_file_name,pbix_full_path,pbix,"));

    // The corrupt line lands in the error log, not in the records
    let errors = fs::read_to_string(output.join("error_log.txt")).unwrap();
    assert!(errors.contains("garbage"));
    let summary = fs::read_to_string(output.join("summary_log.txt")).unwrap();
    assert!(!summary.contains("ERROR"));
}

#[tokio::test]
async fn test_cli_run_survives_undecodable_log_line() {
    let dir = TempDir::new().unwrap();
    let output = dir.path();

    let mut log = format!("{SUMMARY_LINE}\n").into_bytes();
    log.extend_from_slice(b"20240131_0916 : what=\"extract\", file=\"\xE9t\xE9.pbix\", name=\"\xE9t\xE9.pbix\", output=\"o\"\n");
    fs::write(output.join("summary_log.txt"), log).unwrap();
    write_model_document(output, "Report_ab12", &excel_document());

    Runner::new(Cli::parse_from([
        "pbix-lineage",
        "-o",
        output.to_str().unwrap(),
        "run",
    ]))
    .run()
    .await
    .unwrap();

    let provenance = read_json(&output.join("summary_log.json"));
    assert_eq!(provenance.as_array().unwrap().len(), 1);
    let classified = read_json(&output.join("partition_classified.json"));
    assert_eq!(classified[0]["pbix_file_name"], "Report.pbix");

    let errors = fs::read_to_string(output.join("error_log.txt")).unwrap();
    assert!(errors.contains("Failed to parse line 2"));
}

#[tokio::test]
async fn test_cli_classify_corrupt_partition_summary_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path();
    fs::write(output.join("partition_summary.json"), "{ not json").unwrap();

    let err = Runner::new(Cli::parse_from([
        "pbix-lineage",
        "-o",
        output.to_str().unwrap(),
        "classify",
    ]))
    .run()
    .await
    .unwrap_err();

    assert!(err.to_string().starts_with("Invalid partition summary"));
}

#[tokio::test]
async fn test_cli_classify_without_provenance_uses_sentinel() {
    let dir = TempDir::new().unwrap();
    let output = dir.path();
    write_model_document(output, "Report_ab12", &excel_document());

    let out = output.to_str().unwrap();
    Runner::new(Cli::parse_from(["pbix-lineage", "-o", out, "partitions"]))
        .run()
        .await
        .unwrap();
    Runner::new(Cli::parse_from(["pbix-lineage", "-o", out, "classify"]))
        .run()
        .await
        .unwrap();

    let classified = read_json(&output.join("partition_classified.json"));
    assert_eq!(classified[0]["pbix_file_name"], UNKNOWN_SOURCE);
    assert_eq!(classified[0]["pbix_full_path"], UNKNOWN_SOURCE);

    let errors = fs::read_to_string(output.join("error_log.txt")).unwrap();
    assert!(errors.contains("Provenance table unavailable"));
}

#[tokio::test]
async fn test_cli_export_on_fresh_output_area() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("fresh");

    Runner::new(Cli::parse_from([
        "pbix-lineage",
        "-o",
        out.to_str().unwrap(),
        "export",
    ]))
    .run()
    .await
    .unwrap();

    // Opening the log creates an empty record stream
    assert!(out.join("summary_log.txt").exists());
    let provenance = read_json(&out.join("summary_log.json"));
    assert_eq!(provenance, json!([]));
    let csv = fs::read_to_string(out.join("summary_log.csv")).unwrap();
    assert_eq!(csv, "datetime,what,file,name,output\r\n");
}

#[tokio::test]
async fn test_cli_reset_clears_output_area() {
    let dir = TempDir::new().unwrap();
    let output = dir.path();
    write_model_document(output, "Report_ab12", &excel_document());
    fs::write(output.join("summary_log.txt"), SUMMARY_LINE).unwrap();

    Runner::new(Cli::parse_from([
        "pbix-lineage",
        "-o",
        output.to_str().unwrap(),
        "reset",
    ]))
    .run()
    .await
    .unwrap();

    assert!(output.exists());
    assert_eq!(fs::read_dir(output).unwrap().count(), 0);
}
