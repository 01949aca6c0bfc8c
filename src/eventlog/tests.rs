//! Tests for event log module

use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

const VALID_LINE: &str = r#"20240131_0915 : what="extract", file="C:\reports\Sales.pbix", name="Sales.pbix", output="output\Sales_0a1b2c3d""#;

fn fixed_clock() -> String {
    "20240131_0915".to_string()
}

// ============================================================================
// EventRecord Tests
// ============================================================================

#[test]
fn test_record_derives_source_name() {
    let record = EventRecord::at("20240131_0915", "extract", "/data/in/Sales.pbix", "output/Sales_1");
    assert_eq!(record.source_name, "Sales.pbix");
    assert_eq!(record.run_id().as_str(), "Sales_1");
}

#[test]
fn test_record_display_is_log_line() {
    let record = EventRecord::at(
        "20240131_0915",
        "extract",
        r"C:\reports\Sales.pbix",
        r"output\Sales_0a1b2c3d",
    );
    assert_eq!(record.to_string(), VALID_LINE);
}

#[test]
fn test_record_serializes_with_provenance_names() {
    let record = parse_line(VALID_LINE).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["datetime"], "20240131_0915");
    assert_eq!(value["what"], "extract");
    assert_eq!(value["file"], r"C:\reports\Sales.pbix");
    assert_eq!(value["name"], "Sales.pbix");
    assert_eq!(value["output"], r"output\Sales_0a1b2c3d");
}

// ============================================================================
// Parser Tests
// ============================================================================

#[test]
fn test_parse_valid_line() {
    let record = parse_line(VALID_LINE).unwrap();
    assert_eq!(
        record.fields(),
        [
            "20240131_0915",
            "extract",
            r"C:\reports\Sales.pbix",
            "Sales.pbix",
            r"output\Sales_0a1b2c3d",
        ]
    );
}

#[test]
fn test_parse_tolerates_crlf() {
    let line = format!("{VALID_LINE}\r");
    assert!(parse_line(&line).is_some());
}

#[test]
fn test_parse_rejects_malformed_lines() {
    let bad = [
        "",
        "garbage",
        // short timestamp
        r#"2024013_0915 : what="extract", file="a", name="a", output="o""#,
        // missing separator spaces
        r#"20240131_0915: what="extract", file="a", name="a", output="o""#,
        // empty field
        r#"20240131_0915 : what="", file="a", name="a", output="o""#,
        // missing output
        r#"20240131_0915 : what="extract", file="a", name="a""#,
        // trailing garbage
        r#"20240131_0915 : what="extract", file="a", name="a", output="o" extra"#,
        // a progress line is not an event record
        "20240131_0915 : ERROR : something failed",
    ];
    for line in bad {
        assert!(parse_line(line).is_none(), "should reject: {line:?}");
    }
}

#[test]
fn test_parse_log_skips_corrupt_lines_and_continues() {
    let content = format!(
        "{VALID_LINE}\nnot a record\n{}\n",
        VALID_LINE.replace("Sales", "Costs")
    );
    let parsed = parse_log(&content);

    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.records[0].source_name, "Sales.pbix");
    assert_eq!(parsed.records[1].source_name, "Costs.pbix");

    assert_eq!(
        parsed.diagnostics,
        vec![LineDiagnostic {
            line_number: 2,
            line: "not a record".to_string(),
        }]
    );
}

#[test]
fn test_parse_log_one_diagnostic_per_malformed_line() {
    let content = "bad one\n\nbad two\n";
    let parsed = parse_log(content);
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.diagnostics.len(), 3);
    assert_eq!(parsed.diagnostics[2].line_number, 3);
}

#[test]
fn test_parse_log_file_reports_to_sink() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("summary_log.txt");
    fs::write(&path, format!("{VALID_LINE}\nbroken\n")).unwrap();

    let sink = MemorySink::new();
    let records = parse_log_file(&path, &sink).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(
        sink.error_messages(),
        vec!["Failed to parse line 2: broken".to_string()]
    );
}

#[test]
fn test_parse_log_file_invalid_utf8_line_is_one_diagnostic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("summary_log.txt");

    let mut content = format!("{VALID_LINE}\n").into_bytes();
    content.extend_from_slice(
        b"20240131_0916 : what=\"extract\", file=\"C:\\in\\\xE9t\xE9.pbix\", name=\"\xE9t\xE9.pbix\", output=\"o\\x_1\"\n",
    );
    content.extend_from_slice(format!("{}\n", VALID_LINE.replace("Sales", "Costs")).as_bytes());
    fs::write(&path, content).unwrap();

    let sink = MemorySink::new();
    let records = parse_log_file(&path, &sink).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source_name, "Sales.pbix");
    assert_eq!(records[1].source_name, "Costs.pbix");

    let errors = sink.error_messages();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to parse line 2:"));
}

#[test]
fn test_parse_log_bytes_line_numbers_and_crlf() {
    let mut content = format!("{VALID_LINE}\r\n").into_bytes();
    content.extend_from_slice(b"\xFF\r\n");
    let parsed = parse_log_bytes(&content);
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].line_number, 2);
}

#[test]
fn test_parse_log_file_missing() {
    let dir = tempdir().unwrap();
    let sink = MemorySink::new();
    let err = parse_log_file(dir.path().join("absent.txt"), &sink).unwrap_err();
    assert!(matches!(err, crate::Error::FileNotFound { .. }));
}

// ============================================================================
// EventLog Tests
// ============================================================================

#[test]
fn test_event_log_appends_records() {
    let dir = tempdir().unwrap();
    let log = EventLog::open(dir.path(), "summary_log.txt", "progress.txt", "errors.txt")
        .unwrap()
        .with_clock(fixed_clock);

    log.record_action("extract", r"C:\reports\Sales.pbix", r"output\Sales_0a1b2c3d")
        .unwrap();
    log.record_action("extract", "/in/Costs.pbix", "output/Costs_11111111")
        .unwrap();

    let content = fs::read_to_string(log.records_path()).unwrap();
    let parsed = parse_log(&content);
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.records.len(), 2);
    assert_eq!(content.lines().next().unwrap(), VALID_LINE);
}

#[test]
fn test_event_log_is_append_only_across_opens() {
    let dir = tempdir().unwrap();
    for _ in 0..2 {
        let log = EventLog::open(dir.path(), "s.txt", "p.txt", "e.txt")
            .unwrap()
            .with_clock(fixed_clock);
        log.record_action("extract", "/in/a.pbix", "output/a_1").unwrap();
    }
    let content = fs::read_to_string(dir.path().join("s.txt")).unwrap();
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn test_event_log_errors_mirrored_to_progress() {
    let dir = tempdir().unwrap();
    let log = EventLog::open(dir.path(), "s.txt", "p.txt", "e.txt")
        .unwrap()
        .with_clock(fixed_clock);

    log.progress("starting");
    log.error("tool missing");

    let progress = fs::read_to_string(dir.path().join("p.txt")).unwrap();
    let errors = fs::read_to_string(dir.path().join("e.txt")).unwrap();
    assert_eq!(
        progress,
        "20240131_0915 : starting\n20240131_0915 : ERROR : tool missing\n"
    );
    assert_eq!(errors, "20240131_0915 : ERROR : tool missing\n");

    // diagnostics never reach the record stream
    let records = fs::read_to_string(dir.path().join("s.txt")).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_event_log_rejects_unparseable_fields() {
    let dir = tempdir().unwrap();
    let log = EventLog::open(dir.path(), "s.txt", "p.txt", "e.txt")
        .unwrap()
        .with_clock(fixed_clock);

    for path in ["/in/a\"b.pbix", "/in/line\nbreak.pbix"] {
        let err = log.record_action("extract", path, "output/a_1").unwrap_err();
        assert!(matches!(err, crate::Error::EventLog { .. }));
    }
    assert!(log.record_action("", "/in/a.pbix", "output/a_1").is_err());

    let records = fs::read_to_string(dir.path().join("s.txt")).unwrap();
    assert!(records.is_empty());

    // a clean record still goes through
    let written = log.record_action("extract", "/in/a.pbix", "output/a_1").unwrap();
    let parsed = parse_log(&fs::read_to_string(dir.path().join("s.txt")).unwrap());
    assert_eq!(parsed.records, vec![written]);
}
