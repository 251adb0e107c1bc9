//! Integration tests for file-based projection runs

use std::fs;
use std::path::PathBuf;

use orion_projector::{
    run, ExtractionMode, FieldSchema, OutputEscaping, ProjectorError, RecordProjector, RunConfig,
    render_line,
};
use tempfile::TempDir;

const SCHEMA_KEYS: [&str; 11] = [
    "SourceIP",
    "Port",
    "Traffic",
    "Packets",
    "Bytes",
    "UniqueDests",
    "UniqueDest24s",
    "ASN",
    "Prefix",
    "TCP",
    "ICMP",
];

fn config_in(dir: &TempDir, input: &str) -> RunConfig {
    let input_path = dir.path().join("input.json");
    fs::write(&input_path, input).unwrap();

    RunConfig {
        input: input_path,
        output: dir.path().join("output.json"),
        ..RunConfig::default()
    }
}

fn output_lines(config: &RunConfig) -> Vec<String> {
    fs::read_to_string(&config.output)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn test_projects_reference_records() {
    let dir = TempDir::new().unwrap();
    let config = config_in(
        &dir,
        "{\"SourceIP\": \"10.0.0.1\", \"Port\": 443, \"Traffic\": 7200, \"ASN\": 64512}\n\
         {\"SourceIP\" \"10.0.0.2\"}\n",
    );

    let stats = run(&config).unwrap();
    let lines = output_lines(&config);

    assert_eq!(stats.lines, 2);
    assert_eq!(
        lines,
        vec![
            r#"{"SourceIP":"10.0.0.1","Port":443,"Traffic":7200,"Packets":0,"Bytes":0,"UniqueDests":0,"UniqueDest24s":0,"ASN":64512,"Prefix":"","TCP":"","ICMP":""}"#,
            r#"{"SourceIP":"","Port":0,"Traffic":0,"Packets":0,"Bytes":0,"UniqueDests":0,"UniqueDest24s":0,"ASN":0,"Prefix":"","TCP":"","ICMP":""}"#,
        ]
    );
}

#[test]
fn test_full_record_keeps_schema_order() {
    let dir = TempDir::new().unwrap();
    let config = config_in(
        &dir,
        r#"{"ICMP": "", "TCP": "SYN", "Prefix": "198.51.100.0/24", "ASN": 13335, "UniqueDest24s": 12, "UniqueDests": 310, "Bytes": 5120, "Packets": 80, "Traffic": 12, "Port": 23, "SourceIP": "198.51.100.9", "Country": "AU", "Lat": -33.8}"#,
    );

    run(&config).unwrap();
    let lines = output_lines(&config);

    assert_eq!(
        lines[0],
        r#"{"SourceIP":"198.51.100.9","Port":23,"Traffic":12,"Packets":80,"Bytes":5120,"UniqueDests":310,"UniqueDest24s":12,"ASN":13335,"Prefix":"198.51.100.0/24","TCP":"SYN","ICMP":""}"#
    );
}

#[test]
fn test_every_line_has_every_key_once_in_order() {
    let dir = TempDir::new().unwrap();
    let input = [
        r#"{"Port": 80}"#,
        "",
        "garbage without braces",
        r#"{"SourceIP": "203.0.113.4", "Packets": "abc123", "Bytes": -12}"#,
        r#"{"TCP": "ACK,PSH", "ICMP": "echo"}"#,
    ]
    .join("\n");
    let config = config_in(&dir, &input);

    let stats = run(&config).unwrap();
    let lines = output_lines(&config);

    assert_eq!(stats.lines, 5);
    assert_eq!(lines.len(), 5);

    for line in &lines {
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(line).unwrap();
        let keys: Vec<&str> = parsed.keys().map(|k| k.as_str()).collect();
        let mut sorted_expected = SCHEMA_KEYS.to_vec();
        sorted_expected.sort();
        let mut sorted_keys = keys.clone();
        sorted_keys.sort();
        assert_eq!(sorted_keys, sorted_expected);

        // textual order, since the parsed map does not keep it
        let positions: Vec<usize> = SCHEMA_KEYS
            .iter()
            .map(|k| line.find(&format!("\"{}\":", k)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    let fourth: serde_json::Value = serde_json::from_str(&lines[3]).unwrap();
    assert_eq!(fourth["Packets"], 0);
    assert_eq!(fourth["Bytes"], -12);
    assert_eq!(fourth["SourceIP"], "203.0.113.4");

    // the comma ends the capture
    let fifth: serde_json::Value = serde_json::from_str(&lines[4]).unwrap();
    assert_eq!(fifth["TCP"], "ACK");
    assert_eq!(fifth["ICMP"], "echo");
}

#[test]
fn test_reprojection_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let config = config_in(
        &dir,
        "{\"SourceIP\": \"10.0.0.1\", \"Port\": 443, \"TCP\": \"SYN\"}\n{}\n",
    );
    run(&config).unwrap();
    let first = fs::read_to_string(&config.output).unwrap();

    let second_config = RunConfig {
        input: config.output.clone(),
        output: dir.path().join("second.json"),
        ..RunConfig::default()
    };
    run(&second_config).unwrap();
    let second = fs::read_to_string(&second_config.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_long_values_are_truncated() {
    let dir = TempDir::new().unwrap();
    let long_ip = "1".repeat(100);
    let config = config_in(
        &dir,
        &format!(
            r#"{{"SourceIP": "{}", "TCP": "SYN-ACK-FIN-RST-PSH-URG", "Port": 123456789012345678901234567890}}"#,
            long_ip
        ),
    );

    run(&config).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output_lines(&config)[0]).unwrap();

    assert_eq!(parsed["SourceIP"], "1".repeat(63));
    assert_eq!(parsed["TCP"], "SYN-ACK-FIN-RST");
    assert_eq!(parsed["Port"], i64::MAX);
}

#[test]
fn test_missing_input_fails_without_creating_output() {
    let dir = TempDir::new().unwrap();
    let config = RunConfig {
        input: dir.path().join("does-not-exist.json"),
        output: dir.path().join("output.json"),
        ..RunConfig::default()
    };

    let err = run(&config).unwrap_err();

    assert!(matches!(err, ProjectorError::OpenInput { .. }));
    assert!(err.to_string().contains("does-not-exist.json"));
    assert!(!config.output.exists());
}

#[test]
fn test_uncreatable_output_fails() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir, "{}\n");
    config.output = dir.path().join("missing-dir").join("output.json");

    let err = run(&config).unwrap_err();

    assert!(matches!(err, ProjectorError::CreateOutput { .. }));
}

#[test]
fn test_yaml_schema_and_json_escaping() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("schema.yaml");
    fs::write(
        &schema_path,
        "fields:\n  - key: Country\n    kind: string\n    max_len: 8\n  - key: Port\n    kind: integer\n",
    )
    .unwrap();

    let mut config = config_in(&dir, "{\"Port\": 22, \"Country\": N\\Z}\n");
    config.schema_path = Some(schema_path);
    config.escaping = OutputEscaping::Json;

    run(&config).unwrap();

    assert_eq!(output_lines(&config), vec![r#"{"Country":"N\\Z","Port":22}"#]);
}

#[test]
fn test_structural_mode_run() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(
        &dir,
        "{\"Label\": \"Port\", \"Count\": 7, \"Port\": 443}\n{\"SourceIP\" \"10.0.0.2\"}\n",
    );
    config.mode = ExtractionMode::Structural;

    let stats = run(&config).unwrap();
    let lines = output_lines(&config);

    assert_eq!(stats.lines, 2);
    assert!(lines[0].contains("\"Port\":443,"));
    assert_eq!(
        lines[1],
        render_line(&RecordProjector::default().project(""), OutputEscaping::Raw).unwrap()
    );
}

#[test]
fn test_default_config_uses_orion_schema() {
    let config = RunConfig::default();

    assert_eq!(config.load_schema().unwrap(), FieldSchema::orion());
    assert_eq!(config.input, PathBuf::from("Data/orion-pipeline-2025-01-20.00.json"));
}

#[test]
fn test_shipped_schema_matches_builtin() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/orion_schema.yaml");

    assert_eq!(FieldSchema::load_from_file(path).unwrap(), FieldSchema::orion());
}
