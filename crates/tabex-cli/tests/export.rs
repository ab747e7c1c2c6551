//! Integration tests for schema files and the export pipeline.

use std::fs;
use std::path::Path;

use tabex_cli::config::load_registry;
use tabex_cli::pipeline::{ColumnSummary, OutputTarget, describe_models, run_export};
use tabex_core::{ExportOptions, ModelName};
use tempfile::TempDir;

const SCHEMA: &str = r#"{
  "models": [
    {
      "name": "Appointment",
      "records": "data/appointments.json",
      "fields": [
        ["Patient", "patient"],
        ["Seen By", {"template": "Dr. {doctor}"}],
        ["Minutes", "minutes"],
        ["Source", "import"]
      ]
    },
    {
      "name": "GroupSession",
      "records": "data/sessions.json",
      "fields": [["Topic", "topic"]]
    }
  ]
}"#;

const APPOINTMENTS: &str = r#"[
  {"patient": "Smith, Jane", "doctor": "Who", "minutes": 30, "clinic": "north"},
  {"patient": "Doe", "minutes": 45, "clinic": "south"},
  {"patient": "Roe", "doctor": "Lee", "minutes": 15, "clinic": "north"}
]"#;

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().expect("parent dir")).expect("create dir");
    fs::write(path, contents).expect("write fixture");
}

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "schema.json", SCHEMA);
    write(dir.path(), "data/appointments.json", APPOINTMENTS);
    write(dir.path(), "data/sessions.json", r#"[{"topic": "Intake"}]"#);
    dir
}

#[test]
fn loads_every_model() {
    let dir = fixture();
    let registry = load_registry(&dir.path().join("schema.json")).expect("load schema");

    let models: Vec<&str> = registry.models().map(ModelName::as_str).collect();
    assert_eq!(models, vec!["Appointment", "GroupSession"]);
    let sessions = registry.get("GroupSession").expect("sessions schema");
    assert_eq!(sessions.partial_name(), "group_sessions");
}

#[test]
fn exports_to_stdout_with_placeholders() {
    let dir = fixture();
    let registry = load_registry(&dir.path().join("schema.json")).expect("load schema");

    let outcome = run_export(
        &registry,
        "Appointment",
        ExportOptions::new(),
        &OutputTarget::Stdout,
    )
    .expect("export succeeds");

    assert_eq!(outcome.rows, 3);
    assert_eq!(outcome.columns, 4);
    assert_eq!(
        outcome.data.as_deref(),
        Some(
            "Patient,Seen By,Minutes,Source\n\
             \"Smith, Jane\",Dr. Who,30,import\n\
             Doe,Error getting field value,45,import\n\
             Roe,Dr. Lee,15,import\n"
        )
    );
}

#[test]
fn writes_named_file_with_filters() {
    let dir = fixture();
    let registry = load_registry(&dir.path().join("schema.json")).expect("load schema");
    let out = dir.path().join("out");
    let options = ExportOptions::new().with("clinic", "north").with("limit", "1");

    let outcome = run_export(
        &registry,
        "Appointment",
        options,
        &OutputTarget::Directory(out.clone()),
    )
    .expect("export succeeds");

    let path = outcome.path.expect("file written");
    assert!(path.starts_with(&out));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("utf8 name");
    assert!(name.starts_with("Appointments-"), "{name}");
    assert!(name.ends_with(".csv"), "{name}");
    assert_eq!(outcome.file_type, "text/csv");
    assert_eq!(
        fs::read_to_string(&path).expect("read export"),
        "Patient,Seen By,Minutes,Source\n\"Smith, Jane\",Dr. Who,30,import\n"
    );
}

#[test]
fn unknown_model_fails() {
    let dir = fixture();
    let registry = load_registry(&dir.path().join("schema.json")).expect("load schema");

    let err = run_export(
        &registry,
        "Invoice",
        ExportOptions::new(),
        &OutputTarget::Stdout,
    )
    .expect_err("unknown model");

    assert!(format!("{err:#}").contains("unknown export model 'Invoice'"));
}

#[test]
fn missing_records_file_fails_export() {
    let dir = fixture();
    fs::remove_file(dir.path().join("data/sessions.json")).expect("remove records");
    let registry = load_registry(&dir.path().join("schema.json")).expect("load schema");

    let err = run_export(
        &registry,
        "GroupSession",
        ExportOptions::new(),
        &OutputTarget::Stdout,
    )
    .expect_err("records file is gone");

    assert!(format!("{err:#}").contains("read records"));
}

#[test]
fn fields_must_be_an_ordered_sequence() {
    let dir = TempDir::new().expect("temp dir");
    write(
        dir.path(),
        "schema.json",
        r#"{"models": [{"name": "Appointment", "records": "a.json", "fields": {"Patient": "patient"}}]}"#,
    );

    let err = load_registry(&dir.path().join("schema.json")).expect_err("object fields");

    let message = format!("{err:#}");
    assert!(message.contains("register model Appointment"), "{message}");
    assert!(message.contains("fields must be an ordered sequence"), "{message}");
}

#[test]
fn describes_registered_columns() {
    let dir = fixture();
    write(
        dir.path(),
        "schema.json",
        r#"{"models": [
            {"name": "Visit", "records": "data/sessions.json",
             "fields": [["Topic", "topic"], ["Label", {"template": "Re: {topic}"}], ["Weight", 3]]},
            {"name": "GroupSession", "records": "data/sessions.json", "fields": [["Topic", "topic"]]}
        ]}"#,
    );
    let registry = load_registry(&dir.path().join("schema.json")).expect("load schema");

    let column = |model: &str, partial: &str, header: &str, resolver: &str| ColumnSummary {
        model: model.to_string(),
        partial_name: partial.to_string(),
        header: header.to_string(),
        resolver: resolver.to_string(),
    };
    assert_eq!(
        describe_models(&registry),
        vec![
            column("GroupSession", "group_sessions", "Topic", "\"topic\""),
            column("Visit", "visits", "Topic", "\"topic\""),
            column("Visit", "visits", "Label", "computed"),
            column("Visit", "visits", "Weight", "literal 3"),
        ]
    );
}
