use {
    logsink::{config, ChannelRegistry, ErrorKind, Level, RotationUnit},
    std::fs,
};

#[test]
fn loads_loggers_and_sinks_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let app_log = dir.path().join("logs").join("app.log");
    let document = format!(
        r#"
[[loggers]]
name = "My App"
level = 10
format = "%(levelname)s %(message)s"

[[loggers.sinks]]
filename = "{}"
rotation_unit = "midnight"
interval = 2
level = 30
format = "%(name)s:%(message)s"
extension = "txt"
suffix_pattern = "%Y%m%d"

[[loggers]]
name = "audit"
"#,
        app_log.display().to_string().replace('\\', "\\\\")
    );
    let registry = ChannelRegistry::new();
    let loggers = config::load_str(&registry, &document).unwrap();

    assert_eq!(loggers.len(), 2);
    assert_eq!(loggers[0].name(), "my_app");
    assert_eq!(loggers[0].level(), Level::Debug);
    assert_eq!(loggers[1].name(), "audit");
    assert_eq!(loggers[1].level(), Level::Info);
    assert_eq!(registry.names(), vec!["audit".to_string(), "my_app".to_string()]);

    let logsink::Sink::RotatingFile(file) = &loggers[0].sinks()[0] else {
        panic!("expected a rotating file sink");
    };
    assert_eq!(file.rotation_unit(), RotationUnit::Midnight);
    assert_eq!(file.interval(), 2);
    assert_eq!(file.extension(), Some("txt"));
    assert!(app_log.exists());

    loggers[0].log("below the file threshold");
    loggers[0].log_at(Level::Warning, "written");
    assert_eq!(fs::read_to_string(&app_log).unwrap(), "my_app:written\n");
}

#[test]
fn an_invalid_sink_prevents_every_side_effect() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let document = format!(
        r#"
[[loggers]]
name = "ok"

[[loggers.sinks]]
filename = "{}"

[[loggers]]
name = "bad"

[[loggers.sinks]]
filename = "second.log"
interval = 0
"#,
        first.display().to_string().replace('\\', "\\\\")
    );
    let registry = ChannelRegistry::new();
    let err = config::load_str(&registry, &document).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert!(!first.exists());
    assert!(registry.names().is_empty());
}

#[test]
fn load_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.toml");
    fs::write(&path, "[[loggers]]\nname = 'From File'\nlevel = 40\n").unwrap();
    let registry = ChannelRegistry::new();
    let loggers = config::load_file(&registry, &path).unwrap();
    assert_eq!(loggers[0].name(), "from_file");
    assert_eq!(loggers[0].level(), Level::Error);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ChannelRegistry::new();
    let err = config::load_file(&registry, dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn file_sink_from_table_builds_a_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.log");
    let mut table = toml::Table::new();
    table.insert("filename".into(), toml::Value::String(path.display().to_string()));
    table.insert("rotation_unit".into(), toml::Value::String("w6".into()));
    let sink = config::file_sink_from_table(&table).unwrap();
    assert_eq!(sink.rotation_unit().as_str(), "W6");
    assert!(path.exists());
}
