//! Loading logger and sink options from TOML.
//!
//! Options arrive untyped here, so this is where wrong kinds of values are
//! caught (`ErrorKind::Type`). A document may hold any number of loggers:
//!
//! ```toml
//! [[loggers]]
//! name = "My App"
//! level = 20
//! format = "%(levelname)s %(message)s"
//!
//! [[loggers.sinks]]
//! filename = "logs/app.log"
//! rotation_unit = "midnight"
//! interval = 1
//! extension = "txt"
//! ```
//!
//! Every option of every logger and sink is validated before the first file
//! is opened or the first channel is touched. Unrecognized keys are rejected.

use {
    crate::{
        file::{check_filename, check_interval},
        logger::check_name,
        roller::validate_suffix_pattern,
        ChannelRegistry, Level, LogSinkBuilder, LogSinkConfig, LogSinkError, RotatingFileSinkBuilder,
        RotatingFileSinkConfig, RotationUnit,
    },
    std::path::Path,
    toml::{Table, Value},
};

const LOGGER_KEYS: &[&str] = &["name", "level", "format", "sinks"];
const FILE_SINK_KEYS: &[&str] = &[
    "filename",
    "rotation_unit",
    "interval",
    "level",
    "format",
    "extension",
    "suffix_pattern",
];

fn reject_unknown_keys(table: &Table, known: &[&str]) -> Result<(), LogSinkError> {
    match table.keys().find(|key| !known.contains(&key.as_str())) {
        Some(key) => Err(LogSinkError::invalid_value(key, "unrecognized option")),
        None => Ok(()),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "a string",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Boolean(_) => "a boolean",
        Value::Datetime(_) => "a datetime",
        Value::Array(_) => "an array",
        Value::Table(_) => "a table",
    }
}

fn get_str<'t>(table: &'t Table, key: &str) -> Result<Option<&'t str>, LogSinkError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(LogSinkError::type_mismatch(key, "a string", describe(other))),
    }
}

fn get_int(table: &Table, key: &str) -> Result<Option<i64>, LogSinkError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(n)) => Ok(Some(*n)),
        Some(other) => Err(LogSinkError::type_mismatch(key, "an integer", describe(other))),
    }
}

fn get_tables<'t>(table: &'t Table, key: &str) -> Result<Vec<&'t Table>, LogSinkError> {
    match table.get(key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Table(t) => Ok(t),
                other => Err(LogSinkError::type_mismatch(key, "an array of tables", describe(other))),
            })
            .collect(),
        Some(other) => Err(LogSinkError::type_mismatch(key, "an array of tables", describe(other))),
    }
}

/// Read the options of one rotating file sink.
///
/// Each option is checked for both kind and value as it is read, in the order
/// filename, rotation unit, interval, level, format, extension, suffix
/// pattern. Nothing is opened.
pub fn file_sink_builder(table: &Table) -> Result<RotatingFileSinkBuilder, LogSinkError> {
    reject_unknown_keys(table, FILE_SINK_KEYS)?;
    let mut builder = RotatingFileSinkBuilder::default();
    if let Some(filename) = get_str(table, "filename")? {
        check_filename(Path::new(filename))?;
        builder = RotatingFileSinkBuilder::new(filename);
    }
    if let Some(rotation_unit) = get_str(table, "rotation_unit")? {
        rotation_unit.parse::<RotationUnit>()?;
        builder = builder.rotation_unit(rotation_unit);
    }
    if let Some(interval) = get_int(table, "interval")? {
        check_interval(interval)?;
        builder = builder.interval(interval);
    }
    if let Some(level) = get_int(table, "level")? {
        Level::try_from(level)?;
        builder = builder.level(level);
    }
    if let Some(format) = get_str(table, "format")? {
        builder = builder.format(format);
    }
    if let Some(extension) = get_str(table, "extension")? {
        builder = builder.extension(extension);
    }
    if let Some(suffix_pattern) = get_str(table, "suffix_pattern")? {
        validate_suffix_pattern(suffix_pattern)?;
        builder = builder.suffix_pattern(suffix_pattern);
    }
    Ok(builder)
}

/// Logger options read from a table, with its file sinks not yet opened.
struct PendingLogger<'r> {
    logger: LogSinkBuilder<'r>,
    files: Vec<RotatingFileSinkBuilder>,
}

impl<'r> PendingLogger<'r> {
    fn read(registry: &'r ChannelRegistry, table: &Table) -> Result<Self, LogSinkError> {
        reject_unknown_keys(table, LOGGER_KEYS)?;
        let mut logger = LogSinkBuilder::new(registry);
        if let Some(name) = get_str(table, "name")? {
            check_name(name)?;
            logger = logger.name(name);
        }
        if let Some(level) = get_int(table, "level")? {
            Level::try_from(level)?;
            logger = logger.level(level);
        }
        if let Some(format) = get_str(table, "format")? {
            logger = logger.format(format);
        }
        let files = get_tables(table, "sinks")?
            .into_iter()
            .map(file_sink_builder)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PendingLogger { logger, files })
    }

    fn validate(&self) -> Result<(), LogSinkError> {
        self.logger.validate()?;
        self.files.iter().try_for_each(RotatingFileSinkBuilder::validate)
    }

    fn build(self) -> Result<LogSinkConfig, LogSinkError> {
        let mut logger = self.logger;
        for file in self.files {
            logger = logger.sink(file.build()?);
        }
        logger.build()
    }
}

/// Build a rotating file sink from a table.
pub fn file_sink_from_table(table: &Table) -> Result<RotatingFileSinkConfig, LogSinkError> {
    file_sink_builder(table)?.build()
}

/// Build one logger, and its file sinks, from a table.
pub fn logger_from_table(registry: &ChannelRegistry, table: &Table) -> Result<LogSinkConfig, LogSinkError> {
    let pending = PendingLogger::read(registry, table)?;
    pending.validate()?;
    pending.build()
}

/// Build every logger of a TOML document.
pub fn load_str(registry: &ChannelRegistry, document: &str) -> Result<Vec<LogSinkConfig>, LogSinkError> {
    let root: Table = document
        .parse()
        .map_err(|err: toml::de::Error| LogSinkError::invalid_value("document", err.message().to_string()))?;
    reject_unknown_keys(&root, &["loggers"])?;

    let pending = get_tables(&root, "loggers")?
        .into_iter()
        .map(|table| PendingLogger::read(registry, table))
        .collect::<Result<Vec<_>, _>>()?;
    for logger in &pending {
        logger.validate()?;
    }
    pending.into_iter().map(PendingLogger::build).collect()
}

/// Build every logger of a TOML file.
pub fn load_file<P: AsRef<Path>>(registry: &ChannelRegistry, path: P) -> Result<Vec<LogSinkConfig>, LogSinkError> {
    let document = std::fs::read_to_string(path)?;
    load_str(registry, &document)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::ErrorKind};

    fn table(document: &str) -> Table {
        document.parse().unwrap()
    }

    #[test]
    fn wrong_value_kinds_are_type_errors() {
        for doc in [
            "filename = 1",
            "rotation_unit = ['S', 'H']",
            "interval = '1'",
            "interval = 1.5",
            "interval = [100]",
            "interval = {}",
            "level = ''",
            "level = true",
            "format = ['This format should work']",
            "extension = 1",
            "suffix_pattern = true",
        ] {
            let err = file_sink_builder(&table(doc)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type, "{doc}");
        }
    }

    #[test]
    fn unknown_keys_are_value_errors() {
        let err = file_sink_builder(&table("when = 'S'")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);

        let registry = ChannelRegistry::new();
        let err = logger_from_table(&registry, &table("handllers = []")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn logger_type_errors() {
        let registry = ChannelRegistry::new();
        for doc in ["name = 1", "level = [20]", "format = { format = 1 }", "sinks = {}", "sinks = ['log']"] {
            let err = logger_from_table(&registry, &table(doc)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type, "{doc}");
        }
        assert!(registry.names().is_empty());
    }

    #[test]
    fn malformed_document_is_rejected() {
        let registry = ChannelRegistry::new();
        let err = load_str(&registry, "[[loggers]\nname = ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn options_are_checked_in_order() {
        let cases = [
            ("rotation_unit = 'hello'\ninterval = '1'", ErrorKind::Value),
            ("rotation_unit = 'S'\ninterval = '1'\nlevel = 15", ErrorKind::Type),
            ("interval = 0\nlevel = 'x'", ErrorKind::Value),
            ("filename = ''\nrotation_unit = 1", ErrorKind::Value),
            ("level = 15\nformat = 1", ErrorKind::Value),
            ("format = 1\nsuffix_pattern = '%Q'", ErrorKind::Type),
        ];
        for (doc, kind) in cases {
            let err = file_sink_builder(&table(doc)).unwrap_err();
            assert_eq!(err.kind(), kind, "{doc}");
        }

        let registry = ChannelRegistry::new();
        let err = logger_from_table(&registry, &table("name = ' '\nlevel = 'x'")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        let err = logger_from_table(&registry, &table("level = 15\nsinks = 'log'")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(registry.names().is_empty());
    }
}
