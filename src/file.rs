use {
    crate::{
        pattern::{Pattern, Record, DEFAULT_FORMAT},
        roller::{validate_suffix_pattern, RollerMeta, TimedRotatingFile},
        Level, LogSinkError, RotationUnit, TimeZone,
    },
    std::{
        path::{Path, PathBuf},
        sync::{Arc, Mutex, PoisonError},
    },
};

/// File name used when none is configured.
pub const DEFAULT_FILENAME: &str = "log";
/// Rotation unit used when none is configured.
pub const DEFAULT_ROTATION_UNIT: &str = "H";

pub(crate) fn check_filename(filename: &Path) -> Result<(), LogSinkError> {
    if filename.as_os_str().is_empty() {
        return Err(LogSinkError::invalid_value("filename", "must not be empty"));
    }
    Ok(())
}

pub(crate) fn check_interval(interval: i64) -> Result<u32, LogSinkError> {
    if interval < 1 {
        return Err(LogSinkError::invalid_value(
            "interval",
            format!("must be at least 1, got {interval}"),
        ));
    }
    u32::try_from(interval).map_err(|_| LogSinkError::invalid_value("interval", format!("{interval} is too large")))
}

/// Provides a fluent interface for configuring a rotating file sink.
///
/// Nothing is validated or created until [`build`](Self::build) is called.
/// `build` checks every option first and only then opens the file, so a
/// rejected configuration never touches the filesystem.
///
/// # Default Configuration
///
/// * File `log` in the working directory
/// * Hourly rotation (`H`), interval 1
/// * Level `INFO`
/// * Format `%(asctime)s - %(name)s - %(levelname)s - %(message)s`
/// * No extension, default timestamp suffix for the unit
/// * Local time zone
///
/// # Examples
///
/// ```rust
/// use logsink::{Level, RotatingFileSinkBuilder};
///
/// let dir = std::env::temp_dir().join("logsink-doc-file");
/// let sink = RotatingFileSinkBuilder::new(dir.join("app.log"))
///     .rotation_unit("midnight")
///     .interval(1)
///     .level(Level::Debug)
///     .extension("txt") // Rotated names: app.log.2025-04-01.txt
///     .build()
///     .unwrap();
/// assert_eq!(sink.rotation_unit().as_str(), "MIDNIGHT");
/// assert!(dir.join("app.log").exists());
/// ```
#[derive(Debug, Clone)]
pub struct RotatingFileSinkBuilder {
    filename: PathBuf,
    rotation_unit: String,
    interval: i64,
    level: i64,
    format: String,
    extension: Option<String>,
    suffix_pattern: Option<String>,
    time_zone: TimeZone,
}

/// Options that passed validation, ready to open the file.
struct ValidatedFileSink {
    filename: PathBuf,
    rotation_unit: RotationUnit,
    interval: u32,
    level: Level,
    pattern: Pattern,
    extension: Option<String>,
    suffix_pattern: Option<String>,
}

impl Default for RotatingFileSinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FILENAME)
    }
}

impl RotatingFileSinkBuilder {
    /// Create a new builder for the file at `filename`.
    pub fn new<P: AsRef<Path>>(filename: P) -> Self {
        RotatingFileSinkBuilder {
            filename: filename.as_ref().to_path_buf(),
            rotation_unit: DEFAULT_ROTATION_UNIT.to_string(),
            interval: 1,
            level: Level::default().number(),
            format: DEFAULT_FORMAT.to_string(),
            extension: None,
            suffix_pattern: None,
            time_zone: TimeZone::default(),
        }
    }

    /// Set the rotation unit: `S`, `M`, `H`, `D`, `W0`-`W6` or `MIDNIGHT`,
    /// in any casing.
    pub fn rotation_unit(self, rotation_unit: impl Into<String>) -> Self {
        Self {
            rotation_unit: rotation_unit.into(),
            ..self
        }
    }

    /// Set the number of units between rotations. Must be at least 1.
    pub fn interval(self, interval: impl Into<i64>) -> Self {
        Self {
            interval: interval.into(),
            ..self
        }
    }

    /// Set the minimum severity written to the file.
    pub fn level(self, level: impl Into<i64>) -> Self {
        Self {
            level: level.into(),
            ..self
        }
    }

    /// Set the format pattern of each line.
    pub fn format(self, format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..self
        }
    }

    /// Set an extension appended to rotated file names, after the timestamp.
    /// An empty extension is the same as none.
    pub fn extension(self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: (!extension.is_empty()).then_some(extension),
            ..self
        }
    }

    /// Override the strftime pattern of the rotated file timestamp.
    pub fn suffix_pattern(self, suffix_pattern: impl Into<String>) -> Self {
        Self {
            suffix_pattern: Some(suffix_pattern.into()),
            ..self
        }
    }

    /// Set the time zone for rotation boundaries and rotated file names.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self { time_zone, ..self }
    }

    /// Check every option without touching the filesystem.
    pub fn validate(&self) -> Result<(), LogSinkError> {
        self.validated().map(|_| ())
    }

    fn validated(&self) -> Result<ValidatedFileSink, LogSinkError> {
        check_filename(&self.filename)?;
        let rotation_unit: RotationUnit = self.rotation_unit.parse()?;
        let interval = check_interval(self.interval)?;
        let level = Level::try_from(self.level)?;
        let pattern = Pattern::new(&self.format);
        if let Some(suffix_pattern) = &self.suffix_pattern {
            validate_suffix_pattern(suffix_pattern)?;
        }
        Ok(ValidatedFileSink {
            filename: self.filename.clone(),
            rotation_unit,
            interval,
            level,
            pattern,
            extension: self.extension.clone(),
            suffix_pattern: self.suffix_pattern.clone(),
        })
    }

    fn open(&self, valid: &ValidatedFileSink) -> Result<TimedRotatingFile, LogSinkError> {
        TimedRotatingFile::open(RollerMeta {
            path: valid.filename.clone(),
            unit: valid.rotation_unit,
            interval: valid.interval,
            suffix_pattern: valid.suffix_pattern.clone(),
            extension: valid.extension.clone(),
            time_zone: self.time_zone.offset(),
        })
    }

    /// Validate the options and open just the rotating file, without the
    /// sink's level and format.
    ///
    /// The result is a plain [`io::Write`](std::io::Write) appender, e.g. for
    /// `tracing_appender::non_blocking`.
    pub fn build_writer(self) -> Result<TimedRotatingFile, LogSinkError> {
        let valid = self.validated()?;
        self.open(&valid)
    }

    /// Validate the options and open the file.
    ///
    /// The file (and any missing parent directory) is created immediately.
    pub fn build(self) -> Result<RotatingFileSinkConfig, LogSinkError> {
        let valid = self.validated()?;
        let roller = self.open(&valid)?;
        Ok(RotatingFileSinkConfig {
            filename: valid.filename,
            rotation_unit: valid.rotation_unit,
            interval: valid.interval,
            level: valid.level,
            pattern: valid.pattern,
            extension: valid.extension,
            suffix_pattern: valid.suffix_pattern,
            handle: Arc::new(Mutex::new(roller)),
        })
    }
}

/// A validated rotating file sink with its file already open.
///
/// Cloning shares the underlying file, so a clone attached to a channel and
/// the original write to the same file.
#[derive(Debug, Clone)]
pub struct RotatingFileSinkConfig {
    filename: PathBuf,
    rotation_unit: RotationUnit,
    interval: u32,
    level: Level,
    pattern: Pattern,
    extension: Option<String>,
    suffix_pattern: Option<String>,
    handle: Arc<Mutex<TimedRotatingFile>>,
}

impl RotatingFileSinkConfig {
    /// Start configuring a sink for `filename`.
    pub fn builder<P: AsRef<Path>>(filename: P) -> RotatingFileSinkBuilder {
        RotatingFileSinkBuilder::new(filename)
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// The rotation unit in canonical form.
    pub fn rotation_unit(&self) -> RotationUnit {
        self.rotation_unit
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn format(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// The configured suffix pattern; `None` means the unit's default.
    pub fn suffix_pattern(&self) -> Option<&str> {
        self.suffix_pattern.as_deref()
    }

    /// Shared handle to the open rotating file.
    pub fn handle(&self) -> &Arc<Mutex<TimedRotatingFile>> {
        &self.handle
    }

    pub(crate) fn emit(&self, record: &Record<'_>) {
        if record.level < self.level {
            return;
        }
        let line = self.pattern.render(record);
        let mut roller = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = roller.write_record(line.as_bytes()) {
            eprintln!("Failed to write to log file '{}': {}", self.filename.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::ErrorKind};

    #[test]
    fn defaults() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSinkBuilder::new(dir.path().join("log")).build().unwrap();
        assert_eq!(sink.rotation_unit(), RotationUnit::Hour);
        assert_eq!(sink.interval(), 1);
        assert_eq!(sink.level(), Level::Info);
        assert_eq!(sink.format(), DEFAULT_FORMAT);
        assert_eq!(sink.extension(), None);
        assert_eq!(sink.suffix_pattern(), None);
    }

    #[test]
    fn rejected_options_leave_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.log");
        let err = RotatingFileSinkBuilder::new(&path).interval(0).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(!path.exists());
    }

    #[test]
    fn empty_extension_counts_as_absent() {
        let builder = RotatingFileSinkBuilder::new("x.log").extension("");
        assert!(builder.extension.is_none());
    }

    #[test]
    fn emit_respects_sink_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");
        let sink = RotatingFileSinkBuilder::new(&path)
            .level(Level::Error)
            .format("%(levelname)s:%(message)s")
            .build()
            .unwrap();
        sink.emit(&Record::new("app", Level::Warning, "skipped"));
        sink.emit(&Record::new("app", Level::Error, "kept"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ERROR:kept\n");
    }
}
