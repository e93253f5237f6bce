use {
    crate::{LogSinkError, RotationUnit},
    chrono::{format::StrftimeItems, DateTime, FixedOffset, Utc},
    std::{
        fs,
        io::{self, Write as _},
        path::{Path, PathBuf},
    },
};

/// Metadata for a time-rotating file.
/// Everything here is fixed once the file is opened.
#[derive(Debug, Clone)]
pub(crate) struct RollerMeta {
    /// The path of the active log file.
    pub(crate) path: PathBuf,
    /// The rotation granularity.
    pub(crate) unit: RotationUnit,
    /// Number of units between rotations, at least 1.
    pub(crate) interval: u32,
    /// Timestamp pattern for rotated file names. `None` uses the unit's
    /// default pattern.
    pub(crate) suffix_pattern: Option<String>,
    /// Extension appended after the timestamp suffix of rotated files.
    pub(crate) extension: Option<String>,
    /// Offset used for rotation boundaries and rotated file names.
    pub(crate) time_zone: FixedOffset,
}

impl RollerMeta {
    /// Get the current time in the configured time zone.
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.time_zone)
    }

    fn suffix_pattern(&self) -> &str {
        self.suffix_pattern.as_deref().unwrap_or_else(|| self.unit.default_suffix())
    }

    /// Get the path a file covering the period starting at `period_start` is
    /// rotated to.
    ///
    /// The name is `<path>.<suffix>`, followed by `.<extension>` when one is
    /// configured. An extension that already starts with a dot is appended
    /// as is.
    fn rotated_path(&self, period_start: &DateTime<FixedOffset>) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".");
        name.push(period_start.format(self.suffix_pattern()).to_string());
        if let Some(extension) = &self.extension {
            if !extension.starts_with('.') {
                name.push(".");
            }
            name.push(extension);
        }
        PathBuf::from(name)
    }

    /// Create (or open for appending) the log file.
    /// Missing parent directories are created first.
    fn create_log_file(&self) -> Result<fs::File, LogSinkError> {
        let log_path = self.path.as_path();
        let mut open_options = fs::OpenOptions::new();
        open_options.append(true).create(true);

        let mut create_log_file_res = open_options.open(log_path);
        if create_log_file_res.is_err() {
            if let Some(parent) = log_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|err| LogSinkError::CreateDirectoryFailed(parent.to_path_buf(), err.to_string()))?;
                create_log_file_res = open_options.open(log_path);
            }
        }

        create_log_file_res.map_err(|err| LogSinkError::CreateFileFailed(log_path.to_path_buf(), err.to_string()))
    }
}

/// Reject suffix patterns chrono cannot render.
pub(crate) fn validate_suffix_pattern(pattern: &str) -> Result<(), LogSinkError> {
    if pattern.is_empty() {
        return Err(LogSinkError::invalid_value("suffix_pattern", "must not be empty"));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, chrono::format::Item::Error)) {
        return Err(LogSinkError::invalid_value(
            "suffix_pattern",
            format!("'{pattern}' contains an invalid strftime directive"),
        ));
    }
    Ok(())
}

/// A log file that is renamed aside and reopened on time boundaries.
///
/// The active file always lives at the configured path. When a write arrives
/// at or after the next rollover time, the active file is renamed to
/// `<path>.<timestamp>[.<extension>]` where the timestamp is the start of the
/// period it covered, and a fresh file is opened at the original path.
///
/// `TimedRotatingFile` implements [`io::Write`], so it can also be used as a
/// plain appender, e.g. behind `tracing_appender::non_blocking`.
#[derive(Debug)]
pub struct TimedRotatingFile {
    meta: RollerMeta,
    next_rollover: DateTime<FixedOffset>,
    file: fs::File,
}

impl TimedRotatingFile {
    /// Open the file and compute the first rollover time.
    ///
    /// When the file already exists, the schedule starts at its modification
    /// time, so a file left over from an earlier run is rotated on the first
    /// write if its period has already ended.
    pub(crate) fn open(meta: RollerMeta) -> Result<Self, LogSinkError> {
        let existing = fs::metadata(&meta.path).and_then(|m| m.modified()).ok();
        let file = meta.create_log_file()?;
        let base = existing
            .map(|modified| DateTime::<Utc>::from(modified).with_timezone(&meta.time_zone))
            .unwrap_or_else(|| meta.now());
        let next_rollover = meta.unit.next_rollover(meta.interval, base)?;
        tracing::debug!(path = %meta.path.display(), %next_rollover, "opened rotating log file");
        Ok(TimedRotatingFile {
            meta,
            next_rollover,
            file,
        })
    }

    /// The path of the active log file.
    pub fn path(&self) -> &Path {
        &self.meta.path
    }

    /// The time at or after which the next write rotates the file.
    pub fn next_rollover(&self) -> DateTime<FixedOffset> {
        self.next_rollover
    }

    /// The path the active file will be renamed to at the next rollover.
    pub fn next_rotated_path(&self) -> PathBuf {
        self.meta
            .rotated_path(&(self.next_rollover - self.meta.unit.period(self.meta.interval)))
    }

    /// Write one rendered record, rotating first if its period has ended.
    pub(crate) fn write_record(&mut self, record: &[u8]) -> Result<(), LogSinkError> {
        let now = self.meta.now();
        self.write_record_at(record, now)
    }

    /// Write one rendered record, rotating first if `now` is past the
    /// rollover time.
    ///
    /// A failed rotation is reported on stderr and postponed to the next
    /// boundary. The record still goes to the file that is currently open.
    pub(crate) fn write_record_at(&mut self, record: &[u8], now: DateTime<FixedOffset>) -> Result<(), LogSinkError> {
        self.roll_over_or_postpone(now);
        self.file.write_all(record)?;
        Ok(())
    }

    fn roll_over_or_postpone(&mut self, now: DateTime<FixedOffset>) {
        if let Err(err) = self.roll_over_if_due_at(now) {
            eprintln!("Failed to roll over log file '{}': {}", self.meta.path.display(), err);
            let period = self.meta.unit.period(self.meta.interval);
            while self.next_rollover <= now {
                self.next_rollover += period;
            }
        }
    }

    /// Rotate the file if `now` has reached the rollover time.
    /// # Returns
    /// The path the old file was renamed to, if a rotation happened and the
    /// active file still existed.
    pub fn roll_over_if_due_at(&mut self, now: DateTime<FixedOffset>) -> Result<Option<PathBuf>, LogSinkError> {
        if now < self.next_rollover {
            return Ok(None);
        }
        self.roll_over(now)
    }

    fn roll_over(&mut self, now: DateTime<FixedOffset>) -> Result<Option<PathBuf>, LogSinkError> {
        let period = self.meta.unit.period(self.meta.interval);
        let rotated_path = self.meta.rotated_path(&(self.next_rollover - period));

        self.file.flush()?;

        let renamed = if self.meta.path.exists() {
            if rotated_path.exists() {
                fs::remove_file(&rotated_path)?;
            }
            fs::rename(&self.meta.path, &rotated_path).map_err(|err| LogSinkError::RenameFileError {
                from: self.meta.path.clone(),
                to: rotated_path.clone(),
                error: err.to_string(),
            })?;
            Some(rotated_path)
        } else {
            None
        };

        // Only swap the handle once the new file exists.
        self.file = self.meta.create_log_file()?;

        let mut next_rollover = self.meta.unit.next_rollover(self.meta.interval, now)?;
        while next_rollover <= now {
            next_rollover += period;
        }
        self.next_rollover = next_rollover;

        tracing::debug!(
            path = %self.meta.path.display(),
            rotated = ?renamed,
            %next_rollover,
            "rolled over log file"
        );
        Ok(renamed)
    }
}

impl io::Write for TimedRotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let now = self.meta.now();
        self.roll_over_or_postpone(now);
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
