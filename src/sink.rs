use {
    crate::{
        pattern::{Pattern, Record},
        Channel, Level, RotatingFileSinkConfig,
    },
    std::io::{self, Write as _},
};

/// Stream a console sink writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Writes rendered records to stdout or stderr.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    target: ConsoleTarget,
    level: Level,
    pattern: Pattern,
}

impl ConsoleSink {
    pub fn new(level: Level, pattern: Pattern) -> Self {
        ConsoleSink {
            target: ConsoleTarget::default(),
            level,
            pattern,
        }
    }

    pub fn with_target(self, target: ConsoleTarget) -> Self {
        Self { target, ..self }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn format(&self) -> &str {
        self.pattern.as_str()
    }

    fn emit(&self, record: &Record<'_>) {
        if record.level < self.level {
            return;
        }
        let line = self.pattern.render(record);
        // Console failures (closed pipe, detached terminal) are dropped.
        let _ = match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            ConsoleTarget::Stderr => io::stderr().lock().write_all(line.as_bytes()),
        };
    }
}

/// A destination attached to a channel.
#[derive(Debug, Clone)]
pub enum Sink {
    Console(ConsoleSink),
    RotatingFile(RotatingFileSinkConfig),
}

impl Sink {
    /// Attach this sink to `channel`, after any sinks already attached.
    pub fn attach(&self, channel: &Channel) {
        channel.attach(self.clone());
    }

    /// Minimum severity this sink writes.
    pub fn level(&self) -> Level {
        match self {
            Sink::Console(console) => console.level(),
            Sink::RotatingFile(file) => file.level(),
        }
    }

    pub fn format(&self) -> &str {
        match self {
            Sink::Console(console) => console.format(),
            Sink::RotatingFile(file) => file.format(),
        }
    }

    pub(crate) fn emit(&self, record: &Record<'_>) {
        match self {
            Sink::Console(console) => console.emit(record),
            Sink::RotatingFile(file) => file.emit(record),
        }
    }
}

impl From<ConsoleSink> for Sink {
    fn from(console: ConsoleSink) -> Self {
        Sink::Console(console)
    }
}

impl From<RotatingFileSinkConfig> for Sink {
    fn from(file: RotatingFileSinkConfig) -> Self {
        Sink::RotatingFile(file)
    }
}
