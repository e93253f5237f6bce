//! `%(field)s` format patterns.
//!
//! A pattern is stored verbatim and only interpreted when a record is
//! rendered. Recognized placeholders are replaced, everything else (including
//! unknown placeholders) is copied through unchanged.

use {
    crate::Level,
    chrono::{DateTime, Local},
    once_cell::sync::Lazy,
    regex::Regex,
};

/// Pattern used when none is configured.
pub const DEFAULT_FORMAT: &str = "%(asctime)s - %(name)s - %(levelname)s - %(message)s";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%\((?P<key>[A-Za-z_]+)\)(?P<conv>[sdf])|%%").expect("Invalid placeholder regex")
});

/// A single log event on its way to the sinks.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    /// Normalized name of the channel that emitted the record.
    pub channel: &'a str,
    pub level: Level,
    pub message: &'a str,
    pub created: DateTime<Local>,
}

impl<'a> Record<'a> {
    pub fn new(channel: &'a str, level: Level, message: &'a str) -> Self {
        Record {
            channel,
            level,
            message,
            created: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AscTime,
    Created,
    Name,
    LevelName,
    LevelNo,
    Message,
    Process,
    ThreadName,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "asctime" => Field::AscTime,
            "created" => Field::Created,
            "name" => Field::Name,
            "levelname" => Field::LevelName,
            "levelno" => Field::LevelNo,
            "message" => Field::Message,
            "process" => Field::Process,
            "threadName" => Field::ThreadName,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A compiled format pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a pattern. Any string is accepted; unknown placeholders
    /// render verbatim.
    pub fn new(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            literal.push_str(&source[last..whole.start()]);
            last = whole.end();

            match caps.name("key").and_then(|key| Field::from_key(key.as_str())) {
                Some(field) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                None if whole.as_str() == "%%" => literal.push('%'),
                None => literal.push_str(whole.as_str()),
            }
        }
        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Pattern {
            source: source.to_string(),
            segments,
        }
    }

    /// The pattern exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render a record as one line, newline included.
    pub fn render(&self, record: &Record<'_>) -> String {
        let mut line = String::with_capacity(self.source.len() + record.message.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Field(Field::AscTime) => {
                    line.push_str(&record.created.format("%Y-%m-%d %H:%M:%S,%3f").to_string())
                }
                Segment::Field(Field::Created) => {
                    line.push_str(&format!("{:.6}", record.created.timestamp_micros() as f64 / 1e6))
                }
                Segment::Field(Field::Name) => line.push_str(record.channel),
                Segment::Field(Field::LevelName) => line.push_str(record.level.name()),
                Segment::Field(Field::LevelNo) => line.push_str(&record.level.number().to_string()),
                Segment::Field(Field::Message) => line.push_str(record.message),
                Segment::Field(Field::Process) => line.push_str(&std::process::id().to_string()),
                Segment::Field(Field::ThreadName) => {
                    line.push_str(std::thread::current().name().unwrap_or("unnamed"))
                }
            }
        }
        line.push('\n');
        line
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern {
            source: DEFAULT_FORMAT.to_string(),
            segments: vec![
                Segment::Field(Field::AscTime),
                Segment::Literal(" - ".to_string()),
                Segment::Field(Field::Name),
                Segment::Literal(" - ".to_string()),
                Segment::Field(Field::LevelName),
                Segment::Literal(" - ".to_string()),
                Segment::Field(Field::Message),
            ],
        }
    }
}
