//! # logsink
//!
//! logsink validates the configuration of named log channels and wires it
//! into live sinks. Every logger gets a console sink, and can carry any
//! number of **time-rotating file sinks** that move the active file aside on
//! second, minute, hour, day, weekday or midnight boundaries. Rotated files
//! are named with a timestamp suffix and an optional extension.
//!
//! Channels live in an explicit [`ChannelRegistry`]. Building two loggers with
//! the same (normalized) name attaches both sets of sinks to the same channel.
//!
//! Every option is validated before anything happens: a rejected
//! configuration creates no file and registers no channel.
//!
//! ## Example
//!
//! ```rust
//! use logsink::{ChannelRegistry, Level, LogSinkBuilder, RotatingFileSinkBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = std::env::temp_dir().join("logsink-doc-crate");
//!     let registry = ChannelRegistry::new();
//!
//!     let file = RotatingFileSinkBuilder::new(dir.join("app.log"))
//!         .rotation_unit("M") // New file every 5 minutes
//!         .interval(5)
//!         .level(Level::Debug)
//!         .suffix_pattern("%Y%m%d-%H%M") // Rotated as app.log.20250401-1955
//!         .build()?;
//!
//!     let logger = LogSinkBuilder::new(&registry)
//!         .name("My App")
//!         .level(Level::Debug)
//!         .format("%(asctime)s %(levelname)s %(message)s")
//!         .sink(file)
//!         .build()?;
//!
//!     logger.log("This is an info message");
//!     logger.log_at(Level::Warning, "This is a warning message");
//!     assert_eq!(registry.channel("my_app").sink_count(), 2);
//!
//!     Ok(())
//! }
//! ```
//!
//! Loggers can also be described in TOML and loaded with
//! [`config::load_str`] or [`config::load_file`].

mod channel;
pub mod config;
mod error;
mod file;
mod level;
mod logger;
mod pattern;
mod roller;
mod rotation;
mod sink;

pub use {
    channel::{normalize_name, Channel, ChannelRegistry},
    error::{ErrorKind, LogSinkError},
    file::{RotatingFileSinkBuilder, RotatingFileSinkConfig, DEFAULT_FILENAME, DEFAULT_ROTATION_UNIT},
    level::Level,
    logger::{LogSinkBuilder, LogSinkConfig, DEFAULT_NAME},
    pattern::{Pattern, Record, DEFAULT_FORMAT},
    roller::TimedRotatingFile,
    rotation::{RotationUnit, TimeZone},
    sink::{ConsoleSink, ConsoleTarget, Sink},
};
