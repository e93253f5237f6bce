use {
    crate::{
        channel::normalize_name,
        pattern::{Pattern, DEFAULT_FORMAT},
        Channel, ChannelRegistry, ConsoleSink, ConsoleTarget, Level, LogSinkError, Sink,
    },
    std::sync::Arc,
};

/// Raw logger name used when none is configured.
pub const DEFAULT_NAME: &str = "My Own Logger";

/// Normalize a raw logger name, rejecting names that end up empty.
pub(crate) fn check_name(raw: &str) -> Result<String, LogSinkError> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Err(LogSinkError::invalid_value("name", "must not be empty or only whitespace"));
    }
    Ok(name)
}

/// Provides a fluent interface for configuring a named logger.
///
/// Building a logger attaches a console sink plus every added sink to the
/// channel named after the normalized logger name. Two loggers built with the
/// same name share one channel, and the second one's sinks are added to the
/// first one's; nothing is replaced or deduplicated.
///
/// # Examples
///
/// ```rust
/// use logsink::{ChannelRegistry, Level, LogSinkBuilder};
///
/// let registry = ChannelRegistry::new();
/// let logger = LogSinkBuilder::new(&registry)
///     .name("My New Logger")
///     .level(Level::Debug)
///     .build()
///     .unwrap();
/// assert_eq!(logger.name(), "my_new_logger");
/// logger.log("service started");
/// ```
#[derive(Debug)]
pub struct LogSinkBuilder<'r> {
    registry: &'r ChannelRegistry,
    name: String,
    level: i64,
    format: String,
    sinks: Vec<Sink>,
    console_target: ConsoleTarget,
}

impl<'r> LogSinkBuilder<'r> {
    /// Create a builder registering into `registry`. Every builder starts
    /// with its own empty sink list.
    pub fn new(registry: &'r ChannelRegistry) -> Self {
        LogSinkBuilder {
            registry,
            name: DEFAULT_NAME.to_string(),
            level: Level::default().number(),
            format: DEFAULT_FORMAT.to_string(),
            sinks: Vec::new(),
            console_target: ConsoleTarget::default(),
        }
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Set the channel threshold, also used by the console sink.
    pub fn level(self, level: impl Into<i64>) -> Self {
        Self {
            level: level.into(),
            ..self
        }
    }

    /// Set the console sink's format pattern.
    pub fn format(self, format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..self
        }
    }

    /// Add one sink after those already added.
    pub fn sink(mut self, sink: impl Into<Sink>) -> Self {
        self.sinks.push(sink.into());
        self
    }

    /// Add several sinks, keeping their order.
    pub fn sinks<I, S>(mut self, sinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Sink>,
    {
        self.sinks.extend(sinks.into_iter().map(Into::into));
        self
    }

    /// Choose the stream of the console sink. Defaults to stderr.
    pub fn console_target(self, console_target: ConsoleTarget) -> Self {
        Self { console_target, ..self }
    }

    /// Check every option without touching the registry.
    pub fn validate(&self) -> Result<(), LogSinkError> {
        self.validated().map(|_| ())
    }

    fn validated(&self) -> Result<(String, Level, Pattern), LogSinkError> {
        let name = check_name(&self.name)?;
        let level = Level::try_from(self.level)?;
        let pattern = Pattern::new(&self.format);
        Ok((name, level, pattern))
    }

    /// Validate the options, then register the console sink and the added
    /// sinks on the named channel.
    pub fn build(self) -> Result<LogSinkConfig, LogSinkError> {
        let (name, level, pattern) = self.validated()?;

        let console: Sink = ConsoleSink::new(level, pattern.clone())
            .with_target(self.console_target)
            .into();
        let mut attached = Vec::with_capacity(self.sinks.len() + 1);
        attached.push(console);
        attached.extend(self.sinks.iter().cloned());
        let channel = self.registry.configure(&name, level, &attached);

        Ok(LogSinkConfig {
            name,
            level,
            pattern,
            sinks: self.sinks,
            channel,
        })
    }
}

/// A configured logger: a handle on its channel plus the options it was
/// built with.
#[derive(Debug, Clone)]
pub struct LogSinkConfig {
    name: String,
    level: Level,
    pattern: Pattern,
    sinks: Vec<Sink>,
    channel: Arc<Channel>,
}

impl LogSinkConfig {
    pub fn builder(registry: &ChannelRegistry) -> LogSinkBuilder<'_> {
        LogSinkBuilder::new(registry)
    }

    /// The normalized name, also the channel's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn format(&self) -> &str {
        self.pattern.as_str()
    }

    /// The sinks this logger was built with, console sink excluded.
    ///
    /// This is not the channel's live sink list, which also holds console
    /// sinks and sinks added by other loggers of the same name.
    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    /// Emit `message` at `INFO`.
    pub fn log(&self, message: &str) {
        self.channel.log(Level::Info, message);
    }

    /// Emit `message` at `level`.
    pub fn log_at(&self, level: Level, message: &str) {
        self.channel.log(level, message);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::ErrorKind};

    #[test]
    fn defaults() {
        let registry = ChannelRegistry::new();
        let logger = LogSinkBuilder::new(&registry).build().unwrap();
        assert_eq!(logger.name(), "my_own_logger");
        assert_eq!(logger.level(), Level::Info);
        assert_eq!(logger.format(), "%(asctime)s - %(name)s - %(levelname)s - %(message)s");
        assert!(logger.sinks().is_empty());
        assert_eq!(logger.channel().sink_count(), 1);
    }

    #[test]
    fn whitespace_name_is_rejected_before_registration() {
        let registry = ChannelRegistry::new();
        let err = LogSinkBuilder::new(&registry).name("   ").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(registry.names().is_empty());
    }

    #[test]
    fn invalid_level_is_rejected_before_registration() {
        let registry = ChannelRegistry::new();
        for level in [1, 11, 42] {
            let err = LogSinkBuilder::new(&registry).name("x").level(level).build().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value);
        }
        assert!(registry.get("x").is_none());
    }

    #[test]
    fn each_builder_starts_with_no_sinks() {
        let registry = ChannelRegistry::new();
        let first = LogSinkBuilder::new(&registry)
            .name("a")
            .sink(ConsoleSink::new(Level::Info, Pattern::default()))
            .build()
            .unwrap();
        let second = LogSinkBuilder::new(&registry).name("b").build().unwrap();
        assert_eq!(first.sinks().len(), 1);
        assert!(second.sinks().is_empty());
    }
}
