use {
    crate::{pattern::Record, Level, Sink},
    std::{
        collections::HashMap,
        sync::{Arc, Mutex, PoisonError, RwLock},
    },
};

/// Turn a raw logger name into a channel identifier: trimmed, lower-cased,
/// spaces replaced with underscores.
///
/// Applying it twice gives the same result as applying it once.
///
/// ```
/// assert_eq!(logsink::normalize_name("  My New Logger "), "my_new_logger");
/// assert_eq!(logsink::normalize_name("my_new_logger"), "my_new_logger");
/// ```
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

struct ChannelState {
    level: Level,
    sinks: Vec<Sink>,
}

/// A named log destination with a severity threshold and an ordered list of
/// sinks.
///
/// A record is dispatched when its level is at least the channel's level; each
/// sink then applies its own threshold and pattern.
pub struct Channel {
    name: String,
    state: RwLock<ChannelState>,
}

impl Channel {
    fn new(name: String) -> Self {
        Channel {
            name,
            state: RwLock::new(ChannelState {
                level: Level::Warning,
                sinks: Vec::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The channel threshold. A channel nobody configured passes `WARNING`
    /// and above.
    pub fn level(&self) -> Level {
        self.state.read().unwrap_or_else(PoisonError::into_inner).level
    }

    pub fn set_level(&self, level: Level) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).level = level;
    }

    /// Number of attached sinks.
    pub fn sink_count(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).sinks.len()
    }

    /// Snapshot of the attached sinks, in attachment order.
    pub fn sinks(&self) -> Vec<Sink> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).sinks.clone()
    }

    pub(crate) fn attach(&self, sink: Sink) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).sinks.push(sink);
        tracing::debug!(channel = %self.name, "attached sink");
    }

    /// Emit `message` at `level` through every attached sink.
    pub fn log(&self, level: Level, message: &str) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if level < state.level {
            return;
        }
        let record = Record::new(&self.name, level, message);
        for sink in &state.sinks {
            sink.emit(&record);
        }
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

/// Registry of named channels.
///
/// A channel is created on its first lookup and lives as long as the registry.
/// Looking a name up again returns the same channel, so sinks attached through
/// different handles accumulate on it.
///
/// The registry is an ordinary value: create one at the top of the
/// application and share it (e.g. behind an `Arc`) with everything that
/// configures logging.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Mutex<HashMap<String, Arc<Channel>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the channel for `name`, creating it if needed. The name is
    /// normalized first.
    pub fn channel(&self, name: &str) -> Arc<Channel> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        Self::lookup_or_create(&mut channels, normalize_name(name))
    }

    /// Look up an existing channel without creating it.
    pub fn get(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_name(name))
            .cloned()
    }

    /// Names of all channels, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Look up or create the channel, set its level and attach `sinks`, all
    /// while holding the registry lock.
    pub(crate) fn configure(&self, name: &str, level: Level, sinks: &[Sink]) -> Arc<Channel> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let channel = Self::lookup_or_create(&mut channels, normalize_name(name));
        channel.set_level(level);
        for sink in sinks {
            sink.attach(&channel);
        }
        channel
    }

    fn lookup_or_create(channels: &mut HashMap<String, Arc<Channel>>, name: String) -> Arc<Channel> {
        channels
            .entry(name)
            .or_insert_with_key(|name| {
                tracing::debug!(channel = %name, "created channel");
                Arc::new(Channel::new(name.clone()))
            })
            .clone()
    }
}
