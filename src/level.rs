use {
    crate::LogSinkError,
    std::{fmt, str::FromStr},
};

/// Severity of a record, and the threshold of a channel or sink.
///
/// Only four severities exist. The discriminants are the conventional numeric
/// levels, so `Level::try_from(20)` is `Info` and any other number outside
/// `{10, 20, 30, 40}` is rejected.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 10,
    #[default]
    Info = 20,
    Warning = 30,
    Error = 40,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Upper-case name used by the `%(levelname)s` placeholder.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    /// Numeric severity.
    pub fn number(&self) -> i64 {
        *self as i64
    }
}

impl TryFrom<i64> for Level {
    type Error = LogSinkError;

    fn try_from(value: i64) -> Result<Self, LogSinkError> {
        Level::ALL.into_iter().find(|level| level.number() == value).ok_or_else(|| {
            LogSinkError::invalid_value("level", format!("{value} is not one of DEBUG(10), INFO(20), WARNING(30), ERROR(40)"))
        })
    }
}

impl From<Level> for i64 {
    fn from(level: Level) -> Self {
        level.number()
    }
}

impl FromStr for Level {
    type Err = LogSinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Level::ALL
            .into_iter()
            .find(|level| level.name() == upper)
            .ok_or_else(|| LogSinkError::invalid_value("level", format!("'{s}' is not a severity name")))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::ErrorKind};

    #[test]
    fn accepts_the_four_severities() {
        for level in Level::ALL {
            assert_eq!(Level::try_from(level.number()).unwrap(), level);
        }
    }

    #[test]
    fn rejects_other_integers_as_value_errors() {
        for n in [-1, 0, 1, 11, 42, 50] {
            assert_eq!(Level::try_from(n).unwrap_err().kind(), ErrorKind::Value);
        }
    }

    #[test]
    fn ordering_follows_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warning);
        assert!("critical".parse::<Level>().is_err());
    }
}
