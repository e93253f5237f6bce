use {
    crate::LogSinkError,
    chrono::{DateTime, Datelike, Days, Duration, FixedOffset, Local, NaiveTime, Utc, Weekday},
    std::{fmt, str::FromStr},
};

/// The time granularity at which a rotating file sink swaps to a new file.
///
/// Parsed case-insensitively from `S`, `M`, `H`, `D`, `W0`..`W6` and
/// `MIDNIGHT`; always displayed in the canonical upper-case form.
///
/// # Examples
/// ```
/// use logsink::RotationUnit;
///
/// let unit: RotationUnit = "w2".parse().unwrap();
/// assert_eq!(unit.as_str(), "W2");
/// assert!("Minute".parse::<RotationUnit>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationUnit {
    /// Rotate every `interval` seconds.
    Second,
    /// Rotate every `interval` minutes.
    Minute,
    /// Rotate every `interval` hours.
    Hour,
    /// Rotate every `interval` days, counted from when the file was opened.
    Day,
    /// Rotate at the midnight that ends the given weekday (`W0` is Monday),
    /// then every `interval` weeks.
    Weekday(Weekday),
    /// Rotate at the next midnight, then every `interval` days.
    Midnight,
}

impl RotationUnit {
    /// Canonical upper-case spelling of the unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationUnit::Second => "S",
            RotationUnit::Minute => "M",
            RotationUnit::Hour => "H",
            RotationUnit::Day => "D",
            RotationUnit::Midnight => "MIDNIGHT",
            RotationUnit::Weekday(day) => match day {
                Weekday::Mon => "W0",
                Weekday::Tue => "W1",
                Weekday::Wed => "W2",
                Weekday::Thu => "W3",
                Weekday::Fri => "W4",
                Weekday::Sat => "W5",
                Weekday::Sun => "W6",
            },
        }
    }

    /// Timestamp pattern appended to rotated file names when no suffix
    /// pattern is configured.
    pub fn default_suffix(&self) -> &'static str {
        match self {
            RotationUnit::Second => "%Y-%m-%d_%H-%M-%S",
            RotationUnit::Minute => "%Y-%m-%d_%H-%M",
            RotationUnit::Hour => "%Y-%m-%d_%H",
            RotationUnit::Day | RotationUnit::Midnight | RotationUnit::Weekday(_) => "%Y-%m-%d",
        }
    }

    /// Length of one rotation period for the given interval.
    pub fn period(&self, interval: u32) -> Duration {
        let interval = i64::from(interval);
        match self {
            RotationUnit::Second => Duration::seconds(interval),
            RotationUnit::Minute => Duration::minutes(interval),
            RotationUnit::Hour => Duration::hours(interval),
            RotationUnit::Day | RotationUnit::Midnight => Duration::days(interval),
            RotationUnit::Weekday(_) => Duration::weeks(interval),
        }
    }

    /// Get the next rollover time after `from`.
    ///
    /// Fixed-length units simply add one period. `Midnight` and weekday units
    /// snap to the next qualifying midnight in `from`'s offset and add the
    /// remaining `interval - 1` days or weeks.
    /// # Arguments
    /// * `interval` - Number of units between rotations, at least 1.
    /// * `from` - The base datetime.
    /// # Returns
    /// The next time at which the file should be rotated.
    pub fn next_rollover(
        &self,
        interval: u32,
        from: DateTime<FixedOffset>,
    ) -> Result<DateTime<FixedOffset>, LogSinkError> {
        let extra = interval.saturating_sub(1);
        match self {
            RotationUnit::Second | RotationUnit::Minute | RotationUnit::Hour | RotationUnit::Day => {
                Ok(from + self.period(interval))
            }
            RotationUnit::Midnight => Ok(next_midnight(from)? + Duration::days(i64::from(extra))),
            RotationUnit::Weekday(day) => {
                // Rotate at the midnight that ends `day`.
                let mut midnight = next_midnight(from)?;
                while (midnight - Duration::days(1)).weekday() != *day {
                    midnight += Duration::days(1);
                }
                Ok(midnight + Duration::weeks(i64::from(extra)))
            }
        }
    }
}

/// The first midnight strictly after `from`, in `from`'s offset.
fn next_midnight(from: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>, LogSinkError> {
    from.date_naive()
        .checked_add_days(Days::new(1))
        .zip(NaiveTime::from_hms_opt(0, 0, 0))
        .map(|(date, time)| date.and_time(time))
        .and_then(|naive| naive.and_local_timezone(*from.offset()).single())
        .ok_or_else(|| LogSinkError::InternalError(format!("no midnight follows {from}")))
}

impl FromStr for RotationUnit {
    type Err = LogSinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.to_uppercase().as_str() {
            "S" => RotationUnit::Second,
            "M" => RotationUnit::Minute,
            "H" => RotationUnit::Hour,
            "D" => RotationUnit::Day,
            "MIDNIGHT" => RotationUnit::Midnight,
            "W0" => RotationUnit::Weekday(Weekday::Mon),
            "W1" => RotationUnit::Weekday(Weekday::Tue),
            "W2" => RotationUnit::Weekday(Weekday::Wed),
            "W3" => RotationUnit::Weekday(Weekday::Thu),
            "W4" => RotationUnit::Weekday(Weekday::Fri),
            "W5" => RotationUnit::Weekday(Weekday::Sat),
            "W6" => RotationUnit::Weekday(Weekday::Sun),
            _ => {
                return Err(LogSinkError::invalid_value(
                    "rotation_unit",
                    format!("'{s}' is not one of S, M, H, D, W0-W6, MIDNIGHT"),
                ))
            }
        };
        Ok(unit)
    }
}

impl fmt::Display for RotationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specifies the time zone used for rotation boundaries and rotated file
/// names.
///
/// Boundaries such as `MIDNIGHT` fall at midnight in this zone, and the
/// timestamp suffix of rotated files is rendered in it.
///
/// # Examples
/// ```
/// use logsink::TimeZone;
/// use chrono::FixedOffset;
///
/// let utc = TimeZone::UTC;
/// let local = TimeZone::Local;
/// let tokyo = TimeZone::Fix(FixedOffset::east_opt(9 * 3600).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub enum TimeZone {
    /// Use UTC time zone.
    UTC,
    /// Use the system's local time zone, as of when the sink is built.
    #[default]
    Local,
    /// Use a fixed time zone offset.
    Fix(FixedOffset),
}

impl TimeZone {
    pub(crate) fn offset(&self) -> FixedOffset {
        match self {
            TimeZone::UTC => Utc::now().fixed_offset().offset().to_owned(),
            TimeZone::Local => Local::now().offset().to_owned(),
            TimeZone::Fix(fixed_offset) => *fixed_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::ErrorKind, chrono::TimeZone as _};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn parses_any_casing_to_canonical_form() {
        let cases = [
            ("s", "S"),
            ("m", "M"),
            ("h", "H"),
            ("d", "D"),
            ("w2", "W2"),
            ("W6", "W6"),
            ("Midnight", "MIDNIGHT"),
            ("midnight", "MIDNIGHT"),
        ];
        for (input, canonical) in cases {
            let unit: RotationUnit = input.parse().unwrap();
            assert_eq!(unit.as_str(), canonical);
            assert_eq!(unit.to_string(), canonical);
        }
    }

    #[test]
    fn rejects_unknown_units() {
        for input in ["hello", "SS", "Minute", "W7", "", "w"] {
            let err = input.parse::<RotationUnit>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "{input}");
        }
    }

    #[test]
    fn fixed_units_add_one_period() {
        let base = at(2025, 4, 1, 19, 55, 10);
        assert_eq!(RotationUnit::Second.next_rollover(5, base).unwrap(), at(2025, 4, 1, 19, 55, 15));
        assert_eq!(RotationUnit::Minute.next_rollover(2, base).unwrap(), at(2025, 4, 1, 19, 57, 10));
        assert_eq!(RotationUnit::Hour.next_rollover(1, base).unwrap(), at(2025, 4, 1, 20, 55, 10));
        assert_eq!(RotationUnit::Day.next_rollover(3, base).unwrap(), at(2025, 4, 4, 19, 55, 10));
    }

    #[test]
    fn midnight_snaps_to_the_next_day() {
        let base = at(2025, 4, 1, 19, 55, 10);
        assert_eq!(RotationUnit::Midnight.next_rollover(1, base).unwrap(), at(2025, 4, 2, 0, 0, 0));
        assert_eq!(RotationUnit::Midnight.next_rollover(3, base).unwrap(), at(2025, 4, 4, 0, 0, 0));
        // Exactly at midnight still moves forward a full day.
        let midnight = at(2025, 4, 2, 0, 0, 0);
        assert_eq!(RotationUnit::Midnight.next_rollover(1, midnight).unwrap(), at(2025, 4, 3, 0, 0, 0));
    }

    #[test]
    fn weekday_rotates_when_that_day_ends() {
        // 2025-04-01 is a Tuesday.
        let base = at(2025, 4, 1, 8, 0, 0);
        let wednesday: RotationUnit = "W2".parse().unwrap();
        assert_eq!(wednesday.next_rollover(1, base).unwrap(), at(2025, 4, 3, 0, 0, 0));
        let monday: RotationUnit = "w0".parse().unwrap();
        assert_eq!(monday.next_rollover(1, base).unwrap(), at(2025, 4, 8, 0, 0, 0));
        let tuesday: RotationUnit = "W1".parse().unwrap();
        assert_eq!(tuesday.next_rollover(1, base).unwrap(), at(2025, 4, 2, 0, 0, 0));
        assert_eq!(tuesday.next_rollover(2, base).unwrap(), at(2025, 4, 9, 0, 0, 0));
        let sunday: RotationUnit = "W6".parse().unwrap();
        assert_eq!(sunday.next_rollover(1, base).unwrap(), at(2025, 4, 7, 0, 0, 0));
    }

    #[test]
    fn default_suffix_matches_granularity() {
        assert_eq!(RotationUnit::Second.default_suffix(), "%Y-%m-%d_%H-%M-%S");
        assert_eq!(RotationUnit::Hour.default_suffix(), "%Y-%m-%d_%H");
        assert_eq!(RotationUnit::Midnight.default_suffix(), "%Y-%m-%d");
    }
}
