use {
    crate::LogLevel,
    opentelemetry::logs::Severity as OtelSeverity,
    std::fmt,
    tracing::{Level, level_filters::LevelFilter},
};

///
/// Severity of a record, ordered from least to most severe.
///
/// A logger keeps every record whose severity is greater than or equal to
/// its threshold.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Level name written on stdout and sent as the OTel severity text.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    pub fn otel_severity(self) -> OtelSeverity {
        match self {
            Severity::Debug => OtelSeverity::Debug,
            Severity::Info => OtelSeverity::Info,
            Severity::Warn => OtelSeverity::Warn,
            Severity::Error => OtelSeverity::Error,
            Severity::Fatal => OtelSeverity::Fatal,
        }
    }

    /// The `tracing` level a record of this severity is emitted at.
    /// `tracing` has no fatal level: fatal records go out at `ERROR` with
    /// a `severity = "FATAL"` field that the stdout formatters print as the
    /// level.
    pub fn level(self) -> Level {
        match self {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warn => Level::WARN,
            Severity::Error | Severity::Fatal => Level::ERROR,
        }
    }

    /// Converts the threshold into the filter installed on the subscriber.
    pub fn level_filter(self) -> LevelFilter {
        LevelFilter::from_level(self.level())
    }
}

impl From<LogLevel> for Severity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Severity::Debug,
            LogLevel::Info => Severity::Info,
            LogLevel::Warn => Severity::Warn,
            LogLevel::Error => Severity::Error,
            LogLevel::Panic => Severity::Fatal,
            LogLevel::Unknown => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(Severity::from(LogLevel::Debug), Severity::Debug);
        assert_eq!(Severity::from(LogLevel::Info), Severity::Info);
        assert_eq!(Severity::from(LogLevel::Warn), Severity::Warn);
        assert_eq!(Severity::from(LogLevel::Error), Severity::Error);
        assert_eq!(Severity::from(LogLevel::Panic), Severity::Fatal);
        assert_eq!(Severity::from(LogLevel::Unknown), Severity::Info);
    }

    #[test]
    fn test_absent_level_is_info() {
        assert_eq!(Severity::from(LogLevel::default()), Severity::Info);
    }

    #[test]
    fn test_severity_is_totally_ordered() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(Severity::Debug.level_filter(), LevelFilter::DEBUG);
        assert_eq!(Severity::Warn.level_filter(), LevelFilter::WARN);
        assert_eq!(Severity::Fatal.level_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn test_fatal_keeps_its_own_label_and_otel_severity() {
        assert_eq!(Severity::Fatal.label(), "FATAL");
        assert_eq!(Severity::Fatal.otel_severity(), OtelSeverity::Fatal);
        assert_eq!(Severity::Fatal.otel_severity() as i32, 21);
        assert_eq!(Severity::Error.otel_severity() as i32, 17);
        assert_eq!(Severity::Warn.label(), "WARN");
    }

    proptest! {
        /// Any configured string maps to a severity; unrecognised ones to Info
        #[test]
        fn any_level_string_maps(s in ".*") {
            let level = LogLevel::from(s.as_str());
            let severity = Severity::from(level);
            if level == LogLevel::Unknown {
                prop_assert_eq!(severity, Severity::Info);
            }
        }

        /// Known names map regardless of case
        #[test]
        fn known_names_are_case_insensitive(
            idx in 0usize..5,
            upper in proptest::collection::vec(any::<bool>(), 5),
        ) {
            let (name, expected) = [
                ("debug", Severity::Debug),
                ("info", Severity::Info),
                ("warn", Severity::Warn),
                ("error", Severity::Error),
                ("panic", Severity::Fatal),
            ][idx];
            let mixed: String = name
                .chars()
                .zip(upper.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(Severity::from(LogLevel::from(mixed.as_str())), expected);
        }
    }
}
