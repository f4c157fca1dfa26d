use {
    super::{Field, Log, Severity},
    std::{
        panic::Location,
        sync::{Arc, Mutex},
    },
};

/// A record captured by [`MockLogger`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockEntry {
    pub severity: Severity,
    pub message: String,
    /// Context fields from `with` followed by the call's own fields.
    pub fields: Vec<Field>,
    pub caller: &'static Location<'static>,
}

///
/// In-memory [`Log`] implementation for testing code that takes a logger.
///
/// Children created with `with` share the parent's record list. `fatal` is
/// recorded like any other call and never exits.
///
/// ```rust
/// use logging_conf::{Field, Log, MockLogger, Severity};
///
/// let logger = MockLogger::new();
/// logger.with([Field::new("job", "sync")]).warn("retrying", &[]);
///
/// let entries = logger.entries();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].severity, Severity::Warn);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLogger {
    entries: Arc<Mutex<Vec<MockEntry>>>,
    fields: Vec<Field>,
}

impl MockLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record logged so far through this logger or its children.
    pub fn entries(&self) -> Vec<MockEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Log for MockLogger {
    fn with<I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        Self {
            entries: Arc::clone(&self.entries),
            fields: self.fields.iter().cloned().chain(fields).collect(),
        }
    }

    fn log(&self, severity: Severity, message: &str, fields: &[Field]) {
        let entry = MockEntry {
            severity,
            message: message.to_string(),
            fields: self.fields.iter().chain(fields).cloned().collect(),
            caller: Location::caller(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    fn fatal(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Fatal, message, fields);
    }
}
