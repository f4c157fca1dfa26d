use std::{
    fmt,
    sync::{Arc, Mutex},
};

///
/// What a logger does after emitting a fatal record.
///
/// Production loggers use [`ProcessExit`]. Tests exercising failure paths
/// swap in [`RecordedExit`] so the test process survives the call.
///
pub trait Exit: Send + Sync + fmt::Debug {
    fn exit(&self, code: i32);
}

/// Terminates the process with `std::process::exit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Exit for ProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Remembers the requested exit code instead of terminating.
#[derive(Debug, Clone, Default)]
pub struct RecordedExit {
    code: Arc<Mutex<Option<i32>>>,
}

impl RecordedExit {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last code passed to [`Exit::exit`], if any.
    pub fn code(&self) -> Option<i32> {
        *self.code.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Exit for RecordedExit {
    fn exit(&self, code: i32) {
        *self.code.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_exit_captures_code() {
        let exit = RecordedExit::new();
        assert_eq!(exit.code(), None);

        let shared = exit.clone();
        shared.exit(1);
        assert_eq!(exit.code(), Some(1));
    }
}
