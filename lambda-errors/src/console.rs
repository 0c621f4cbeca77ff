use std::sync::{Arc, Mutex, PoisonError};

/// Destination for error diagnostics.
pub trait ErrorConsole: Send + Sync {
    /// Writes one entry.
    fn error(&self, entry: &str);
}

/// Emits every entry as a `tracing` error event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl ErrorConsole for TracingConsole {
    fn error(&self, entry: &str) {
        tracing::error!(target: "lamedh_errors", "{}", entry);
    }
}

/// Keeps entries in memory.
///
/// Clones share the same buffer, so a clone can be handed to a [`Reporter`](crate::Reporter)
/// while the original is used to inspect what was written.
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryConsole {
    /// Creates an empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the entries written so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ErrorConsole for MemoryConsole {
    fn error(&self, entry: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.to_string());
    }
}
