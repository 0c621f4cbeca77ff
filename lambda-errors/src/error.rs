use std::fmt;

/// The error a wrapped handler fails with: a JSON document safe to return to clients.
///
/// Its `Display` output is the JSON itself, so the runtime reports it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedError(String);

impl WrappedError {
    pub(crate) fn new(json: String) -> Self {
        WrappedError(json)
    }

    /// Returns the serialized error.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the error, returning the serialized JSON.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WrappedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for WrappedError {}
