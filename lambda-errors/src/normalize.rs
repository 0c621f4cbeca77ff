use std::{error::Error as _, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{ErrorValue, Primitive};

const DEFAULT_NAME: &str = "Error";
const DEFAULT_MESSAGE: &str = "There was an error.";
const DEFAULT_STATUS_CODE: u16 = 500;

/// An error classified into the fields exposed to clients.
///
/// Handlers can fail with a `NormalizedError` to control what the client sees:
///
/// ```
/// use lamedh_errors::NormalizedError;
///
/// let err = NormalizedError::new("NotFound", "Item not found.", 404);
/// assert_eq!(err.to_string(), "NotFound: Item not found.");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NormalizedError {
    /// Classification of the error.
    pub name: String,
    /// Message safe to show to users.
    pub message: String,
    /// HTTP status code associated with the error.
    pub status_code: u16,
    /// Diagnostic data. Never sent to clients.
    #[serde(skip)]
    pub additional: Option<Value>,
}

impl NormalizedError {
    /// Creates a new error with the given classification.
    pub fn new(name: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            status_code,
            additional: None,
        }
    }

    /// The error reported when a handler fails with a value that is not an error object.
    ///
    /// The offending value is kept under `additional.err`.
    pub fn invalid_value(value: Primitive) -> Self {
        Self {
            additional: Some(json!({ "err": value.to_json() })),
            ..Self::default()
        }
    }

    /// Attaches diagnostic data to this error.
    pub fn with_additional(mut self, additional: Value) -> Self {
        self.additional = Some(additional);
        self
    }
}

impl Default for NormalizedError {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_MESSAGE, DEFAULT_STATUS_CODE)
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for NormalizedError {}

/// Classifies arbitrary handler errors.
pub trait Normalize: Send + Sync {
    /// Classifies `value`. Always produces an error.
    fn normalize(&self, value: ErrorValue) -> NormalizedError;

    /// Renders a diagnostic trace of `value` for the error console.
    fn stack(&self, value: &ErrorValue) -> String;
}

/// The default [`Normalize`] implementation.
///
/// [`NormalizedError`]s are known errors and pass through as they are. Any other error
/// object is unknown: its message may leak internals, so it is replaced by a generic
/// `500` error.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNormalizer;

impl Normalize for DefaultNormalizer {
    fn normalize(&self, value: ErrorValue) -> NormalizedError {
        match value {
            ErrorValue::Structured(err) => match err.downcast::<NormalizedError>() {
                Ok(known) => *known,
                Err(_) => NormalizedError::default(),
            },
            ErrorValue::Primitive(value) => NormalizedError::invalid_value(value),
        }
    }

    fn stack(&self, value: &ErrorValue) -> String {
        match value {
            ErrorValue::Structured(err) => {
                if let Some(known) = err.downcast_ref::<NormalizedError>() {
                    return known.to_string();
                }
                let mut stack = format!("Error: {}", err);
                let mut source = err.source();
                while let Some(cause) = source {
                    stack.push_str(&format!("\nCaused by: {}", cause));
                    source = cause.source();
                }
                stack
            }
            ErrorValue::Primitive(value) => format!("UnknownError: {}.", value.to_json()),
        }
    }
}
