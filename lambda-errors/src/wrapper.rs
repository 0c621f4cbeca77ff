use std::{fmt, sync::Arc};

use futures_util::future::{BoxFuture, FutureExt};
use tracing::debug;
use tracing_futures::Instrument;

use crate::{
    console::{ErrorConsole, TracingConsole},
    json::{ErrorSerializer, JsonSerializer},
    normalize::{DefaultNormalizer, Normalize, NormalizedError},
    Context, ErrorValue, Handler, Settings, WrappedError,
};

const NOT_AN_OBJECT: &str = "Error must be an object:";

/// Turns handler errors into [`WrappedError`]s.
///
/// A reporter holds the [`Settings`] and the collaborators used to log, classify and
/// serialize errors. It is shared by every invocation of the handlers it wraps.
///
/// ```
/// use lamedh_errors::{handler_fn, Context, Error, MemoryConsole, Reporter, Settings};
///
/// async fn func(event: String, _: Context) -> Result<String, Error> {
///     Ok(event)
/// }
///
/// let console = MemoryConsole::new();
/// let wrapped = Reporter::new(Settings::default())
///     .console(console.clone())
///     .wrap(handler_fn(func));
/// # drop(wrapped);
/// ```
#[derive(Clone)]
pub struct Reporter {
    settings: Settings,
    normalizer: Arc<dyn Normalize>,
    serializer: Arc<dyn ErrorSerializer>,
    console: Arc<dyn ErrorConsole>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").field("settings", &self.settings).finish()
    }
}

impl Reporter {
    /// Creates a reporter with the default collaborators.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            normalizer: Arc::new(DefaultNormalizer),
            serializer: Arc::new(JsonSerializer),
            console: Arc::new(TracingConsole),
        }
    }

    /// Replaces the error classifier.
    pub fn normalizer(mut self, normalizer: impl Normalize + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// Replaces the error serializer.
    pub fn serializer(mut self, serializer: impl ErrorSerializer + 'static) -> Self {
        self.serializer = Arc::new(serializer);
        self
    }

    /// Replaces the error console.
    pub fn console(mut self, console: impl ErrorConsole + 'static) -> Self {
        self.console = Arc::new(console);
        self
    }

    /// Returns the settings this reporter applies.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Wraps `handler` so that its errors go through this reporter.
    pub fn wrap<H>(self, handler: H) -> ErrorWrapper<H> {
        ErrorWrapper {
            handler,
            reporter: Arc::new(self),
        }
    }

    /// Logs `value` and converts it into a serialized, client-safe error.
    ///
    /// Errors that were already reported by a nested wrapper are returned untouched.
    pub fn report(&self, value: ErrorValue) -> WrappedError {
        let value = match value {
            ErrorValue::Structured(err) => match err.downcast::<WrappedError>() {
                Ok(wrapped) => return *wrapped,
                Err(err) => ErrorValue::Structured(err),
            },
            value => value,
        };

        if self.settings.log {
            self.console.error(&self.normalizer.stack(&value));
        }

        let value = match value {
            ErrorValue::Primitive(raw) => {
                if self.settings.log {
                    self.console.error(NOT_AN_OBJECT);
                    self.console.error(&raw.to_string());
                }
                ErrorValue::from(NormalizedError::invalid_value(raw))
            }
            value => value,
        };

        let normalized = self.normalizer.normalize(value);
        let json = self.serializer.serialize(
            &normalized,
            false,
            self.settings.map.as_ref(),
            self.settings.exclude.as_ref(),
        );
        WrappedError::new(json)
    }
}

/// A [`Handler`] whose errors are reported as [`WrappedError`]s.
///
/// Created by [`wrap`](crate::wrap), [`wrap_with`](crate::wrap_with) or [`Reporter::wrap`].
#[derive(Clone, Debug)]
pub struct ErrorWrapper<H> {
    handler: H,
    reporter: Arc<Reporter>,
}

impl<H> ErrorWrapper<H> {
    /// Returns the wrapped handler.
    pub fn get_ref(&self) -> &H {
        &self.handler
    }

    /// Returns the reporter shared by every invocation.
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Consumes the wrapper, returning the wrapped handler.
    pub fn into_inner(self) -> H {
        self.handler
    }
}

impl<H, A, B> Handler<A, B> for ErrorWrapper<H>
where
    H: Handler<A, B>,
    H::Error: Into<ErrorValue> + Send + 'static,
    H::Fut: Send + 'static,
    B: Send + 'static,
{
    type Error = WrappedError;
    type Fut = BoxFuture<'static, Result<B, WrappedError>>;

    fn call(&mut self, event: A, context: Context) -> Self::Fut {
        let span = tracing::info_span!("invocation", request_id = %context.request_id);
        let reporter = Arc::clone(&self.reporter);
        let fut = self.handler.call(event, context);
        async move {
            match fut.await {
                Ok(result) => {
                    debug!("handler succeeded");
                    Ok(result)
                }
                Err(err) => Err(reporter.report(err.into())),
            }
        }
        .instrument(span)
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, MemoryConsole};

    fn reporter(settings: Settings) -> (Reporter, MemoryConsole) {
        let console = MemoryConsole::new();
        (Reporter::new(settings).console(console.clone()), console)
    }

    #[test]
    fn report_structured() {
        let (reporter, console) = reporter(Settings::default());
        let err: Error = "unsafe message!".into();
        let wrapped = reporter.report(err.into());
        assert_eq!(
            wrapped.as_str(),
            r#"{"name":"Error","message":"There was an error.","status_code":500}"#
        );
        assert_eq!(console.entries(), vec!["Error: unsafe message!"]);
    }

    #[test]
    fn report_primitive() {
        let (reporter, console) = reporter(Settings::default());
        let wrapped = reporter.report(ErrorValue::from(12));
        assert_eq!(
            wrapped.as_str(),
            r#"{"name":"Error","message":"There was an error.","status_code":500}"#
        );
        assert_eq!(console.entries(), vec!["UnknownError: 12.", "Error must be an object:", "12"]);
    }

    #[test]
    fn report_float_lines_agree() {
        let (reporter, console) = reporter(Settings::default());
        reporter.report(ErrorValue::from(1.0));
        reporter.report(ErrorValue::from(1.1f32));
        assert_eq!(
            console.entries(),
            vec![
                "UnknownError: 1.",
                "Error must be an object:",
                "1",
                "UnknownError: 1.1.",
                "Error must be an object:",
                "1.1",
            ]
        );
    }

    #[test]
    fn report_without_log() {
        let (reporter, console) = reporter(Settings::default().log(false));
        reporter.report("unsafe message!".into());
        let err: Error = "unsafe message!".into();
        reporter.report(err.into());
        assert!(console.entries().is_empty());
    }

    #[test]
    fn report_passes_wrapped_errors_through() {
        let (reporter, console) = reporter(Settings::default().exclude("status_code"));
        let inner = WrappedError::new(r#"{"name":"NotFound"}"#.to_string());
        let wrapped = reporter.report(inner.clone().into());
        assert_eq!(wrapped, inner);
        assert!(console.entries().is_empty());
    }

    struct Fixed(NormalizedError);

    impl Normalize for Fixed {
        fn normalize(&self, _: ErrorValue) -> NormalizedError {
            self.0.clone()
        }

        fn stack(&self, _: &ErrorValue) -> String {
            String::from("fixed")
        }
    }

    #[test]
    fn wrapper_accessors() {
        let settings = Settings::default().exclude("status_code");
        let wrapped = Reporter::new(settings.clone()).wrap(7u8);
        assert_eq!(wrapped.get_ref(), &7);
        assert_eq!(wrapped.reporter().settings(), &settings);
        assert_eq!(wrapped.into_inner(), 7);
    }

    #[test]
    fn injected_normalizer() {
        let (reporter, console) = reporter(Settings::default());
        let reporter = reporter.normalizer(Fixed(NormalizedError::new("Teapot", "Short and stout.", 418)));
        let err: Error = "boom".into();
        let wrapped = reporter.report(err.into());
        assert_eq!(
            wrapped.as_str(),
            r#"{"name":"Teapot","message":"Short and stout.","status_code":418}"#
        );
        assert_eq!(console.entries(), vec!["fixed"]);
    }
}
