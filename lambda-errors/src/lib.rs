#![deny(missing_docs)]

//! Safe error payloads for AWS Lambda handlers.
//!
//! Wrapping a handler with [`wrap`] keeps successful results untouched and turns every
//! error into a compact JSON string that is safe to hand back to API Gateway clients:
//!
//! ```json
//! {"name":"Error","message":"There was an error.","status_code":500}
//! ```
//!
//! The original error is written to the error console (by default, a `tracing` event)
//! so it can still be inspected in CloudWatch.
//!
//! ```
//! use lamedh_errors::{handler_fn, wrap, Context, Error, Handler};
//! use serde_json::Value;
//!
//! async fn func(event: Value, _: Context) -> Result<Value, Error> {
//!     Err("unsafe message!".into())
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut wrapped = wrap(handler_fn(func));
//! let err = wrapped.call(Value::Null, Context::default()).await.unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     r#"{"name":"Error","message":"There was an error.","status_code":500}"#
//! );
//! # }
//! ```
use std::future::Future;

pub use crate::{
    console::{ErrorConsole, MemoryConsole, TracingConsole},
    error::WrappedError,
    json::{ErrorSerializer, JsonSerializer},
    normalize::{DefaultNormalizer, Normalize, NormalizedError},
    settings::Settings,
    types::Context,
    value::{ErrorValue, Primitive},
    wrapper::{ErrorWrapper, Reporter},
};

mod console;
mod error;
mod json;
mod normalize;
mod settings;
/// Types available to a Lambda function.
mod types;
mod value;
mod wrapper;

/// Error type that lambdas may result in
pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A trait describing an asynchronous function `A` to `B`.
pub trait Handler<A, B> {
    /// Errors returned by this handler.
    type Error;
    /// Response of this handler.
    type Fut: Future<Output = Result<B, Self::Error>>;
    /// Handle the incoming event.
    fn call(&mut self, event: A, context: Context) -> Self::Fut;
}

/// Returns a new [`HandlerFn`] with the given closure.
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

/// A [`Handler`] implemented by a closure.
#[derive(Clone, Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, A, B, Error, Fut> Handler<A, B> for HandlerFn<F>
where
    F: Fn(A, Context) -> Fut,
    Fut: Future<Output = Result<B, Error>>,
{
    type Error = Error;
    type Fut = Fut;
    fn call(&mut self, req: A, ctx: Context) -> Self::Fut {
        (self.f)(req, ctx)
    }
}

/// Wraps a handler so that its errors are logged and returned as safe JSON strings.
///
/// Uses the default [`Settings`]: errors are logged, and the output keeps the
/// `name`, `message` and `status_code` fields.
pub fn wrap<H>(handler: H) -> ErrorWrapper<H> {
    Reporter::default().wrap(handler)
}

/// Wraps a handler with the given [`Settings`].
///
/// # Example
/// ```
/// use lamedh_errors::{handler_fn, wrap_with, Context, Error, Settings};
/// use serde_json::Value;
///
/// async fn func(event: Value, _: Context) -> Result<Value, Error> {
///     Ok(event)
/// }
///
/// let settings = Settings::default().log(false).exclude("status_code");
/// let wrapped = wrap_with(handler_fn(func), settings);
/// # drop(wrapped);
/// ```
pub fn wrap_with<H>(handler: H, settings: Settings) -> ErrorWrapper<H> {
    Reporter::new(settings).wrap(handler)
}
