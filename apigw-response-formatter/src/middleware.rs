use crate::cors::AllowedOrigins;
use crate::error::FormatError;
use crate::event::ApiEvent;
use crate::formatter::format_response_in_place;

use serde_json::Value;

/// Handler invocation state passed to each [`Middleware::after`] hook.
#[derive(Debug)]
pub struct HandlerRequest<'a> {
  /// Lambda input event.
  pub event: &'a ApiEvent,
  /// Value returned by the handler, as modified by any hooks that have already run.
  pub response: Value,
}

/// Middleware interface for post-processing the value returned by a request handler.
///
/// Hooks run in reverse registration order (the last middleware added to a [`Pipeline`] runs
/// first). Each hook is responsible for continuing the pipeline by calling
/// [`next.run(request)`](Next::run); a hook that returns without doing so stops the pipeline.
pub trait Middleware: Send + Sync {
  /// Hook invoked after the request handler returns.
  ///
  /// # Arguments
  ///
  /// * `request` - Lambda input event and the handler's (possibly already modified) response.
  /// * `next` - Continuation that runs the remaining hooks.
  fn after(&self, request: &mut HandlerRequest<'_>, next: Next<'_>) -> Result<(), FormatError>;
}

/// Continuation that runs the remaining [`Middleware::after`] hooks of a [`Pipeline`].
pub struct Next<'a> {
  remaining: &'a [Box<dyn Middleware>],
}

impl<'a> Next<'a> {
  /// Run the remaining hooks.
  pub fn run(self, request: &mut HandlerRequest<'_>) -> Result<(), FormatError> {
    match self.remaining.split_last() {
      Some((middleware, remaining)) => middleware.after(request, Next { remaining }),
      None => Ok(()),
    }
  }
}

/// Ordered collection of [`Middleware`] wrapping a request handler.
#[derive(Default)]
pub struct Pipeline {
  middlewares: Vec<Box<dyn Middleware>>,
}

impl Pipeline {
  /// Construct a pipeline without any middleware.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a middleware to the pipeline.
  pub fn with<M>(mut self, middleware: M) -> Self
  where
    M: Middleware + 'static,
  {
    self.middlewares.push(Box::new(middleware));
    self
  }

  /// Run every `after` hook on the handler's response and return the final value.
  pub fn run_after(&self, event: &ApiEvent, response: Value) -> Result<Value, FormatError> {
    let mut request = HandlerRequest { event, response };
    Next {
      remaining: &self.middlewares,
    }
    .run(&mut request)?;
    Ok(request.response)
  }
}

/// Middleware that formats REST API (payload format version 1.0) handler responses the way API
/// Gateway formats HTTP API (payload format version 2.0) responses.
///
/// If the handler returns a JSON object without a `statusCode`, the response becomes:
///  * `statusCode`: 200
///  * `headers`:
///    * `Content-Type: application/json`
///    * `Access-Control-Allow-Origin: <origin>`, if the request's origin is allowed for its stage
///  * `body`: the JSON serialization of the handler's response.
///
/// See [`format_response`](crate::format_response) for details.
#[derive(Clone, Debug, Default)]
pub struct ResponseFormatterMiddleware {
  allowed_origins: AllowedOrigins,
}

impl ResponseFormatterMiddleware {
  /// Construct a middleware that allows the specified CORS origins.
  pub fn new(allowed_origins: AllowedOrigins) -> Self {
    Self { allowed_origins }
  }

  /// Allowed CORS origins.
  pub fn allowed_origins(&self) -> &AllowedOrigins {
    &self.allowed_origins
  }
}

impl Middleware for ResponseFormatterMiddleware {
  fn after(&self, request: &mut HandlerRequest<'_>, next: Next<'_>) -> Result<(), FormatError> {
    format_response_in_place(request.event, &mut request.response, &self.allowed_origins)?;
    next.run(request)
  }
}
