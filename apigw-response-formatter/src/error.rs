// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use itertools::Itertools;
use thiserror::Error;

use std::borrow::Cow;

/// Error that occurred while formatting a Lambda handler response.
///
/// The formatter never fails on a well-formed JSON value. These errors represent faults that are
/// propagated to the caller unmodified (e.g., handler output that cannot be serialized to JSON) or
/// invalid configuration detected at process start.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FormatError {
  /// Invalid allowed origins configuration.
  #[error("invalid allowed origins configuration")]
  InvalidAllowedOrigins(#[source] Box<serde_json::Error>, _Backtrace),
  /// Allowed origins environment variable is set but not valid Unicode.
  #[error("invalid allowed origins environment variable")]
  InvalidAllowedOriginsEnv(#[source] Box<std::env::VarError>, _Backtrace),
  /// Response header can't be represented as an HTTP header.
  #[error("invalid response header `{0}`")]
  InvalidResponseHeader(
    String,
    #[source] Box<dyn std::error::Error + Send + Sync + 'static>,
    _Backtrace,
  ),
  /// Failed to serialize handler response to a JSON string.
  #[error("failed to serialize handler response to JSON")]
  ToJsonResponse {
    /// Underlying error that occurred while serializing the response.
    #[source]
    source: Box<serde_path_to_error::Error<serde_json::Error>>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Failed to convert typed handler output into a JSON value.
  #[error("failed to convert {type_name} handler output to a JSON value")]
  ToJsonValue {
    /// Name of the handler output type that failed to serialize.
    type_name: Cow<'static, str>,
    /// Underlying error that occurred while serializing the output.
    #[source]
    source: Box<serde_path_to_error::Error<serde_json::Error>>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
}

impl FormatError {
  /// Return the backtrace associated with the error, if known.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      FormatError::InvalidAllowedOrigins(_, backtrace)
      | FormatError::InvalidAllowedOriginsEnv(_, backtrace)
      | FormatError::InvalidResponseHeader(_, _, backtrace)
      | FormatError::ToJsonResponse { backtrace, .. }
      | FormatError::ToJsonValue { backtrace, .. } => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `ToJsonResponse`).
  pub fn name(&self) -> &str {
    match self {
      FormatError::InvalidAllowedOrigins(_, _) => "InvalidAllowedOrigins",
      FormatError::InvalidAllowedOriginsEnv(_, _) => "InvalidAllowedOriginsEnv",
      FormatError::InvalidResponseHeader(_, _, _) => "InvalidResponseHeader",
      FormatError::ToJsonResponse { .. } => "ToJsonResponse",
      FormatError::ToJsonValue { .. } => "ToJsonValue",
    }
  }
}

/// Helper function for formatting an error as a string containing a human-readable chain of causes.
///
/// This function will walk over the chain of causes returned by
/// [`Error::source`](std::error::Error::source) and append each underlying error (using the
/// [`Display`](std::fmt::Display) trait).
///
/// # Arguments
///
/// * `err` - Error to format.
/// * `name` - Optional name of the error type/variant (e.g., `FormatError::ToJsonResponse`).
/// * `backtrace` - Optional [`Backtrace`](backtrace::Backtrace) indicating where the top-level
///   error occurred.
pub fn format_error(
  err: &(dyn std::error::Error),
  name: Option<&str>,
  backtrace: Option<&_Backtrace>,
) -> String {
  let err_line = name
    .map(|n| format!("{}: {}", n, err))
    .unwrap_or_else(|| err.to_string());

  let top_error = if let Some(bt) = backtrace {
    format!("{err_line}\n  stack trace:\n{}", format_backtrace(bt, 4))
  } else {
    err_line
  };

  let cause_str = ErrorCauseIterator(err.source())
    .map(|cause| format!("  caused by: {cause}"))
    .join("\n");

  if !cause_str.is_empty() {
    format!("{top_error}\n{cause_str}")
  } else {
    top_error
  }
}

struct ErrorCauseIterator<'a>(Option<&'a (dyn std::error::Error + 'static)>);

impl<'a> Iterator for ErrorCauseIterator<'a> {
  type Item = &'a (dyn std::error::Error + 'static);

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.0;
    self.0 = current.and_then(|err| err.source());
    current
  }
}

fn format_backtrace(backtrace: &_Backtrace, indent: usize) -> String {
  let indent_str = " ".repeat(indent);
  format!("{backtrace:?}")
    .lines()
    .map(|line| format!("{indent_str}{line}"))
    .join("\n")
}
