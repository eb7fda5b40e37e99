use crate::cors::{access_control_allow_origin_header, AllowedOrigins};
use crate::error::FormatError;
use crate::event::{is_rest_api_event, ApiEvent};
use crate::models::{is_api_response, ApiResponse};

use backtrace::Backtrace;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use std::any::type_name;


/// Outcome of inspecting a handler result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decision {
  /// Not a JSON object, so it's treated as a deliberate raw response.
  NotAnObject,
  /// The handler already produced a full response.
  HasStatusCode,
  /// API Gateway formats HTTP API responses itself.
  HttpApiEvent,
  Format,
}

fn decide(response: &Value) -> Decision {
  if !response.is_object() {
    Decision::NotAnObject
  } else if is_api_response(response) {
    Decision::HasStatusCode
  } else {
    Decision::Format
  }
}

/// Format a Lambda handler result the way API Gateway does for payload format version 2.0.
///
/// If the result is a JSON object without a `statusCode` field and the event came from a REST API
/// (payload format version 1.0), it is replaced by a response with:
///  * `statusCode`: 200
///  * `headers`:
///    * `Content-Type: application/json`
///    * `Access-Control-Allow-Origin: <origin>`, if the request's origin is allowed for its stage
///  * `body`: the JSON serialization of the original result.
///
/// Otherwise, the result is returned untouched.
///
/// # Example
///
/// ```rust
/// use apigw_response_formatter::{format_response, AllowedOrigins, ApiEvent};
/// use serde_json::json;
///
/// let event: ApiEvent = serde_json::from_value(json!({
///   "version": "1.0",
///   "requestContext": { "stage": "prod" },
/// }))
/// .unwrap();
///
/// let response =
///   format_response(&event, json!({ "a": 1, "b": "x" }), &AllowedOrigins::default()).unwrap();
/// assert_eq!(
///   response,
///   json!({
///     "statusCode": 200,
///     "headers": { "Content-Type": "application/json" },
///     "body": r#"{"a":1,"b":"x"}"#,
///   })
/// );
/// ```
pub fn format_response(
  event: &ApiEvent,
  mut response: Value,
  allowed_origins: &AllowedOrigins,
) -> Result<Value, FormatError> {
  format_response_in_place(event, &mut response, allowed_origins)?;
  Ok(response)
}

/// Same as [`format_response`], but rewrites `response` in place and returns the same reference.
///
/// When formatting applies, every existing field of `response` is removed before the response
/// fields are set, so none of the handler's fields survive alongside `statusCode`, `headers` and
/// `body`.
pub fn format_response_in_place<'a>(
  event: &ApiEvent,
  response: &'a mut Value,
  allowed_origins: &AllowedOrigins,
) -> Result<&'a mut Value, FormatError> {
  if decide(response) == Decision::Format && !is_rest_api_event(event) {
    debug!("Leaving handler response untouched ({:?})", Decision::HttpApiEvent);
    return Ok(response);
  }

  format_rest_api_response_in_place(event, response, allowed_origins)
}

/// Same as [`format_response_in_place`], but for callers that already know the request came from a
/// REST API: the event's payload format version is not checked.
///
/// The event is only consulted for its `origin` header and deployment stage. Results that aren't
/// JSON objects or that already have a `statusCode` are still returned untouched.
pub fn format_rest_api_response_in_place<'a>(
  event: &ApiEvent,
  response: &'a mut Value,
  allowed_origins: &AllowedOrigins,
) -> Result<&'a mut Value, FormatError> {
  let decision = decide(response);
  if decision != Decision::Format {
    debug!("Leaving handler response untouched ({decision:?})");
    return Ok(response);
  }

  // Snapshot the body before clearing any fields.
  let body = to_json(&*response).map_err(|err| FormatError::ToJsonResponse {
    source: Box::new(err),
    backtrace: Backtrace::new(),
  })?;

  let mut headers = IndexMap::from([(
    "Content-Type".to_string(),
    mime::APPLICATION_JSON.to_string(),
  )]);
  for (name, value) in
    access_control_allow_origin_header(event.origin(), event.stage(), allowed_origins)
  {
    headers.entry(name).or_insert(value);
  }

  let formatted = ApiResponse {
    status_code: 200,
    headers,
    body,
  };

  if let Value::Object(fields) = &mut *response {
    fields.clear();
    fields.extend(formatted.into_fields());
  }

  debug!("Formatted REST API handler response");

  Ok(response)
}

/// Convert typed handler output into the JSON value expected by [`format_response`].
///
/// Serialization failures (e.g., maps with non-string keys) are returned with the path of the
/// offending field.
pub fn to_handler_response<T>(output: &T) -> Result<Value, FormatError>
where
  T: Serialize + ?Sized,
{
  serde_path_to_error::serialize(output, serde_json::value::Serializer).map_err(|err| {
    FormatError::ToJsonValue {
      type_name: type_name::<T>().into(),
      source: Box::new(err),
      backtrace: Backtrace::new(),
    }
  })
}

fn to_json<T>(value: &T) -> Result<String, serde_path_to_error::Error<serde_json::Error>>
where
  T: Serialize + ?Sized,
{
  let mut json_bytes = Vec::new();
  let mut serializer = serde_json::Serializer::new(&mut json_bytes);
  serde_path_to_error::serialize(value, &mut serializer)?;
  Ok(String::from_utf8(json_bytes).expect("JSON must be UTF-8"))
}
