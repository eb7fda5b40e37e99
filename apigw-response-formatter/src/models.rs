use crate::error::FormatError;

use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::encodings::Body;
use aws_lambda_events::http::{HeaderMap, HeaderName, HeaderValue};
use backtrace::Backtrace;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use indexmap;
pub use serde_json;

/// Name of the field whose presence marks a handler result as an already-formatted response.
pub const STATUS_CODE_FIELD: &str = "statusCode";

/// Canonical Lambda proxy integration response.
///
/// Headers are kept in insertion order.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
  /// HTTP status code.
  pub status_code: i64,
  /// Single-value response headers.
  pub headers: IndexMap<String, String>,
  /// Pre-serialized response body.
  pub body: String,
}

impl ApiResponse {
  /// Return the JSON object fields of this response, in the order `body`, `statusCode`, `headers`.
  pub fn into_fields(self) -> Map<String, Value> {
    let mut fields = Map::with_capacity(3);
    fields.insert("body".to_string(), Value::String(self.body));
    fields.insert(STATUS_CODE_FIELD.to_string(), Value::from(self.status_code));
    fields.insert(
      "headers".to_string(),
      Value::Object(
        self
          .headers
          .into_iter()
          .map(|(name, value)| (name, Value::String(value)))
          .collect(),
      ),
    );
    fields
  }
}

impl From<ApiResponse> for Value {
  fn from(response: ApiResponse) -> Value {
    Value::Object(response.into_fields())
  }
}

impl TryFrom<ApiResponse> for ApiGatewayProxyResponse {
  type Error = FormatError;

  /// Convert to the [`aws_lambda_events`] representation of a proxy integration response.
  fn try_from(response: ApiResponse) -> Result<Self, Self::Error> {
    let mut headers = HeaderMap::with_capacity(response.headers.len());
    for (name, value) in response.headers {
      let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
        FormatError::InvalidResponseHeader(name.clone(), Box::new(err), Backtrace::new())
      })?;
      let header_value = HeaderValue::from_str(&value).map_err(|err| {
        FormatError::InvalidResponseHeader(name.clone(), Box::new(err), Backtrace::new())
      })?;
      headers.insert(header_name, header_value);
    }

    Ok(ApiGatewayProxyResponse {
      status_code: response.status_code,
      headers,
      multi_value_headers: Default::default(),
      body: Some(Body::Text(response.body)),
      is_base64_encoded: false,
    })
  }
}

/// Return `true` if `value` is already a formatted response (i.e., a JSON object with a
/// `statusCode` field).
///
/// Only the presence of the field matters: a `statusCode` of `null` still counts.
pub fn is_api_response(value: &Value) -> bool {
  value
    .as_object()
    .map(|fields| fields.contains_key(STATUS_CODE_FIELD))
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::{is_api_response, ApiResponse};

  use aws_lambda_events::apigw::ApiGatewayProxyResponse;
  use aws_lambda_events::encodings::Body;
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;
  use serde_json::{json, Value};

  fn mock_response() -> ApiResponse {
    ApiResponse {
      status_code: 200,
      headers: IndexMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        (
          "Access-Control-Allow-Origin".to_string(),
          "http://localhost:3000".to_string(),
        ),
      ]),
      body: r#"{"ok":true}"#.to_string(),
    }
  }

  #[test]
  fn test_is_api_response() {
    assert!(is_api_response(&json!({ "statusCode": 404 })));
    assert!(is_api_response(&json!({ "statusCode": null })));
    assert!(!is_api_response(&json!({ "status": 404 })));
    assert!(!is_api_response(&json!([{ "statusCode": 404 }])));
    assert!(!is_api_response(&json!("statusCode")));
  }

  #[test]
  fn test_into_fields_order() {
    let value = Value::from(mock_response());
    assert_eq!(
      value.as_object().unwrap().keys().collect::<Vec<_>>(),
      vec!["body", "statusCode", "headers"]
    );
    assert_eq!(
      serde_json::from_value::<ApiResponse>(value).unwrap(),
      mock_response()
    );
  }

  #[test]
  fn test_to_apigw() {
    let apigw = ApiGatewayProxyResponse::try_from(mock_response()).unwrap();
    assert_eq!(apigw.status_code, 200);
    assert_eq!(apigw.headers.get("content-type").unwrap(), "application/json");
    assert_eq!(
      apigw.headers.get("access-control-allow-origin").unwrap(),
      "http://localhost:3000"
    );
    assert!(apigw.multi_value_headers.is_empty());
    assert!(!apigw.is_base64_encoded);
    match apigw.body {
      Some(Body::Text(body)) => assert_eq!(body, r#"{"ok":true}"#),
      other => panic!("unexpected body {other:?}"),
    }
  }

  #[test]
  fn test_to_apigw_invalid_header() {
    let mut response = mock_response();
    response
      .headers
      .insert("X-Bad".to_string(), "line\nbreak".to_string());
    let err = ApiGatewayProxyResponse::try_from(response).unwrap_err();
    assert_eq!(err.name(), "InvalidResponseHeader");
    assert_eq!(err.to_string(), "invalid response header `X-Bad`");
  }
}
