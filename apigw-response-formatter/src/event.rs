use crate::payload::{HttpApiRequestEvent, RestApiRequestEvent};

use serde::Deserialize;

use std::collections::HashMap;

/// Lambda input event for both REST APIs and HTTP APIs, when using the Lambda proxy integration.
///
/// The variant is selected exclusively by the `version` field of the payload. Events with any other
/// (or a missing) `version` fail to deserialize.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "version")]
pub enum ApiEvent {
  /// Payload format version 1.0 (REST API).
  #[serde(rename = "1.0")]
  RestApi(RestApiRequestEvent),
  /// Payload format version 2.0 (HTTP API).
  #[serde(rename = "2.0")]
  HttpApi(HttpApiRequestEvent),
}

impl ApiEvent {
  /// Return `true` if this event uses payload format version 1.0.
  pub fn is_rest_api(&self) -> bool {
    matches!(self, ApiEvent::RestApi(_))
  }

  /// Return the payload format version (`1.0` or `2.0`).
  pub fn version(&self) -> &'static str {
    match self {
      ApiEvent::RestApi(_) => "1.0",
      ApiEvent::HttpApi(_) => "2.0",
    }
  }

  /// Request headers, exactly as delivered by API Gateway.
  pub fn headers(&self) -> &HashMap<String, String> {
    match self {
      ApiEvent::RestApi(event) => &event.headers,
      ApiEvent::HttpApi(event) => &event.headers,
    }
  }

  /// Value of the `origin` request header, if present.
  ///
  /// The lookup is case-sensitive.
  pub fn origin(&self) -> Option<&str> {
    self.headers().get("origin").map(String::as_str)
  }

  /// Deployment stage from the request context, if present.
  pub fn stage(&self) -> Option<&str> {
    match self {
      ApiEvent::RestApi(event) => event.request_context.stage.as_deref(),
      ApiEvent::HttpApi(event) => event.request_context.stage.as_deref(),
    }
  }
}

/// Return `true` if the event was sent by a REST API (payload format version 1.0).
///
/// HTTP API events don't need their responses formatted since API Gateway already does so.
pub fn is_rest_api_event(event: &ApiEvent) -> bool {
  event.is_rest_api()
}
