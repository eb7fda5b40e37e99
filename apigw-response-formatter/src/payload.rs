//! Request payloads delivered by Amazon API Gateway when using the Lambda proxy integration.
//!
//! The input event can be one of two types:
//!  * [`RestApiRequestEvent`]: payload format version 1.0, sent by REST APIs (API Gateway v1).
//!  * [`HttpApiRequestEvent`]: payload format version 2.0, sent by HTTP APIs (API Gateway v2).
//!
//! See
//! <https://docs.aws.amazon.com/apigateway/latest/developerguide/http-api-develop-integrations-lambda.html>.
//!
//! Every field is optional or defaulted so that partial events (e.g., from local emulators)
//! deserialize successfully. The `version` field is consumed by [`ApiEvent`](crate::ApiEvent) and
//! does not appear here.

use serde::{Deserialize, Deserializer};

use std::collections::HashMap;

/// Deserialize a JSON `null` as the default value (API Gateway sends `null` for empty maps).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Lambda input event for REST APIs (payload format version 1.0).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RestApiRequestEvent {
  /// Resource path template (e.g., `/pets/{petId}`).
  pub resource: String,
  /// Request path.
  pub path: String,
  /// HTTP method (e.g., `GET`).
  pub http_method: String,
  /// Single-value request headers.
  ///
  /// Header names are case-sensitive and appear exactly as sent by the client.
  #[serde(deserialize_with = "null_as_default")]
  pub headers: HashMap<String, String>,
  /// Multi-value request headers.
  #[serde(deserialize_with = "null_as_default")]
  pub multi_value_headers: HashMap<String, Vec<String>>,
  /// Single-value query string parameters.
  #[serde(deserialize_with = "null_as_default")]
  pub query_string_parameters: HashMap<String, String>,
  /// Multi-value query string parameters.
  #[serde(deserialize_with = "null_as_default")]
  pub multi_value_query_string_parameters: HashMap<String, Vec<String>>,
  /// Request context.
  pub request_context: RestApiRequestContext,
  /// Path parameters.
  #[serde(deserialize_with = "null_as_default")]
  pub path_parameters: HashMap<String, String>,
  /// Stage variables.
  #[serde(deserialize_with = "null_as_default")]
  pub stage_variables: HashMap<String, String>,
  /// Request body.
  pub body: Option<String>,
  /// Whether `body` is base64 encoded.
  pub is_base64_encoded: bool,
}

/// Request context of a [`RestApiRequestEvent`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RestApiRequestContext {
  /// AWS account ID that owns the API.
  pub account_id: String,
  /// API Gateway API ID.
  pub api_id: String,
  /// Authorizer output.
  pub authorizer: Option<RestApiAuthorizer>,
  /// Full domain name used to invoke the API.
  pub domain_name: String,
  /// First label of `domain_name`.
  pub domain_prefix: String,
  /// Extended request ID generated by API Gateway.
  pub extended_request_id: String,
  /// HTTP method.
  pub http_method: String,
  /// Caller identity.
  pub identity: Option<Identity>,
  /// Request path, including the stage.
  pub path: String,
  /// Request protocol (e.g., `HTTP/1.1`).
  pub protocol: String,
  /// Request ID.
  pub request_id: String,
  /// Formatted request time.
  pub request_time: String,
  /// Request time in milliseconds since the epoch.
  pub request_time_epoch: i64,
  /// API Gateway resource ID.
  pub resource_id: Option<String>,
  /// Resource path template.
  pub resource_path: String,
  /// Deployment stage (e.g., `prod`).
  pub stage: Option<String>,
}

/// Cognito user pool authorizer output.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RestApiAuthorizer {
  /// Token claims (e.g., `cognito:username`).
  #[serde(deserialize_with = "null_as_default")]
  pub claims: HashMap<String, String>,
  /// OAuth scopes.
  pub scopes: Option<Vec<String>>,
}

/// Caller identity included in a [`RestApiRequestContext`].
// Field names mirror the API Gateway payload.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Identity {
  pub access_key: Option<String>,
  pub account_id: Option<String>,
  pub caller: Option<String>,
  pub cognito_authentication_provider: Option<String>,
  pub cognito_authentication_type: Option<String>,
  pub cognito_identity_id: Option<String>,
  pub cognito_identity_pool_id: Option<String>,
  pub principal_org_id: Option<String>,
  pub source_ip: String,
  pub user: Option<String>,
  pub user_agent: Option<String>,
  pub user_arn: Option<String>,
  pub client_cert: Option<ClientCert>,
}

/// Mutual TLS client certificate.
// Field names mirror the API Gateway payload.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientCert {
  pub client_cert_pem: String,
  #[serde(rename = "subjectDN")]
  pub subject_dn: String,
  #[serde(rename = "issuerDN")]
  pub issuer_dn: String,
  pub serial_number: String,
  pub validity: ClientCertValidity,
}

/// Validity period of a [`ClientCert`].
// Field names mirror the API Gateway payload.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientCertValidity {
  pub not_before: String,
  pub not_after: String,
}

/// Lambda input event for HTTP APIs (payload format version 2.0).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpApiRequestEvent {
  /// Route key (e.g., `$default` or `GET /pets`).
  pub route_key: String,
  /// Request path.
  pub raw_path: String,
  /// Raw query string (e.g., `parameter1=value1&parameter1=value2`).
  pub raw_query_string: String,
  /// Request cookies.
  #[serde(deserialize_with = "null_as_default")]
  pub cookies: Vec<String>,
  /// Request headers. Multiple values for a header are comma-separated.
  #[serde(deserialize_with = "null_as_default")]
  pub headers: HashMap<String, String>,
  /// Query string parameters. Multiple values for a parameter are comma-separated.
  #[serde(deserialize_with = "null_as_default")]
  pub query_string_parameters: HashMap<String, String>,
  /// Request context.
  pub request_context: HttpApiRequestContext,
  /// Request body.
  pub body: Option<String>,
  /// Path parameters.
  #[serde(deserialize_with = "null_as_default")]
  pub path_parameters: HashMap<String, String>,
  /// Whether `body` is base64 encoded.
  pub is_base64_encoded: bool,
  /// Stage variables.
  #[serde(deserialize_with = "null_as_default")]
  pub stage_variables: HashMap<String, String>,
}

/// Request context of an [`HttpApiRequestEvent`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpApiRequestContext {
  /// AWS account ID that owns the API (e.g., `123456789012`).
  pub account_id: String,
  /// API Gateway API ID.
  pub api_id: String,
  /// Mutual TLS authentication details.
  pub authentication: Option<Authentication>,
  /// Authorizer output.
  pub authorizer: Option<HttpApiAuthorizer>,
  /// Full domain name used to invoke the API.
  pub domain_name: String,
  /// First label of `domain_name`.
  pub domain_prefix: String,
  /// HTTP request details.
  pub http: RequestContextHttp,
  /// Request ID.
  pub request_id: String,
  /// Route key (e.g., `$default`).
  pub route_key: String,
  /// Deployment stage (e.g., `$default`).
  pub stage: Option<String>,
  /// Formatted request time.
  pub time: String,
  /// Request time in milliseconds since the epoch.
  pub time_epoch: i64,
}

/// Mutual TLS authentication details.
// Field names mirror the API Gateway payload.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Authentication {
  pub client_cert: Option<ClientCert>,
}

/// HTTP API authorizer output.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpApiAuthorizer {
  /// JWT authorizer output.
  pub jwt: Option<JwtAuthorizer>,
}

/// JWT authorizer output.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct JwtAuthorizer {
  /// Token claims (e.g., `cognito:username`).
  #[serde(deserialize_with = "null_as_default")]
  pub claims: HashMap<String, String>,
  /// OAuth scopes.
  pub scopes: Option<Vec<String>>,
}

/// HTTP request details included in an [`HttpApiRequestContext`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestContextHttp {
  /// HTTP method (e.g., `GET`).
  pub method: String,
  /// Request path (e.g., `/my/path`).
  pub path: String,
  /// Request protocol (e.g., `HTTP/1.1`).
  pub protocol: String,
  /// Client IP address (e.g., `192.0.2.1`).
  pub source_ip: String,
  /// Client user agent.
  pub user_agent: String,
}
