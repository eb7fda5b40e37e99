#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

// These are documented public exports since handler signatures and the `Middleware` trait depend
// on them.
pub use aws_lambda_events::apigw::ApiGatewayProxyResponse;
pub use lambda_runtime::{Context as LambdaContext, LambdaEvent};

/// CORS allowed origins.
pub mod cors;

pub use cors::{access_control_allow_origin_header, AllowedOrigins};

/// Error handling.
pub mod error;

pub use error::FormatError;

mod event;

pub use event::{is_rest_api_event, ApiEvent};

mod formatter;

pub use formatter::{
  format_response, format_response_in_place, format_rest_api_response_in_place,
  to_handler_response,
};

mod middleware;

pub use middleware::{HandlerRequest, Middleware, Next, Pipeline, ResponseFormatterMiddleware};

/// Response model-related types and re-exports.
pub mod models;

pub use models::{is_api_response, ApiResponse};

pub mod payload;

mod runtime;

pub use runtime::run_lambda;

/// Error returned by a request handler.
pub type HandlerError = lambda_runtime::Error;
