use apigw_response_formatter::{
  to_handler_response, ApiEvent, FormatError, HandlerError, HandlerRequest, LambdaContext,
  Middleware, Next,
};
use log::info;
use serde::Serialize;
use serde_json::Value;

/// Body returned by [`hello_handler`].
#[derive(Debug, Serialize)]
pub struct Greeting {
  pub message: String,
  pub path: String,
}

/// Example handler that returns plain JSON and leaves the response formatting to the pipeline.
pub async fn hello_handler(
  event: ApiEvent,
  lambda_context: LambdaContext,
) -> Result<Value, HandlerError> {
  let path = match &event {
    ApiEvent::RestApi(rest_event) => rest_event.path.clone(),
    ApiEvent::HttpApi(http_event) => http_event.raw_path.clone(),
  };
  info!(
    "Handling request {} for {path} (payload version {})",
    lambda_context.request_id,
    event.version()
  );

  Ok(to_handler_response(&Greeting {
    message: "hello".to_string(),
    path,
  })?)
}

/// Example middleware that logs the status code of every response.
///
/// Register it before [`ResponseFormatterMiddleware`](apigw_response_formatter::ResponseFormatterMiddleware)
/// so that it observes the formatted response.
pub struct AccessLogMiddleware;

impl Middleware for AccessLogMiddleware {
  fn after(&self, request: &mut HandlerRequest<'_>, next: Next<'_>) -> Result<(), FormatError> {
    match request.response.get("statusCode") {
      Some(status_code) => info!("Responding with status {status_code}"),
      None => info!("Responding with raw handler output"),
    }
    next.run(request)
  }
}

#[cfg(test)]
mod tests {
  use super::{hello_handler, AccessLogMiddleware};

  use apigw_response_formatter::{
    AllowedOrigins, ApiEvent, LambdaContext, Pipeline, ResponseFormatterMiddleware,
  };
  use pretty_assertions::assert_eq;
  use serde_json::json;

  fn pipeline() -> Pipeline {
    Pipeline::new()
      .with(AccessLogMiddleware)
      .with(ResponseFormatterMiddleware::new(AllowedOrigins::default()))
  }

  #[tokio::test]
  async fn test_rest_api_hello() {
    let event: ApiEvent = serde_json::from_value(json!({
      "version": "1.0",
      "path": "/hello",
      "headers": { "origin": "https://example.com" },
      "requestContext": { "stage": "prod", "resourceId": "abc123" },
    }))
    .unwrap();

    let response = pipeline()
      .handle(
        event.clone(),
        hello_handler(event, LambdaContext::default()),
      )
      .await
      .unwrap();

    assert_eq!(
      response,
      json!({
        "statusCode": 200,
        "headers": {
          "Content-Type": "application/json",
          "Access-Control-Allow-Origin": "https://example.com",
        },
        "body": r#"{"message":"hello","path":"/hello"}"#,
      })
    );
  }

  #[tokio::test]
  async fn test_http_api_hello() {
    let event: ApiEvent = serde_json::from_value(json!({
      "version": "2.0",
      "rawPath": "/hello",
      "requestContext": { "stage": "prod", "http": { "method": "GET" } },
    }))
    .unwrap();

    let response = pipeline()
      .handle(
        event.clone(),
        hello_handler(event, LambdaContext::default()),
      )
      .await
      .unwrap();

    assert_eq!(response, json!({ "message": "hello", "path": "/hello" }));
  }
}
