use crate::error::format_error;
use crate::event::ApiEvent;
use crate::middleware::Pipeline;
use crate::{HandlerError, LambdaContext};

use futures::TryFutureExt;
use lambda_runtime::{service_fn, LambdaEvent};
use log::error;
use serde_json::Value;

use std::future::Future;

impl Pipeline {
  /// Await the handler's response and run every [`Middleware::after`](crate::Middleware::after)
  /// hook on it.
  ///
  /// Handler errors and formatting errors are logged and returned to the caller unmodified.
  pub async fn handle<Fut>(&self, event: ApiEvent, response: Fut) -> Result<Value, HandlerError>
  where
    Fut: Future<Output = Result<Value, HandlerError>>,
  {
    let response = response
      .inspect_err(|err| error!("Request handler failed: {}", format_error(&**err, None, None)))
      .await?;

    self.run_after(&event, response).map_err(|err| {
      error!(
        "Failed to format handler response: {}",
        format_error(&err, Some(err.name()), err.backtrace())
      );
      HandlerError::from(err)
    })
  }
}

/// Start the Lambda runtime to handle API Gateway proxy integration requests using the specified
/// handler and middleware pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use apigw_response_formatter::{
///   run_lambda, AllowedOrigins, Pipeline, ResponseFormatterMiddleware,
/// };
/// use serde_json::json;
///
/// #[tokio::main]
/// pub async fn main() {
///   let allowed_origins = AllowedOrigins::from_env().expect("invalid ALLOWED_ORIGINS");
///   let pipeline = Pipeline::new().with(ResponseFormatterMiddleware::new(allowed_origins));
///
///   run_lambda(|event, _ctx| async move { Ok(json!({ "stage": event.stage() })) }, &pipeline)
///     .await
/// }
/// ```
pub async fn run_lambda<F, Fut>(mut handler: F, pipeline: &Pipeline)
where
  F: FnMut(ApiEvent, LambdaContext) -> Fut,
  Fut: Future<Output = Result<Value, HandlerError>>,
{
  lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiEvent>| {
    let LambdaEvent { payload, context } = event;
    let response = handler(payload.clone(), context);
    pipeline.handle(payload, response)
  }))
  .await
  .expect("Lambda run loop should never exit")
}

#[cfg(test)]
mod tests {
  use crate::cors::AllowedOrigins;
  use crate::event::ApiEvent;
  use crate::middleware::{Pipeline, ResponseFormatterMiddleware};
  use crate::HandlerError;

  use pretty_assertions::assert_eq;
  use serde_json::json;

  fn rest_api_event() -> ApiEvent {
    serde_json::from_value(json!({
      "version": "1.0",
      "requestContext": { "stage": "prod" },
    }))
    .unwrap()
  }

  #[tokio::test]
  async fn test_handle_formats_response() {
    let pipeline =
      Pipeline::new().with(ResponseFormatterMiddleware::new(AllowedOrigins::default()));
    let response = pipeline
      .handle(rest_api_event(), async { Ok(json!({ "id": 7 })) })
      .await
      .unwrap();

    assert_eq!(
      response,
      json!({
        "statusCode": 200,
        "headers": { "Content-Type": "application/json" },
        "body": r#"{"id":7}"#,
      })
    );
  }

  #[tokio::test]
  async fn test_handle_propagates_handler_error() {
    let pipeline = Pipeline::new().with(ResponseFormatterMiddleware::default());
    let err = pipeline
      .handle(rest_api_event(), async {
        Err(HandlerError::from("database unavailable"))
      })
      .await
      .unwrap_err();

    assert_eq!(err.to_string(), "database unavailable");
  }
}
