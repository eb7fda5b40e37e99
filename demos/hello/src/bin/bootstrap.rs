use apigw_response_formatter::{run_lambda, AllowedOrigins, Pipeline, ResponseFormatterMiddleware};
use hello::{hello_handler, AccessLogMiddleware};

#[tokio::main]
pub async fn main() {
  // TIP: Use the `log4rs` crate for more fine-grained control over logging.
  env_logger::init();

  let allowed_origins = AllowedOrigins::from_env().expect("ALLOWED_ORIGINS should be valid JSON");
  let pipeline = Pipeline::new()
    .with(AccessLogMiddleware)
    .with(ResponseFormatterMiddleware::new(allowed_origins));

  run_lambda(hello_handler, &pipeline).await
}
