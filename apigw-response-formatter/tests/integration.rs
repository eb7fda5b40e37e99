use apigw_response_formatter::payload::RestApiRequestEvent;
use apigw_response_formatter::{
  format_response, AllowedOrigins, ApiEvent, ApiGatewayProxyResponse, ApiResponse, Pipeline,
  ResponseFormatterMiddleware,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const REST_API_EVENT: &str = include_str!("fixtures/rest-api-event.json");
const HTTP_API_EVENT: &str = include_str!("fixtures/http-api-event.json");

fn parse_event(json: &str) -> ApiEvent {
  serde_json::from_str(json).unwrap_or_else(|err| panic!("failed to parse event: {err}"))
}

fn pipeline() -> Pipeline {
  Pipeline::new().with(ResponseFormatterMiddleware::new(
    AllowedOrigins::new().with_stage("dev", ["http://localhost:3000"]),
  ))
}

#[test]
fn test_parse_rest_api_event() {
  let event = parse_event(REST_API_EVENT);
  let ApiEvent::RestApi(RestApiRequestEvent {
    http_method,
    path_parameters,
    request_context,
    stage_variables,
    ..
  }) = &event
  else {
    panic!("expected REST API event, got {event:?}");
  };

  assert_eq!(http_method, "GET");
  assert_eq!(path_parameters.get("id").map(String::as_str), Some("42"));
  assert!(stage_variables.is_empty());
  assert_eq!(request_context.resource_id.as_deref(), Some("2gxmpl"));
  assert_eq!(
    request_context
      .authorizer
      .as_ref()
      .and_then(|authorizer| authorizer.claims.get("email"))
      .map(String::as_str),
    Some("bob@example.com")
  );
  assert_eq!(event.origin(), Some("http://localhost:3000"));
  assert_eq!(event.stage(), Some("dev"));
}

#[test]
fn test_parse_http_api_event() {
  let event = parse_event(HTTP_API_EVENT);
  let ApiEvent::HttpApi(http_event) = &event else {
    panic!("expected HTTP API event, got {event:?}");
  };

  assert_eq!(http_event.request_context.http.method, "GET");
  assert_eq!(http_event.cookies, vec!["session=abc123"]);
  assert_eq!(event.stage(), Some("dev"));
}

#[tokio::test]
async fn test_rest_api_pipeline() {
  let _ = env_logger::builder().is_test(true).try_init();

  let response = pipeline()
    .handle(parse_event(REST_API_EVENT), async {
      Ok(json!({ "id": "42", "name": "widget", "price": 9.5 }))
    })
    .await
    .unwrap();

  let formatted = serde_json::from_value::<ApiResponse>(response).unwrap();
  assert_eq!(formatted.status_code, 200);
  assert_eq!(
    formatted
      .headers
      .iter()
      .map(|(name, value)| (name.as_str(), value.as_str()))
      .collect::<Vec<_>>(),
    vec![
      ("Content-Type", "application/json"),
      ("Access-Control-Allow-Origin", "http://localhost:3000"),
    ]
  );
  assert_eq!(
    serde_json::from_str::<Value>(&formatted.body).unwrap(),
    json!({ "id": "42", "name": "widget", "price": 9.5 })
  );

  let apigw = ApiGatewayProxyResponse::try_from(formatted).unwrap();
  assert_eq!(apigw.status_code, 200);
  assert_eq!(
    apigw.headers.get("access-control-allow-origin").unwrap(),
    "http://localhost:3000"
  );
}

#[tokio::test]
async fn test_http_api_pipeline() {
  let _ = env_logger::builder().is_test(true).try_init();

  let response = pipeline()
    .handle(parse_event(HTTP_API_EVENT), async {
      Ok(json!({ "id": "42", "name": "widget" }))
    })
    .await
    .unwrap();

  assert_eq!(response, json!({ "id": "42", "name": "widget" }));
}

#[tokio::test]
async fn test_rest_api_custom_status_code() {
  let response = pipeline()
    .handle(parse_event(REST_API_EVENT), async {
      Ok(json!({ "statusCode": 404, "headers": {}, "body": "no such item" }))
    })
    .await
    .unwrap();

  assert_eq!(
    response,
    json!({ "statusCode": 404, "headers": {}, "body": "no such item" })
  );
}

#[test]
fn test_default_allowed_origins_for_prod() {
  let mut event = parse_event(REST_API_EVENT);
  if let ApiEvent::RestApi(rest_event) = &mut event {
    rest_event.request_context.stage = Some("prod".to_string());
    rest_event
      .headers
      .insert("origin".to_string(), "https://www.example.com".to_string());
  }

  let response =
    format_response(&event, json!({ "ok": true }), &AllowedOrigins::default()).unwrap();
  assert_eq!(
    response["headers"]["Access-Control-Allow-Origin"],
    json!("https://www.example.com")
  );
}
