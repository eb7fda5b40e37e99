use crate::error::FormatError;

use backtrace::Backtrace;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::Deserialize;

use std::env::VarError;

/// Name of the environment variable read by [`AllowedOrigins::from_env`].
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

/// Name of the CORS response header added for allowed origins.
pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

/// Origins allowed to receive an `Access-Control-Allow-Origin` response header, keyed by API
/// Gateway deployment stage.
///
/// The allow-list is loaded once at process start and never modified afterward. Origins are
/// matched exactly (no wildcards or suffix matching).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AllowedOrigins(IndexMap<String, IndexSet<String>>);

impl AllowedOrigins {
  /// Construct an empty allow-list that doesn't allow any origins.
  pub fn new() -> Self {
    Self(IndexMap::new())
  }

  /// Allow the specified origins for requests to the given deployment stage.
  ///
  /// Origins are appended to any already allowed for the stage.
  pub fn with_stage<S, I, O>(mut self, stage: S, origins: I) -> Self
  where
    S: Into<String>,
    I: IntoIterator<Item = O>,
    O: Into<String>,
  {
    self
      .0
      .entry(stage.into())
      .or_default()
      .extend(origins.into_iter().map(Into::into));
    self
  }

  /// Parse an allow-list from a JSON object mapping each stage to an array of origins.
  ///
  /// # Example
  ///
  /// ```rust
  /// use apigw_response_formatter::AllowedOrigins;
  ///
  /// let allowed_origins =
  ///   AllowedOrigins::from_json(r#"{"dev": ["http://localhost:3000"]}"#).unwrap();
  /// assert!(allowed_origins.is_allowed("dev", "http://localhost:3000"));
  /// ```
  pub fn from_json(json: &str) -> Result<Self, FormatError> {
    serde_json::from_str(json)
      .map_err(|err| FormatError::InvalidAllowedOrigins(Box::new(err), Backtrace::new()))
  }

  /// Load the allow-list from the `ALLOWED_ORIGINS` environment variable (see
  /// [`from_json`](AllowedOrigins::from_json) for the format).
  ///
  /// If the variable is unset, the [default](AllowedOrigins::default) allow-list is returned. If
  /// it is set but isn't valid Unicode or valid JSON, an error is returned.
  pub fn from_env() -> Result<Self, FormatError> {
    match std::env::var(ALLOWED_ORIGINS_ENV) {
      Ok(json) => Self::from_json(&json),
      Err(VarError::NotPresent) => {
        debug!("{ALLOWED_ORIGINS_ENV} is not set; using default allowed origins");
        Ok(Self::default())
      }
      Err(err @ VarError::NotUnicode(_)) => Err(FormatError::InvalidAllowedOriginsEnv(
        Box::new(err),
        Backtrace::new(),
      )),
    }
  }

  /// Return `true` if `origin` is allowed for requests to `stage`.
  pub fn is_allowed(&self, stage: &str, origin: &str) -> bool {
    self
      .0
      .get(stage)
      .map(|origins| origins.contains(origin))
      .unwrap_or(false)
  }

  /// Iterate over the allowed origins for `stage`, in the order they were added.
  pub fn origins<'a>(&'a self, stage: &str) -> impl Iterator<Item = &'a str> + 'a {
    self
      .0
      .get(stage)
      .into_iter()
      .flat_map(|origins| origins.iter().map(String::as_str))
  }
}

impl Default for AllowedOrigins {
  /// Built-in allow-list for the `dev` and `prod` stages.
  fn default() -> Self {
    Self::new()
      .with_stage("dev", ["http://localhost:3000"])
      .with_stage("prod", ["https://www.example.com", "https://example.com"])
  }
}

/// Compute the `Access-Control-Allow-Origin` response header for a request.
///
/// Returns a map containing the single header `Access-Control-Allow-Origin: <origin>` if the
/// request's `origin` is allowed for its deployment `stage`. Otherwise (including when either is
/// absent), returns an empty map, meaning no CORS header should be sent.
pub fn access_control_allow_origin_header(
  origin: Option<&str>,
  stage: Option<&str>,
  allowed_origins: &AllowedOrigins,
) -> IndexMap<String, String> {
  match (origin, stage) {
    (Some(origin), Some(stage)) if allowed_origins.is_allowed(stage, origin) => {
      IndexMap::from([(ACCESS_CONTROL_ALLOW_ORIGIN.to_string(), origin.to_string())])
    }
    _ => IndexMap::new(),
  }
}
