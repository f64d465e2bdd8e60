use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abandon a step of the page flow.
///
/// None of these is fatal to the page: a failed step leaves whatever was
/// already on screen in place and nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
  #[error("geolocation is not supported by this browser")]
  GeolocationUnsupported,

  /// The user denied the permission prompt or the platform could not resolve a position.
  #[error("geolocation failed ({code}): {message}")]
  Location { code: u16, message: String },

  #[error("request failed: {0}")]
  Transport(String),

  #[error("backend answered with HTTP {status}")]
  Http { status: u16 },

  #[error("push channel failed: {0}")]
  Push(String),

  #[error("malformed response: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("response is missing `{0}`")]
  MissingField(&'static str),

  /// The backend replied with an explicit `error` field.
  #[error("backend error: {0}")]
  Backend(String),

  #[error("directions request failed: {0}")]
  Directions(String),

  #[error("failed to load map SDK from {0}")]
  SdkLoad(String),

  #[error("storage unavailable: {0}")]
  Storage(String),

  #[error("browser API error: {0}")]
  Js(String),
}

impl Error {
  /// Message shown to the user in a blocking notice, for the errors that warrant one.
  pub fn user_notice(&self) -> Option<String> {
    match self {
      Self::GeolocationUnsupported => Some("Geolocation is not supported by this browser.".into()),
      Self::Location { .. } => Some("Geolocation is required to use this feature.".into()),
      Self::Directions(status) => Some(format!("Directions request failed due to {status}")),
      _ => None,
    }
  }
}

impl From<JsValue> for Error {
  fn from(value: JsValue) -> Self {
    Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
  }
}

impl From<gloo_net::Error> for Error {
  fn from(err: gloo_net::Error) -> Self {
    Self::Transport(err.to_string())
  }
}
