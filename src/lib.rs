pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod google;
pub mod key_provider;
pub mod map_loader;
pub mod notice;
pub mod places;
pub mod route;
pub mod session;
pub mod storage;
pub mod sync;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
  pub latitude: f64,
  pub longitude: f64,
}

impl Coordinate {
  pub fn new(latitude: f64, longitude: f64) -> Self {
    Self { latitude, longitude }
  }

  /// Both components rounded to `decimals` places, the precision the backend stores.
  pub fn rounded(self, decimals: i32) -> Self {
    let scale = 10f64.powi(decimals);
    Self {
      latitude: (self.latitude * scale).round() / scale,
      longitude: (self.longitude * scale).round() / scale,
    }
  }
}

/// A nearby point of interest as ranked by the backend.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
  pub name: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub rating: f64,
  #[serde(
    default,
    rename = "user_ratings_total",
    alias = "ratingCount",
    deserialize_with = "null_as_default"
  )]
  pub rating_count: u32,
  #[serde(default, alias = "priceLevel")]
  pub price_level: Option<u8>,
  #[serde(default, alias = "openNow")]
  pub open_now: Option<bool>,
  pub latitude: f64,
  pub longitude: f64,
  #[serde(default)]
  pub vicinity: Option<String>,
}

impl Place {
  pub fn coordinate(&self) -> Coordinate {
    Coordinate::new(self.latitude, self.longitude)
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
  D: serde::Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Map provider key handed out by the backend.
#[derive(Clone, PartialEq, Eq, Display, From)]
pub struct ApiKey(String);

impl ApiKey {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Debug for ApiKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("ApiKey(..)")
  }
}
