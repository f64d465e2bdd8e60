use log::{debug, error};
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::Result;

/// Id of the optional `<script type="application/json">` block carrying page configuration.
pub const CONFIG_ELEMENT_ID: &str = "app-config";
pub const DEFAULT_FOCUS_ZOOM: f64 = 17.0;

/// How coordinates are exchanged for places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SyncProtocol {
  /// The POST reply carries the places.
  #[default]
  RequestResponse,
  /// The POST is only acknowledged; places arrive later on the push channel.
  Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TravelMode {
  #[default]
  Driving,
  Walking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ListStyle {
  #[default]
  Plain,
  Cards,
}

/// What happens when a place is picked from the list or the map.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum SelectionAction {
  Route {
    #[serde(default)]
    travel_mode: TravelMode,
  },
  Pan {
    #[serde(default = "default_focus_zoom")]
    zoom: f64,
  },
}

impl Default for SelectionAction {
  fn default() -> Self {
    Self::Route { travel_mode: TravelMode::default() }
  }
}

fn default_focus_zoom() -> f64 {
  DEFAULT_FOCUS_ZOOM
}

#[derive(Debug, Clone, PartialEq, Deserialize, better_default::Default)]
#[serde(default)]
pub struct AppConfig {
  #[default("/get-google-maps-key".to_string())]
  pub key_endpoint: String,
  #[default("/process-coordinates".to_string())]
  pub sync_endpoint: String,
  #[default("/ws".to_string())]
  pub push_path: String,
  pub sync_protocol: SyncProtocol,
  #[default(true)]
  pub cache_api_key: bool,
  #[default("google_maps_api_key".to_string())]
  pub key_cache_entry: String,
  #[default("https://maps.googleapis.com/maps/api/js".to_string())]
  pub sdk_url: String,
  #[default(vec!["places".to_string()])]
  pub sdk_libraries: Vec<String>,
  #[default("map".to_string())]
  pub map_container: String,
  #[default(15.0)]
  pub initial_zoom: f64,
  pub selection: SelectionAction,
  pub list_style: ListStyle,
  #[default(true)]
  pub clear_markers_on_render: bool,
  /// Only accept pushed batches whose coordinates match the last request.
  pub correlate_push_by_coordinates: bool,
}

impl AppConfig {
  pub fn from_json(text: &str) -> Result<Self> {
    Ok(serde_json::from_str(text)?)
  }

  /// Reads the page's configuration block, falling back to defaults when it is absent or invalid.
  pub fn from_page() -> Self {
    let text = web_sys::window()
      .and_then(|window| window.document())
      .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
      .and_then(|element| element.text_content());
    match text {
      Some(text) => Self::from_json(&text).unwrap_or_else(|err| {
        error!("ignoring invalid #{CONFIG_ELEMENT_ID} block: {err}");
        Self::default()
      }),
      None => {
        debug!("no #{CONFIG_ELEMENT_ID} block, using defaults");
        Self::default()
      }
    }
  }
}
