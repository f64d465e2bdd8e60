use std::rc::Rc;

use async_trait::async_trait;
use log::{error, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Function, Object, Promise, Reflect};
use web_sys::HtmlElement;

use crate::config::TravelMode;
use crate::session::{Directions, MapSurface, Session};
use crate::{Coordinate, Error, Result};

#[wasm_bindgen]
extern "C" {
  #[wasm_bindgen(js_namespace = ["google", "maps"])]
  #[derive(Clone)]
  type Map;
  #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
  fn newMap(container: &HtmlElement, options: &JsValue) -> Map;
  #[wasm_bindgen(method, js_name = panTo)]
  fn panTo(this: &Map, lat_lng: &JsValue);
  #[wasm_bindgen(method, js_name = setZoom)]
  fn setZoom(this: &Map, zoom: f64);

  #[wasm_bindgen(js_namespace = ["google", "maps"])]
  #[derive(Clone)]
  type Marker;
  #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
  fn newMarker(options: &JsValue) -> Marker;
  #[wasm_bindgen(method, js_name = setMap)]
  fn setMap(this: &Marker, map: &JsValue);
  #[wasm_bindgen(method, js_name = addListener)]
  fn addListener(this: &Marker, event: &str, handler: &Function) -> JsValue;

  #[wasm_bindgen(js_namespace = ["google", "maps"])]
  type DirectionsService;
  #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
  fn newDirectionsService() -> DirectionsService;
  #[wasm_bindgen(method)]
  fn route(this: &DirectionsService, request: &JsValue) -> Promise;

  #[wasm_bindgen(js_namespace = ["google", "maps"])]
  type DirectionsRenderer;
  #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
  fn newDirectionsRenderer() -> DirectionsRenderer;
  #[wasm_bindgen(method, js_name = setMap)]
  fn setMap(this: &DirectionsRenderer, map: &Map);
  #[wasm_bindgen(method, js_name = setDirections)]
  fn setDirections(this: &DirectionsRenderer, result: &JsValue);
}

#[derive(Serialize)]
struct LatLngLiteral {
  lat: f64,
  lng: f64,
}

impl From<Coordinate> for LatLngLiteral {
  fn from(coord: Coordinate) -> Self {
    Self { lat: coord.latitude, lng: coord.longitude }
  }
}

#[derive(Serialize)]
struct MapOptions {
  center: LatLngLiteral,
  zoom: f64,
}

#[derive(Serialize)]
struct MarkerOptions<'a> {
  position: LatLngLiteral,
  title: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRequest {
  origin: LatLngLiteral,
  destination: LatLngLiteral,
  travel_mode: String,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue> {
  serde_wasm_bindgen::to_value(value).map_err(|err| Error::Js(err.to_string()))
}

pub struct GoogleMap {
  map: Map,
}

/// A marker on the map together with the click handler it keeps alive.
pub struct GoogleMarker {
  marker: Marker,
  _on_click: Closure<dyn Fn()>,
}

impl GoogleMap {
  /// Creates the map inside the element with id `container`, centred on `center`.
  pub fn mount(container: &str, center: Coordinate, zoom: f64) -> Result<Self> {
    let element = web_sys::window()
      .and_then(|window| window.document())
      .and_then(|document| document.get_element_by_id(container))
      .ok_or_else(|| Error::Js(format!("no #{container} element")))?
      .dyn_into::<HtmlElement>()
      .map_err(|_| Error::Js(format!("#{container} is not an HTML element")))?;
    let options = to_js(&MapOptions { center: center.into(), zoom })?;
    Ok(Self { map: Map::newMap(&element, &options) })
  }
}

impl MapSurface for GoogleMap {
  type Marker = GoogleMarker;

  fn place_marker(&self, at: Coordinate, title: &str, on_click: Rc<dyn Fn()>) -> GoogleMarker {
    let on_click = Closure::<dyn Fn()>::new(move || on_click());
    let marker = match to_js(&MarkerOptions { position: at.into(), title }) {
      Ok(options) => Marker::newMarker(&options),
      Err(err) => {
        error!("marker options for {title}: {err}");
        Marker::newMarker(&Object::new())
      }
    };
    marker.setMap(&self.map);
    marker.addListener("click", on_click.as_ref().unchecked_ref());
    GoogleMarker { marker, _on_click: on_click }
  }

  fn remove_marker(&self, marker: GoogleMarker) {
    marker.marker.setMap(&JsValue::NULL);
  }

  fn focus(&self, at: Coordinate, zoom: f64) {
    match to_js(&LatLngLiteral::from(at)) {
      Ok(center) => {
        self.map.panTo(&center);
        self.map.setZoom(zoom);
      }
      Err(err) => warn!("cannot focus map: {err}"),
    }
  }
}

pub struct GoogleDirections {
  service: DirectionsService,
  renderer: DirectionsRenderer,
}

impl GoogleDirections {
  pub fn attach(map: &GoogleMap) -> Self {
    let renderer = DirectionsRenderer::newDirectionsRenderer();
    renderer.setMap(&map.map);
    Self { service: DirectionsService::newDirectionsService(), renderer }
  }
}

fn route_status(err: &JsValue) -> String {
  Reflect::get(err, &JsValue::from_str("code"))
    .ok()
    .and_then(|code| code.as_string())
    .unwrap_or_else(|| "UNKNOWN_ERROR".to_string())
}

#[async_trait(?Send)]
impl Directions for GoogleDirections {
  async fn show_route(
    &self,
    origin: Coordinate,
    destination: Coordinate,
    mode: TravelMode,
  ) -> Result<()> {
    let request = to_js(&RouteRequest {
      origin: origin.into(),
      destination: destination.into(),
      travel_mode: mode.to_string(),
    })?;
    let result = JsFuture::from(self.service.route(&request))
      .await
      .map_err(|err| Error::Directions(route_status(&err)))?;
    self.renderer.setDirections(&result);
    Ok(())
  }
}

pub type BrowserSession = Session<GoogleMap, GoogleDirections>;

/// Mounts the map centred on the user and wires up routing.
pub fn open_session(container: &str, origin: Coordinate, zoom: f64) -> Result<BrowserSession> {
  let map = GoogleMap::mount(container, origin, zoom)?;
  let directions = GoogleDirections::attach(&map);
  Ok(Session::new(map, directions, origin))
}
