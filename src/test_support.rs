//! Recording doubles for the browser-facing seams.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use crate::config::TravelMode;
use crate::notice::Notifier;
use crate::places::{PlaceList, SelectHandler};
use crate::session::{Directions, MapSurface};
use crate::storage::{KeyCache, MemoryCache};
use crate::transport::{HttpReply, Transport};
use crate::{Coordinate, Error, Place, Result};

pub fn sample_places() -> Vec<Place> {
  vec![
    Place {
      name: "Blue Bottle".into(),
      rating: 4.5,
      rating_count: 812,
      price_level: Some(2),
      open_now: Some(true),
      latitude: 37.001,
      longitude: -122.001,
      vicinity: Some("66 Mint St".into()),
    },
    Place {
      name: "Tartine".into(),
      rating: 4.6,
      rating_count: 5120,
      price_level: Some(3),
      open_now: Some(false),
      latitude: 37.002,
      longitude: -122.002,
      vicinity: Some("600 Guerrero St".into()),
    },
    Place {
      name: "Sightglass".into(),
      rating: 4.4,
      rating_count: 1450,
      price_level: None,
      open_now: Some(true),
      latitude: 37.003,
      longitude: -122.003,
      vicinity: None,
    },
  ]
}

pub fn sample_places_json() -> String {
  serde_json::to_string(&serde_json::json!({ "places": sample_places() })).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
  pub method: &'static str,
  pub path: String,
  pub body: Option<String>,
}

enum Canned {
  Reply(HttpReply),
  Fail(String),
}

#[derive(Default)]
pub struct FakeTransport {
  canned: RefCell<HashMap<String, Canned>>,
  calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
  pub fn reply(&self, path: &str, reply: HttpReply) {
    self.canned.borrow_mut().insert(path.to_string(), Canned::Reply(reply));
  }

  pub fn fail(&self, path: &str, message: &str) {
    self.canned.borrow_mut().insert(path.to_string(), Canned::Fail(message.to_string()));
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  fn answer(&self, method: &'static str, path: &str, body: Option<String>) -> Result<HttpReply> {
    self.calls.borrow_mut().push(Call { method, path: path.to_string(), body });
    match self.canned.borrow().get(path) {
      Some(Canned::Reply(reply)) => Ok(reply.clone()),
      Some(Canned::Fail(message)) => Err(Error::Transport(message.clone())),
      None => Ok(HttpReply { status: 404, body: String::new() }),
    }
  }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
  async fn get(&self, path: &str) -> Result<HttpReply> {
    self.answer("GET", path, None)
  }

  async fn post_json(&self, path: &str, body: String) -> Result<HttpReply> {
    self.answer("POST", path, Some(body))
  }
}

#[derive(Default)]
pub struct CountingCache {
  inner: MemoryCache,
  stores: Cell<usize>,
}

impl CountingCache {
  pub fn stores(&self) -> usize {
    self.stores.get()
  }
}

impl KeyCache for CountingCache {
  fn load(&self, entry: &str) -> Option<String> {
    self.inner.load(entry)
  }

  fn store(&self, entry: &str, value: &str) -> Result<()> {
    self.stores.set(self.stores.get() + 1);
    self.inner.store(entry, value)
  }
}

/// Map double; markers are indices into the placement log, the user marker being 0.
#[derive(Default)]
pub struct FakeMap {
  placed: RefCell<Vec<(Coordinate, String)>>,
  handlers: RefCell<Vec<Rc<dyn Fn()>>>,
  removed: Cell<usize>,
  focused: RefCell<Vec<(Coordinate, f64)>>,
}

impl FakeMap {
  pub fn placed(&self) -> Vec<(Coordinate, String)> {
    self.placed.borrow().clone()
  }

  pub fn live_markers(&self) -> usize {
    self.placed.borrow().len() - self.removed.get()
  }

  pub fn focused(&self) -> Vec<(Coordinate, f64)> {
    self.focused.borrow().clone()
  }

  pub fn click(&self, marker: usize) {
    let handler = self.handlers.borrow()[marker].clone();
    handler();
  }
}

impl MapSurface for FakeMap {
  type Marker = usize;

  fn place_marker(&self, at: Coordinate, title: &str, on_click: Rc<dyn Fn()>) -> usize {
    self.handlers.borrow_mut().push(on_click);
    let mut placed = self.placed.borrow_mut();
    placed.push((at, title.to_string()));
    placed.len() - 1
  }

  fn remove_marker(&self, _marker: usize) {
    self.removed.set(self.removed.get() + 1);
  }

  fn focus(&self, at: Coordinate, zoom: f64) {
    self.focused.borrow_mut().push((at, zoom));
  }
}

#[derive(Default)]
pub struct FakeDirections {
  failure: Option<String>,
  requests: RefCell<Vec<(Coordinate, Coordinate, TravelMode)>>,
}

impl FakeDirections {
  pub fn failing(status: &str) -> Self {
    Self { failure: Some(status.to_string()), ..Self::default() }
  }

  pub fn requests(&self) -> Vec<(Coordinate, Coordinate, TravelMode)> {
    self.requests.borrow().clone()
  }
}

#[async_trait(?Send)]
impl Directions for FakeDirections {
  async fn show_route(
    &self,
    origin: Coordinate,
    destination: Coordinate,
    mode: TravelMode,
  ) -> Result<()> {
    self.requests.borrow_mut().push((origin, destination, mode));
    match &self.failure {
      Some(status) => Err(Error::Directions(status.clone())),
      None => Ok(()),
    }
  }
}

#[derive(Default)]
pub struct RecordingList {
  places: RefCell<Vec<Place>>,
  handler: RefCell<Option<SelectHandler>>,
  replaced: Cell<usize>,
}

impl RecordingList {
  pub fn places(&self) -> Vec<Place> {
    self.places.borrow().clone()
  }

  pub fn replaced(&self) -> usize {
    self.replaced.get()
  }

  pub fn select(&self, index: usize) {
    let place = self.places.borrow()[index].clone();
    let handler = self.handler.borrow().clone();
    if let Some(handler) = handler {
      handler(place);
    }
  }
}

impl PlaceList for RecordingList {
  fn replace(&self, places: Vec<Place>, on_select: SelectHandler) {
    self.places.replace(places);
    self.handler.replace(Some(on_select));
    self.replaced.set(self.replaced.get() + 1);
  }
}

#[derive(Default)]
pub struct RecordingNotifier {
  messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
  pub fn messages(&self) -> Vec<String> {
    self.messages.borrow().clone()
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&self, message: &str) {
    self.messages.borrow_mut().push(message.to_string());
  }
}
