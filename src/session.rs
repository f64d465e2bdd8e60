use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::config::TravelMode;
use crate::{Coordinate, Result};

pub const USER_MARKER_TITLE: &str = "Your Location";

/// The parts of a map SDK the page relies on.
pub trait MapSurface {
  type Marker;

  fn place_marker(&self, at: Coordinate, title: &str, on_click: Rc<dyn Fn()>) -> Self::Marker;
  fn remove_marker(&self, marker: Self::Marker);
  /// Recentres the map on `at` at the given zoom level.
  fn focus(&self, at: Coordinate, zoom: f64);
}

/// Routing service that draws the route it finds.
#[async_trait(?Send)]
pub trait Directions {
  /// `Err(Error::Directions(status))` when the service reports anything but success.
  async fn show_route(
    &self,
    origin: Coordinate,
    destination: Coordinate,
    mode: TravelMode,
  ) -> Result<()>;
}

/// Live map state for one page: the map, the user's position and marker, the
/// routing service, and the markers of the batch currently on screen.
pub struct Session<M: MapSurface, D> {
  map: M,
  directions: D,
  origin: Coordinate,
  user_marker: M::Marker,
  markers: RefCell<Vec<M::Marker>>,
}

impl<M: MapSurface, D> Session<M, D> {
  pub fn new(map: M, directions: D, origin: Coordinate) -> Self {
    let user_marker = map.place_marker(origin, USER_MARKER_TITLE, Rc::new(|| {}));
    Self { map, directions, origin, user_marker, markers: RefCell::new(Vec::new()) }
  }

  pub fn map(&self) -> &M {
    &self.map
  }

  pub fn directions(&self) -> &D {
    &self.directions
  }

  /// Where the user was located; the origin of every route.
  pub fn origin(&self) -> Coordinate {
    self.origin
  }

  pub fn user_marker(&self) -> &M::Marker {
    &self.user_marker
  }

  pub fn marker_count(&self) -> usize {
    self.markers.borrow().len()
  }

  pub(crate) fn clear_markers(&self) {
    for marker in self.markers.take() {
      self.map.remove_marker(marker);
    }
  }

  pub(crate) fn add_markers(&self, markers: impl IntoIterator<Item = M::Marker>) {
    self.markers.borrow_mut().extend(markers);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{FakeDirections, FakeMap};

  #[test]
  fn new_session_marks_the_user() {
    let origin = Coordinate::new(37.0, -122.0);
    let session = Session::new(FakeMap::default(), FakeDirections::default(), origin);
    assert_eq!(session.origin(), origin);
    assert_eq!(session.map().placed(), vec![(origin, USER_MARKER_TITLE.to_string())]);
    assert_eq!(session.marker_count(), 0);
  }

  #[test]
  fn clearing_leaves_the_user_marker() {
    let session =
      Session::new(FakeMap::default(), FakeDirections::default(), Coordinate::new(0.0, 0.0));
    let first = session.map().place_marker(Coordinate::new(1.0, 1.0), "a", Rc::new(|| {}));
    let second = session.map().place_marker(Coordinate::new(2.0, 2.0), "b", Rc::new(|| {}));
    session.add_markers([first, second]);
    assert_eq!(session.marker_count(), 2);

    session.clear_markers();
    assert_eq!(session.marker_count(), 0);
    assert_eq!(session.map().live_markers(), 1);
  }
}
