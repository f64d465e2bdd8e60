use std::rc::Rc;

use iter_tools::Itertools;
use log::debug;

use crate::session::{MapSurface, Session};
use crate::Place;

/// Invoked with the place picked from the list or the map.
pub type SelectHandler = Rc<dyn Fn(Place)>;

const NOT_AVAILABLE: &str = "N/A";

/// Display-ready text of one place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceEntry {
  pub name: String,
  pub rating: String,
  pub rating_count: String,
  pub price_level: String,
  pub open_now: String,
  pub vicinity: Option<String>,
}

impl From<&Place> for PlaceEntry {
  fn from(place: &Place) -> Self {
    Self {
      name: place.name.clone(),
      rating: format!("{:.1}", place.rating),
      rating_count: place.rating_count.to_string(),
      price_level: place
        .price_level
        .map_or_else(|| NOT_AVAILABLE.to_string(), |level| level.to_string()),
      open_now: match place.open_now {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => NOT_AVAILABLE.to_string(),
      },
      vicinity: place.vicinity.clone(),
    }
  }
}

impl PlaceEntry {
  /// One-line rendering used by the plain list.
  pub fn summary(&self) -> String {
    let mut line = self.name.clone();
    if let Some(vicinity) = &self.vicinity {
      line.push_str(&format!(" - {vicinity}"));
    }
    line.push_str(&format!(
      " Rating: {} Number of Ratings: {} Price Level: {} Open Now: {}",
      self.rating, self.rating_count, self.price_level, self.open_now
    ));
    line
  }
}

/// The on-screen list of places.
pub trait PlaceList {
  /// Replaces the whole list; every entry selects through `on_select`.
  fn replace(&self, places: Vec<Place>, on_select: SelectHandler);
}

impl<L: PlaceList + ?Sized> PlaceList for Rc<L> {
  fn replace(&self, places: Vec<Place>, on_select: SelectHandler) {
    (**self).replace(places, on_select);
  }
}

/// Rebuilds list and markers for each batch; nothing carries over between batches.
#[derive(Debug, Clone, Copy)]
pub struct PlacesRenderer {
  clear_markers: bool,
}

impl PlacesRenderer {
  pub fn new(clear_markers: bool) -> Self {
    Self { clear_markers }
  }

  pub fn render<M, D, L>(
    &self,
    session: &Session<M, D>,
    list: &L,
    places: Vec<Place>,
    on_select: SelectHandler,
  ) where
    M: MapSurface,
    L: PlaceList + ?Sized,
  {
    debug!("rendering {} places", places.len());
    if self.clear_markers {
      session.clear_markers();
    }
    let markers = places
      .iter()
      .map(|place| {
        let on_select = on_select.clone();
        let selected = place.clone();
        session.map().place_marker(
          place.coordinate(),
          &place.name,
          Rc::new(move || on_select(selected.clone())),
        )
      })
      .collect_vec();
    session.add_markers(markers);
    list.replace(places, on_select);
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::test_support::{sample_places, FakeDirections, FakeMap, RecordingList};
  use crate::Coordinate;

  fn session() -> Session<FakeMap, FakeDirections> {
    Session::new(FakeMap::default(), FakeDirections::default(), Coordinate::new(37.0, -122.0))
  }

  #[test]
  fn renders_one_entry_and_marker_per_place_in_order() {
    let session = session();
    let list = RecordingList::default();
    let places = sample_places();

    PlacesRenderer::new(true).render(&session, &list, places.clone(), Rc::new(|_| {}));

    assert_eq!(list.places(), places);
    assert_eq!(session.marker_count(), 3);
    let titles = session.map().placed().into_iter().skip(1).map(|(at, title)| (title, at));
    assert_eq!(
      titles.collect_vec(),
      places.iter().map(|place| (place.name.clone(), place.coordinate())).collect_vec()
    );
  }

  #[test]
  fn new_batch_replaces_the_previous_one() {
    let session = session();
    let list = RecordingList::default();
    let renderer = PlacesRenderer::new(true);

    renderer.render(&session, &list, sample_places(), Rc::new(|_| {}));
    let second = vec![sample_places().remove(2)];
    renderer.render(&session, &list, second.clone(), Rc::new(|_| {}));

    assert_eq!(list.places(), second);
    assert_eq!(session.marker_count(), 1);
    // User marker plus the single marker of the second batch.
    assert_eq!(session.map().live_markers(), 2);
  }

  #[test]
  fn markers_accumulate_when_clearing_is_off() {
    let session = session();
    let list = RecordingList::default();
    let renderer = PlacesRenderer::new(false);

    renderer.render(&session, &list, sample_places(), Rc::new(|_| {}));
    renderer.render(&session, &list, sample_places(), Rc::new(|_| {}));

    assert_eq!(list.places().len(), 3);
    assert_eq!(session.marker_count(), 6);
  }

  #[test]
  fn marker_and_list_share_the_selection_handler() {
    let session = session();
    let list = RecordingList::default();
    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = picked.clone();

    PlacesRenderer::new(true).render(
      &session,
      &list,
      sample_places(),
      Rc::new(move |place: Place| sink.borrow_mut().push(place.name)),
    );
    // Marker 0 is the user marker.
    session.map().click(2);
    list.select(0);

    assert_eq!(*picked.borrow(), vec!["Tartine".to_string(), "Blue Bottle".to_string()]);
  }

  #[test]
  fn entry_defaults_missing_metadata() {
    let mut place = sample_places().remove(1);
    place.price_level = None;
    place.open_now = None;
    place.vicinity = None;
    let entry = PlaceEntry::from(&place);
    assert_eq!(entry.price_level, "N/A");
    assert_eq!(entry.open_now, "N/A");
    assert_eq!(
      entry.summary(),
      "Tartine Rating: 4.6 Number of Ratings: 5120 Price Level: N/A Open Now: N/A"
    );
  }

  #[test]
  fn entry_summary_includes_vicinity() {
    let entry = PlaceEntry::from(&sample_places()[0]);
    assert_eq!(
      entry.summary(),
      "Blue Bottle - 66 Mint St Rating: 4.5 Number of Ratings: 812 Price Level: 2 Open Now: Yes"
    );
  }
}
