use std::rc::Rc;

use leptos::prelude::*;
use log::info;
use reactive_stores::Store;

use crate::app::{bootstrap, PlacesPanel, State};
use crate::components::places_list::PlacesList;
use crate::components::status_bar::StatusBar;
use crate::config::AppConfig;

#[component]
pub fn App() -> impl IntoView {
  let config = Rc::new(AppConfig::from_page());
  info!("starting with {:?} sync and {:?} selection", config.sync_protocol, config.selection);
  let state = Store::new(State::default());
  let panel = PlacesPanel::new(state);
  let container = config.map_container.clone();
  let style = config.list_style;

  // The map container has to be in the document before the flow reaches the map.
  request_animation_frame(move || bootstrap(config, panel));

  view! {
    <div id="app">
      <StatusBar state />
      <main class="main">
        <div id=container class="map"></div>
        <PlacesList panel style />
      </main>
    </div>
  }
}
