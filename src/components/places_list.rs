use leptos::{either::Either, prelude::*};

use crate::app::{PlacesPanel, StateStoreFields};
use crate::components::place_card::PlaceCard;
use crate::config::ListStyle;
use crate::places::PlaceEntry;

#[component]
pub fn PlacesList(panel: PlacesPanel, style: ListStyle) -> impl IntoView {
  let state = panel.state();
  view! {
    <ol id="places-list" class="places">
      {move || {
        state
          .places()
          .get()
          .into_iter()
          .map(|place| {
            let entry = PlaceEntry::from(&place);
            let select = move |_| panel.select(place.clone());
            match style {
              ListStyle::Plain => {
                Either::Left(view! { <li class="place" on:click=select>{entry.summary()}</li> })
              }
              ListStyle::Cards => {
                Either::Right(
                  view! {
                    <li class="place" on:click=select>
                      <PlaceCard entry {..} class="card" />
                    </li>
                  },
                )
              }
            }
          })
          .collect_view()
      }}
    </ol>
  }
}
