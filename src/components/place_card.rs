use leptos::prelude::*;

use crate::places::PlaceEntry;

#[component]
pub fn PlaceCard(entry: PlaceEntry) -> impl IntoView {
  view! {
    <div>
      <h2>{entry.name}</h2>
      {entry.vicinity.map(|vicinity| view! { <p class="vicinity">{vicinity}</p> })}
      <p>
        <strong>"Rating:"</strong>
        {format!("{} ({} ratings)", entry.rating, entry.rating_count)}
      </p>
      <p>
        <strong>"Price Level:"</strong>
        {entry.price_level}
      </p>
      <p>
        <strong>"Open Now:"</strong>
        {entry.open_now}
      </p>
    </div>
  }
}
