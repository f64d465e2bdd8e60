use leptos::prelude::*;
use reactive_stores::Store;

use crate::app::{Phase, State, StateStoreFields};

#[component]
pub fn StatusBar(#[prop(into)] state: Store<State>) -> impl IntoView {
  view! {
    <div class="status_bar">
      <span class="phase" class:failed=move || matches!(state.phase().get(), Phase::Failed(_))>
        {move || state.phase().get().message()}
      </span>
      {move || {
        state.updated_at().get().map(|at| {
          view! { <span class="updated">{format!("Updated {}", at.format("%H:%M:%S"))}</span> }
        })
      }}
    </div>
  }
}
