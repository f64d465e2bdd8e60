use leptos::prelude::*;
use nearby_places_ui::components::app::App;

fn main() {
  console_error_panic_hook::set_once();
  let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
  if console_log::init_with_level(level).is_err() {
    leptos::logging::warn!("logger was already initialised");
  }
  mount_to_body(App)
}
