pub mod app;
pub mod place_card;
pub mod places_list;
pub mod status_bar;
