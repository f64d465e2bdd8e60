use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Function, Promise};
use web_sys::{Geolocation, Position, PositionError};

use crate::{Coordinate, Error, Result};

fn position_error(value: JsValue) -> Error {
  match value.dyn_into::<PositionError>() {
    Ok(err) => Error::Location { code: err.code(), message: err.message() },
    Err(other) => Error::from(other),
  }
}

/// Asks the browser for the device position once.
pub async fn current_location() -> Result<Coordinate> {
  let geolocation: Geolocation = web_sys::window()
    .ok_or(Error::GeolocationUnsupported)?
    .navigator()
    .geolocation()
    .map_err(|_| Error::GeolocationUnsupported)?;
  // The getter hands back `undefined` rather than failing when the API is absent.
  if geolocation.is_undefined() {
    return Err(Error::GeolocationUnsupported);
  }

  let resolved = Promise::new(&mut |resolve: Function, reject: Function| {
    if let Err(err) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject))
    {
      let _ = reject.call1(&JsValue::NULL, &err);
    }
  });
  let position: Position = JsFuture::from(resolved)
    .await
    .map_err(position_error)
    .inspect_err(|err| error!("geolocation error: {err}"))?
    .unchecked_into();

  let coords = position.coords();
  let coord = Coordinate::new(coords.latitude(), coords.longitude());
  info!("located user at ({}, {})", coord.latitude, coord.longitude);
  Ok(coord)
}
