use log::{debug, error, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Function, Promise, Reflect};
use web_sys::{HtmlScriptElement, Window};

use crate::config::AppConfig;
use crate::{ApiKey, Error, Result};

pub fn sdk_script_url(base: &str, key: &ApiKey, libraries: &[String]) -> String {
  let mut url = format!("{base}?key={key}");
  if !libraries.is_empty() {
    url.push_str("&libraries=");
    url.push_str(&libraries.join(","));
  }
  url
}

fn sdk_present(window: &Window) -> bool {
  Reflect::get(window, &JsValue::from_str("google"))
    .ok()
    .filter(JsValue::is_object)
    .and_then(|google| Reflect::get(&google, &JsValue::from_str("maps")).ok())
    .is_some_and(|maps| maps.is_object())
}

/// Injects the map SDK script and resolves once it has loaded.
///
/// There is no timeout: a script that never finishes loading leaves this pending.
pub async fn load_map_sdk(key: &ApiKey, config: &AppConfig) -> Result<()> {
  let window = web_sys::window().ok_or_else(|| Error::Js("no window".into()))?;
  if sdk_present(&window) {
    debug!("map SDK already present");
    return Ok(());
  }
  let document = window.document().ok_or_else(|| Error::Js("no document".into()))?;
  let head = document.head().ok_or_else(|| Error::Js("document has no <head>".into()))?;

  let script: HtmlScriptElement = document
    .create_element("script")?
    .dyn_into()
    .map_err(|_| Error::Js("<script> is not an HtmlScriptElement".into()))?;
  script.set_src(&sdk_script_url(&config.sdk_url, key, &config.sdk_libraries));
  script.set_async(true);
  script.set_defer(true);

  let loaded = Promise::new(&mut |resolve: Function, reject: Function| {
    script.set_onload(Some(&resolve));
    script.set_onerror(Some(&reject));
  });
  head.append_child(&script)?;

  let outcome = JsFuture::from(loaded).await;
  script.set_onload(None);
  script.set_onerror(None);
  outcome.map_err(|_| {
    error!("map SDK failed to load");
    Error::SdkLoad(config.sdk_url.clone())
  })?;
  info!("map SDK loaded");
  Ok(())
}
