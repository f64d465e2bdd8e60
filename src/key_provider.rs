use std::cell::RefCell;

use log::{error, info};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::storage::KeyCache;
use crate::transport::{HttpReply, Transport};
use crate::{ApiKey, Error, Result};

#[derive(Debug, Deserialize)]
struct KeyReply {
  #[serde(alias = "apiKey")]
  key: Option<String>,
  error: Option<String>,
}

/// Accepts both `{"key": ..}` and `{"apiKey": ..}`.
pub fn parse_key_reply(reply: &HttpReply) -> Result<ApiKey> {
  let body: KeyReply = reply.decode()?;
  if let Some(message) = body.error {
    return Err(Error::Backend(message));
  }
  if !reply.is_success() {
    return Err(Error::Http { status: reply.status });
  }
  body.key.filter(|key| !key.is_empty()).map(ApiKey::from).ok_or(Error::MissingField("key"))
}

/// Hands out the map key, asking the backend at most once per page.
pub struct KeyProvider<T, C> {
  transport: T,
  cache: C,
  endpoint: String,
  cache_entry: Option<String>,
  resolved: RefCell<Option<ApiKey>>,
}

impl<T: Transport, C: KeyCache> KeyProvider<T, C> {
  pub fn new(transport: T, cache: C, config: &AppConfig) -> Self {
    Self {
      transport,
      cache,
      endpoint: config.key_endpoint.clone(),
      cache_entry: config.cache_api_key.then(|| config.key_cache_entry.clone()),
      resolved: RefCell::new(None),
    }
  }

  pub async fn api_key(&self) -> Result<ApiKey> {
    if let Some(key) = self.resolved.borrow().clone() {
      return Ok(key);
    }
    if let Some(key) = self.cache_entry.as_deref().and_then(|entry| self.cache.load(entry)) {
      info!("using cached map key");
      let key = ApiKey::from(key);
      self.resolved.replace(Some(key.clone()));
      return Ok(key);
    }

    info!("fetching map key from {}", self.endpoint);
    let key = self
      .transport
      .get(&self.endpoint)
      .await
      .and_then(|reply| parse_key_reply(&reply))
      .inspect_err(|err| error!("could not obtain map key: {err}"))?;
    if let Some(entry) = &self.cache_entry {
      // A key that cannot be persisted is still good for this page.
      if let Err(err) = self.cache.store(entry, key.as_str()) {
        error!("could not cache map key: {err}");
      }
    }
    self.resolved.replace(Some(key.clone()));
    Ok(key)
  }
}
