use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use web_sys::Storage;

use crate::{Error, Result};

/// Persistent string cache used for the map key.
pub trait KeyCache {
  fn load(&self, entry: &str) -> Option<String>;
  fn store(&self, entry: &str, value: &str) -> Result<()>;
}

impl<C: KeyCache + ?Sized> KeyCache for Box<C> {
  fn load(&self, entry: &str) -> Option<String> {
    (**self).load(entry)
  }

  fn store(&self, entry: &str, value: &str) -> Result<()> {
    (**self).store(entry, value)
  }
}

impl<C: KeyCache + ?Sized> KeyCache for Rc<C> {
  fn load(&self, entry: &str) -> Option<String> {
    (**self).load(entry)
  }

  fn store(&self, entry: &str, value: &str) -> Result<()> {
    (**self).store(entry, value)
  }
}

pub struct LocalStorageCache(Storage);

impl LocalStorageCache {
  pub fn open() -> Option<Self> {
    web_sys::window()?.local_storage().ok().flatten().map(Self)
  }
}

impl KeyCache for LocalStorageCache {
  fn load(&self, entry: &str) -> Option<String> {
    self.0.get_item(entry).ok().flatten().filter(|value| !value.is_empty())
  }

  fn store(&self, entry: &str, value: &str) -> Result<()> {
    self.0.set_item(entry, value).map_err(|err| Error::Storage(format!("{err:?}")))
  }
}

/// Page-lifetime cache, used when `localStorage` is disabled.
#[derive(Debug, Default)]
pub struct MemoryCache(RefCell<HashMap<String, String>>);

impl KeyCache for MemoryCache {
  fn load(&self, entry: &str) -> Option<String> {
    self.0.borrow().get(entry).cloned()
  }

  fn store(&self, entry: &str, value: &str) -> Result<()> {
    self.0.borrow_mut().insert(entry.to_string(), value.to_string());
    Ok(())
  }
}

pub fn browser_cache() -> Box<dyn KeyCache> {
  match LocalStorageCache::open() {
    Some(cache) => Box::new(cache),
    None => {
      warn!("localStorage unavailable, the map key will not outlive this page");
      Box::new(MemoryCache::default())
    }
  }
}
