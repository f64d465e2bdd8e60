use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::Request;
use log::debug;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Status and raw body of a backend reply.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
  pub status: u16,
  pub body: String,
}

impl HttpReply {
  pub fn ok(body: impl Into<String>) -> Self {
    Self { status: 200, body: body.into() }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  /// Parses the body as JSON. A body that fails to parse on an error status
  /// is reported as that status rather than as a parse error.
  pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
    serde_json::from_str(&self.body).map_err(|err| {
      if self.is_success() {
        Error::Malformed(err)
      } else {
        Error::Http { status: self.status }
      }
    })
  }
}

/// HTTP access to the backend, kept behind a trait so the clients can be driven by a mock.
#[async_trait(?Send)]
pub trait Transport {
  async fn get(&self, path: &str) -> Result<HttpReply>;
  async fn post_json(&self, path: &str, body: String) -> Result<HttpReply>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
  async fn get(&self, path: &str) -> Result<HttpReply> {
    (**self).get(path).await
  }

  async fn post_json(&self, path: &str, body: String) -> Result<HttpReply> {
    (**self).post_json(path, body).await
  }
}

/// `fetch`-backed transport for the page's own origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
  async fn get(&self, path: &str) -> Result<HttpReply> {
    debug!("GET {path}");
    let response = Request::get(path).send().await?;
    Ok(HttpReply { status: response.status(), body: response.text().await? })
  }

  async fn post_json(&self, path: &str, body: String) -> Result<HttpReply> {
    debug!("POST {path}");
    let response =
      Request::post(path).header("Content-Type", "application/json").body(body)?.send().await?;
    Ok(HttpReply { status: response.status(), body: response.text().await? })
  }
}
