use std::cell::Cell;
use std::rc::Rc;

use futures::StreamExt;
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::transport::{HttpReply, Transport};
use crate::{Coordinate, Error, Place, Result};

/// Decimal places the backend keeps when it echoes coordinates back.
const BACKEND_PRECISION: i32 = 4;

#[derive(Debug, Deserialize)]
struct SyncBody {
  #[serde(alias = "ranked_places")]
  places: Option<Vec<Place>>,
  status: Option<String>,
  error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncReply {
  Places(Vec<Place>),
  /// The backend took the coordinates; results follow on the push channel.
  Accepted { status: String },
}

pub fn parse_sync_reply(reply: &HttpReply) -> Result<SyncReply> {
  let body: SyncBody = reply.decode()?;
  if let Some(message) = body.error {
    return Err(Error::Backend(message));
  }
  if !reply.is_success() {
    return Err(Error::Http { status: reply.status });
  }
  match (body.places, body.status) {
    (Some(places), _) => Ok(SyncReply::Places(places)),
    (None, Some(status)) => Ok(SyncReply::Accepted { status }),
    (None, None) => Err(Error::MissingField("places")),
  }
}

/// A batch delivered over the push channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PushMessage {
  pub latitude: f64,
  pub longitude: f64,
  pub places: Vec<Place>,
}

impl PushMessage {
  pub fn coordinate(&self) -> Coordinate {
    Coordinate::new(self.latitude, self.longitude)
  }
}

/// Decides which pushed batches answer the last request.
///
/// Pushed batches carry no request id. Without correlation every well-formed
/// batch is taken; with it, only batches echoing the last request's
/// coordinates (at backend precision) are.
#[derive(Debug, Default)]
pub struct PushFilter {
  correlate: bool,
  expected: Cell<Option<Coordinate>>,
}

impl PushFilter {
  pub fn new(correlate: bool) -> Self {
    Self { correlate, expected: Cell::new(None) }
  }

  pub fn expect(&self, coord: Coordinate) {
    self.expected.set(Some(coord.rounded(BACKEND_PRECISION)));
  }

  pub fn accepts(&self, message: &PushMessage) -> bool {
    if !self.correlate {
      return true;
    }
    self.expected.get() == Some(message.coordinate().rounded(BACKEND_PRECISION))
  }

  /// Places from one inbound text frame, or `None` when the frame is dropped.
  pub fn admit(&self, text: &str) -> Option<Vec<Place>> {
    match serde_json::from_str::<PushMessage>(text) {
      Ok(message) if self.accepts(&message) => Some(message.places),
      Ok(message) => {
        debug!(
          "dropping pushed batch for ({}, {}): no matching request",
          message.latitude, message.longitude
        );
        None
      }
      Err(err) => {
        error!("malformed push message: {err}");
        None
      }
    }
  }
}

/// Sends the user's coordinates to the backend.
pub struct PlaceSync<T> {
  transport: T,
  endpoint: String,
  filter: Rc<PushFilter>,
}

impl<T: Transport> PlaceSync<T> {
  pub fn new(transport: T, endpoint: impl Into<String>, filter: Rc<PushFilter>) -> Self {
    Self { transport, endpoint: endpoint.into(), filter }
  }

  async fn post(&self, coord: Coordinate) -> Result<SyncReply> {
    let body = serde_json::to_string(&coord)?;
    self
      .transport
      .post_json(&self.endpoint, body)
      .await
      .and_then(|reply| parse_sync_reply(&reply))
      .inspect_err(|err| error!("error fetching nearby places: {err}"))
  }

  /// Request/response exchange: the reply must carry the places.
  pub async fn sync(&self, coord: Coordinate) -> Result<Vec<Place>> {
    match self.post(coord).await? {
      SyncReply::Places(places) => {
        info!("received {} places", places.len());
        Ok(places)
      }
      SyncReply::Accepted { status } => {
        error!("expected places, backend answered with status {status:?}");
        Err(Error::MissingField("places"))
      }
    }
  }

  /// Push exchange: the reply is normally an acknowledgment and the places
  /// arrive on the push channel.
  pub async fn sync_async(&self, coord: Coordinate) -> Result<SyncReply> {
    self.filter.expect(coord);
    let reply = self.post(coord).await?;
    if let SyncReply::Accepted { status } = &reply {
      info!("coordinates accepted ({status}), waiting for pushed places");
    }
    Ok(reply)
  }
}

/// `ws:`/`wss:` URL of the push channel, following the page's own scheme.
pub fn push_channel_url(page_protocol: &str, host: &str, path: &str) -> String {
  if path.starts_with("ws://") || path.starts_with("wss://") {
    return path.to_string();
  }
  let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
  format!("{scheme}://{host}{path}")
}

/// Persistent channel over which the backend pushes place batches.
pub struct PushChannel {
  url: String,
  socket: WebSocket,
  filter: Rc<PushFilter>,
}

impl PushChannel {
  /// Opens the socket immediately; frames received before `listen` runs are buffered.
  pub fn open(url: String, filter: Rc<PushFilter>) -> Result<Self> {
    let socket = WebSocket::open(&url).map_err(|err| Error::Push(err.to_string()))?;
    info!("push channel opening at {url}");
    Ok(Self { url, socket, filter })
  }

  pub fn for_page(path: &str, filter: Rc<PushFilter>) -> Result<Self> {
    let location = web_sys::window().ok_or_else(|| Error::Js("no window".into()))?.location();
    let url = push_channel_url(&location.protocol()?, &location.host()?, path);
    Self::open(url, filter)
  }

  /// Runs until the server closes the channel, handing every admitted batch to `on_batch`.
  pub async fn listen(self, on_batch: impl Fn(Vec<Place>)) -> Result<()> {
    let Self { url, mut socket, filter } = self;
    while let Some(frame) = socket.next().await {
      match frame {
        Ok(Message::Text(text)) => {
          if let Some(places) = filter.admit(&text) {
            on_batch(places);
          }
        }
        Ok(Message::Bytes(_)) => warn!("ignoring binary push frame"),
        Err(err) => {
          error!("push channel {url} failed: {err}");
          return Err(Error::Push(err.to_string()));
        }
      }
    }
    info!("push channel {url} closed");
    Ok(())
  }
}
