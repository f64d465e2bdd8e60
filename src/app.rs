use std::rc::Rc;

use better_default::Default;
use chrono::{DateTime, Local};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};
use reactive_stores::Store;

use crate::config::{AppConfig, SyncProtocol};
use crate::geolocation::current_location;
use crate::google::{open_session, BrowserSession};
use crate::key_provider::KeyProvider;
use crate::map_loader::load_map_sdk;
use crate::notice::{AlertNotifier, Notifier};
use crate::places::{PlaceList, PlacesRenderer, SelectHandler};
use crate::route::RouteHighlighter;
use crate::session::{Directions, MapSurface, Session};
use crate::storage::browser_cache;
use crate::sync::{PlaceSync, PushChannel, PushFilter, SyncReply};
use crate::transport::{FetchTransport, Transport};
use crate::{Coordinate, Error, Place, Result};

/// Where the page is in its start-up sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
  FetchingKey,
  LoadingMap,
  Locating,
  Syncing,
  AwaitingPush,
  Ready,
  Failed(String),
}

impl Phase {
  /// Phase once the backend has answered the push request. A batch that
  /// already arrived on the channel keeps the page `Ready`.
  pub fn acknowledged(self, awaiting_push: bool) -> Phase {
    match (self, awaiting_push) {
      (Self::Syncing, true) => Self::AwaitingPush,
      (Self::Syncing | Self::AwaitingPush, false) => Self::Ready,
      (current, _) => current,
    }
  }

  pub fn message(&self) -> String {
    match self {
      Self::FetchingKey => "Fetching map key…".into(),
      Self::LoadingMap => "Loading map…".into(),
      Self::Locating => "Finding your location…".into(),
      Self::Syncing => "Looking for nearby places…".into(),
      Self::AwaitingPush => "Waiting for nearby places…".into(),
      Self::Ready => String::new(),
      Self::Failed(reason) => reason.clone(),
    }
  }
}

#[derive(Default, Store)]
pub struct State {
  #[default(Phase::FetchingKey)]
  pub phase: Phase,
  pub places: Vec<Place>,
  pub updated_at: Option<DateTime<Local>>,
}

/// The rendered list: the store's `places` plus the handler its entries select through.
#[derive(Clone, Copy)]
pub struct PlacesPanel {
  state: Store<State>,
  handler: StoredValue<Option<SelectHandler>, LocalStorage>,
}

impl PlacesPanel {
  pub fn new(state: Store<State>) -> Self {
    Self { state, handler: StoredValue::new_local(None) }
  }

  pub fn state(&self) -> Store<State> {
    self.state
  }

  pub fn select(&self, place: Place) {
    if let Some(handler) = self.handler.get_value() {
      handler(place);
    }
  }

  pub fn phase(&self) -> Phase {
    self.state.phase().get_untracked()
  }

  pub fn set_phase(&self, phase: Phase) {
    self.state.phase().set(phase);
  }
}

impl PlaceList for PlacesPanel {
  fn replace(&self, places: Vec<Place>, on_select: SelectHandler) {
    self.handler.set_value(Some(on_select));
    self.state.places().set(places);
    self.state.updated_at().set(Some(Local::now()));
  }
}

/// Turns place batches into list entries and markers for one session.
pub struct PlaceFinder<T, M: MapSurface, D, L> {
  sync: PlaceSync<T>,
  session: Rc<Session<M, D>>,
  renderer: PlacesRenderer,
  list: L,
  on_select: SelectHandler,
}

impl<T, M, D, L> PlaceFinder<T, M, D, L>
where
  T: Transport,
  M: MapSurface,
  L: PlaceList,
{
  pub fn new(
    sync: PlaceSync<T>,
    session: Rc<Session<M, D>>,
    renderer: PlacesRenderer,
    list: L,
    on_select: SelectHandler,
  ) -> Self {
    Self { sync, session, renderer, list, on_select }
  }

  pub fn show(&self, places: Vec<Place>) {
    self.renderer.render(&self.session, &self.list, places, self.on_select.clone());
  }

  /// Request/response exchange; the previous batch stays on screen when it fails.
  pub async fn refresh(&self, coord: Coordinate) -> Result<usize> {
    let places = self.sync.sync(coord).await?;
    let count = places.len();
    self.show(places);
    Ok(count)
  }

  /// Push exchange; returns `true` when places are still expected on the push channel.
  pub async fn request(&self, coord: Coordinate) -> Result<bool> {
    match self.sync.sync_async(coord).await? {
      SyncReply::Places(places) => {
        self.show(places);
        Ok(false)
      }
      SyncReply::Accepted { .. } => Ok(true),
    }
  }
}

/// Selection handler: runs the configured map action on its own task.
pub fn selection_handler<M, D, N>(
  session: Rc<Session<M, D>>,
  highlighter: RouteHighlighter,
  notifier: Rc<N>,
) -> SelectHandler
where
  M: MapSurface + 'static,
  D: Directions + 'static,
  N: Notifier + 'static,
{
  Rc::new(move |place: Place| {
    let session = session.clone();
    let notifier = notifier.clone();
    spawn_local(async move {
      if let Err(err) = highlighter.highlight(&session, notifier.as_ref(), &place).await {
        debug!("selection of {} left the map unchanged: {err}", place.name);
      }
    });
  })
}

/// Shows the blocking notice for failures the user has to act on.
pub fn notify_failure<N: Notifier + ?Sized>(err: &Error, notifier: &N) {
  if let Some(notice) = err.user_notice() {
    notifier.notify(&notice);
  }
}

async fn start(config: Rc<AppConfig>, panel: PlacesPanel) -> Result<()> {
  let notifier = Rc::new(AlertNotifier);
  let transport = Rc::new(FetchTransport);

  panel.set_phase(Phase::FetchingKey);
  let keys = KeyProvider::new(transport.clone(), browser_cache(), &config);
  let key = keys.api_key().await?;

  panel.set_phase(Phase::LoadingMap);
  load_map_sdk(&key, &config).await?;

  panel.set_phase(Phase::Locating);
  let origin =
    current_location().await.inspect_err(|err| notify_failure(err, notifier.as_ref()))?;

  let session: Rc<BrowserSession> =
    Rc::new(open_session(&config.map_container, origin, config.initial_zoom)?);
  let on_select =
    selection_handler(session.clone(), RouteHighlighter::new(config.selection), notifier);
  let filter = Rc::new(PushFilter::new(config.correlate_push_by_coordinates));
  let finder = Rc::new(PlaceFinder::new(
    PlaceSync::new(transport, config.sync_endpoint.clone(), filter.clone()),
    session,
    PlacesRenderer::new(config.clear_markers_on_render),
    panel,
    on_select,
  ));

  match config.sync_protocol {
    SyncProtocol::RequestResponse => {
      panel.set_phase(Phase::Syncing);
      let count = finder.refresh(origin).await?;
      info!("showing {count} nearby places");
      panel.set_phase(Phase::Ready);
    }
    SyncProtocol::Push => {
      let channel = PushChannel::for_page(&config.push_path, filter)?;
      let listener = finder.clone();
      spawn_local(async move {
        let listened = channel
          .listen(move |places| {
            listener.show(places);
            panel.set_phase(Phase::Ready);
          })
          .await;
        if let Err(err) = listened {
          error!("push channel ended: {err}");
        }
      });
      panel.set_phase(Phase::Syncing);
      let awaiting_push = finder.request(origin).await?;
      panel.set_phase(panel.phase().acknowledged(awaiting_push));
    }
  }
  Ok(())
}

/// Runs the whole page flow once; a failed step is logged and shown in the status bar.
pub fn bootstrap(config: Rc<AppConfig>, panel: PlacesPanel) {
  spawn_local(async move {
    if let Err(err) = start(config, panel).await {
      error!("{err}");
      panel.set_phase(Phase::Failed(err.user_notice().unwrap_or_else(|| err.to_string())));
    }
  });
}
