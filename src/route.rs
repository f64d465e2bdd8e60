use log::{error, info};

use crate::config::SelectionAction;
use crate::notice::Notifier;
use crate::session::{Directions, MapSurface, Session};
use crate::{Place, Result};

/// Reacts to a picked place with exactly one map action.
#[derive(Debug, Clone, Copy)]
pub struct RouteHighlighter {
  action: SelectionAction,
}

impl RouteHighlighter {
  pub fn new(action: SelectionAction) -> Self {
    Self { action }
  }

  pub async fn highlight<M, D, N>(
    &self,
    session: &Session<M, D>,
    notifier: &N,
    place: &Place,
  ) -> Result<()>
  where
    M: MapSurface,
    D: Directions,
    N: Notifier + ?Sized,
  {
    let destination = place.coordinate();
    match self.action {
      SelectionAction::Pan { zoom } => {
        info!("focusing {}", place.name);
        session.map().focus(destination, zoom);
        Ok(())
      }
      SelectionAction::Route { travel_mode } => {
        info!("routing to {} ({travel_mode})", place.name);
        let routed =
          session.directions().show_route(session.origin(), destination, travel_mode).await;
        if let Err(err) = &routed {
          error!("route to {} failed: {err}", place.name);
          if let Some(notice) = err.user_notice() {
            notifier.notify(&notice);
          }
        }
        routed
      }
    }
  }
}
