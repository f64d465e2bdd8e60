use log::error;

/// Blocking, user-visible notice.
pub trait Notifier {
  fn notify(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
  fn notify(&self, message: &str) {
    let shown = web_sys::window().map(|window| window.alert_with_message(message));
    if !matches!(shown, Some(Ok(()))) {
      error!("could not show notice: {message}");
    }
  }
}
