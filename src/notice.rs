use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use tracing::{info, warn};
/// One-shot messages meant for the user, emitted when initialization settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
  Initialized,
  InitializationFailed,
}
impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Notice::Initialized => write!(f, "Speech is ready"),
      Notice::InitializationFailed => write!(f, "Failed to initialize speech"),
    }
  }
}
pub trait Notifier: Send + Sync {
  fn notify(&self, notice: Notice);
}
impl<F> Notifier for F
where
  F: Fn(Notice) + Send + Sync,
{
  fn notify(&self, notice: Notice) {
    self(notice);
  }
}
#[derive(Debug, Default)]
pub struct LogNotifier;
impl Notifier for LogNotifier {
  fn notify(&self, notice: Notice) {
    match notice {
      Notice::Initialized => info!("{notice}"),
      Notice::InitializationFailed => warn!("{notice}"),
    }
  }
}
/// Holds notices until the UI drains them, for shells that poll instead of
/// receiving callbacks.
#[derive(Debug, Default)]
pub struct QueuedNotifier {
  notices: Mutex<VecDeque<Notice>>,
}
impl QueuedNotifier {
  pub fn pop(&self) -> Option<Notice> {
    self
      .notices
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner)
      .pop_front()
  }
}
impl Notifier for QueuedNotifier {
  fn notify(&self, notice: Notice) {
    LogNotifier.notify(notice);
    self
      .notices
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner)
      .push_back(notice);
  }
}
