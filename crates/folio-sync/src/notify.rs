//! Transient user-facing notifications ("toasts").

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Success,
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level:   Level,
  pub message: String,
}

/// Where editors report the outcome of user actions.
pub trait Notifier: Send + Sync {
  fn notify(&self, notice: Notice);

  fn success(&self, message: &str) {
    self.notify(Notice { level: Level::Success, message: message.to_owned() });
  }

  fn info(&self, message: &str) {
    self.notify(Notice { level: Level::Info, message: message.to_owned() });
  }

  fn error(&self, message: &str) {
    self.notify(Notice { level: Level::Error, message: message.to_owned() });
  }
}

/// Emits notices as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, notice: Notice) {
    match notice.level {
      Level::Success | Level::Info => tracing::info!(target: "folio::notice", "{}", notice.message),
      Level::Error => tracing::warn!(target: "folio::notice", "{}", notice.message),
    }
  }
}
