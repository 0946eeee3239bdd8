use tracing::{error, info};

/// User-facing notifications (the toast layer of a UI).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Sends notifications to the log. Used when there is no UI.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "agenda::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "agenda::notify", "{message}");
    }
}
