//! Transient user-facing notifications.
//!
//! Store operations report their outcomes here instead of returning
//! errors to the caller. The view layer owns the receiving end and
//! renders each notice as a short-lived toast; none of them are fatal.

use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A single notice for the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Sending half of the notice channel, cheap to clone into every store.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    /// Create a notifier and the receiver the view layer drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&self, severity: Severity, message: String) {
        debug!(?severity, %message, "notice");
        // A dropped receiver just means nobody is rendering notices.
        let _ = self.tx.send(Notice { severity, message });
    }
}
