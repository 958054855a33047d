//! User-facing notifications.

use std::sync::Mutex;

/// Shown when the stock service cannot cover the requested amount.
pub const UNAVAILABLE: &str = "Requested quantity unavailable";
/// Shown when adding a new product fails for any other reason.
pub const ADD_FAILED: &str = "Error adding product";
/// Shown when removing a product fails.
pub const REMOVE_FAILED: &str = "Error removing product";
/// Shown when changing a product's amount fails for any other reason.
pub const UPDATE_FAILED: &str = "Error updating product quantity";

/// Sink for messages meant for the user, such as a toast.
///
/// Fire-and-forget: the cart never looks at what happens to a message.
pub trait Notifier: Send + Sync {
    /// Report an error to the user.
    fn error(&self, message: &str);
}

/// Notifier that forwards messages to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocket_cart::notify", "{}", message);
    }
}

/// Notifier that keeps every message, for UIs that poll and for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create a notifier with no messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Drain the received messages.
    pub fn take(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
