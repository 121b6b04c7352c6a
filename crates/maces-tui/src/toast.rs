//! Short-lived on-screen messages.
//!
//! Each message stays up for a fixed three seconds and then disappears on
//! its own. Messages are independent: there is no queue limit and no
//! de-duplication, so several can be on screen at once.

use std::time::{Duration, Instant};

use tracing::info;

/// How long a message stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    created_at: Instant,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= TOAST_DURATION
    }
}

#[derive(Debug, Default)]
pub struct Toasts {
    entries: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a message for `TOAST_DURATION` starting now
    pub fn log(&mut self, message: impl Into<String>) {
        self.log_at(message, Instant::now());
    }

    pub fn log_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        info!("{}", message);
        self.entries.push(Toast {
            message,
            created_at: now,
        });
    }

    /// Drop every message whose time is up
    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|t| !t.is_expired(now));
    }

    /// Messages currently on screen, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|t| t.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
