// mapty-lib/src/notify.rs
use std::collections::VecDeque;

/// Blocking message to the user.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Collects alerts for the frontend to show one at a time.
#[derive(Debug, Clone, Default)]
pub struct AlertQueue {
    pending: VecDeque<String>,
}

impl AlertQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next alert to show, oldest first.
    pub fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.pending.drain(..)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Notifier for AlertQueue {
    fn alert(&mut self, message: &str) {
        self.pending.push_back(message.to_string());
    }
}
