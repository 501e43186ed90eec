// src/engine/listeners.rs

//! Subscription points for queue notifications.
//!
//! Notifications are fire-and-forget: listeners registered after a
//! notification fired never see it.

use std::fmt;

use tracing::error;

use crate::errors::QueueError;
use crate::store::Store;

type EndListener = Box<dyn FnMut(&Store) + Send>;
type ErrorListener = Box<dyn FnMut(&QueueError) + Send>;

#[derive(Default)]
pub struct Listeners {
    end: Vec<EndListener>,
    error: Vec<ErrorListener>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("end", &self.end.len())
            .field("error", &self.error.len())
            .finish()
    }
}

impl Listeners {
    pub fn on_end(&mut self, listener: impl FnMut(&Store) + Send + 'static) {
        self.end.push(Box::new(listener));
    }

    pub fn on_error(&mut self, listener: impl FnMut(&QueueError) + Send + 'static) {
        self.error.push(Box::new(listener));
    }

    /// Call every `end` listener, in registration order.
    pub fn notify_end(&mut self, store: &Store) {
        for listener in &mut self.end {
            listener(store);
        }
    }

    /// Call every `error` listener, in registration order.
    ///
    /// With no listener attached the failure would go unnoticed, so it is
    /// logged instead.
    pub fn notify_error(&mut self, err: &QueueError) {
        if self.error.is_empty() {
            error!(
                title = %err.title,
                status_code = err.status_code,
                message = %err.message,
                "queue failed with no error listener attached"
            );
            return;
        }

        for listener in &mut self.error {
            listener(err);
        }
    }
}
