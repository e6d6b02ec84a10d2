//! Advisory toast notifications.
//!
//! Every failure in the controller is scoped to a single attempted
//! operation and surfaces here; nothing is fatal. Technical detail goes to
//! the console, the toast carries the user-facing part.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::{StreamExt, select};

use crate::dataflow::{ActorVec, Relay, relay};

static TOAST_IDS: AtomicUsize = AtomicUsize::new(0);

/// Styling variant of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationVariant {
    #[default]
    Error,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAlert {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Raw technical detail, logged to the console only.
    pub technical_error: String,
    pub auto_dismiss_ms: u32,
    pub variant: NotificationVariant,
}

impl ErrorAlert {
    fn next_id(prefix: &str) -> String {
        format!("{prefix}_{}", TOAST_IDS.fetch_add(1, Ordering::Relaxed))
    }

    /// A user-input condition: the operation did not proceed, nothing else
    /// changed.
    pub fn advisory(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: Self::next_id("advisory"),
            title: "Nothing sent".to_owned(),
            technical_error: message.clone(),
            message,
            auto_dismiss_ms: 4000,
            variant: NotificationVariant::Info,
        }
    }

    pub fn upload_error(filename: &str, error: String) -> Self {
        Self {
            id: Self::next_id("upload_error"),
            title: "Upload failed".to_owned(),
            message: format!("{filename}: {}", make_error_user_friendly(&error)),
            technical_error: format!("Upload of {filename} failed: {error}"),
            auto_dismiss_ms: 6000,
            variant: NotificationVariant::Error,
        }
    }

    pub fn backend_error(operation: &str, error: String) -> Self {
        Self {
            id: Self::next_id("backend_error"),
            title: format!("{operation} failed"),
            message: make_error_user_friendly(&error),
            technical_error: format!("{operation} failed: {error}"),
            auto_dismiss_ms: 6000,
            variant: NotificationVariant::Error,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: Self::next_id("success"),
            title: title.into(),
            technical_error: message.clone(),
            message,
            auto_dismiss_ms: 4000,
            variant: NotificationVariant::Success,
        }
    }

    /// Presentation feedback after a filter run.
    pub fn filter_summary(summary: shared::FilterSummary) -> Self {
        let message = format!(
            "{} signals selected, {} excluded",
            summary.included, summary.excluded
        );
        Self {
            id: Self::next_id("filter"),
            title: "Filter applied".to_owned(),
            technical_error: message.clone(),
            message,
            auto_dismiss_ms: 4000,
            variant: NotificationVariant::Info,
        }
    }
}

pub fn make_error_user_friendly(error: &str) -> String {
    let lower = error.to_lowercase();
    if lower.contains("failed to fetch") || lower.contains("network") || lower.contains("connection")
    {
        "Cannot reach the visualization service. Is it running?".to_owned()
    } else if lower.contains("timeout") {
        "The request timed out. Please try again.".to_owned()
    } else {
        error.trim().to_owned()
    }
}

/// Toast stack domain.
#[derive(Clone)]
pub struct ErrorDisplay {
    pub active_toasts: ActorVec<ErrorAlert>,
    pub toast_added_relay: Relay<ErrorAlert>,
    pub toast_dismissed_relay: Relay<String>,
}

impl ErrorDisplay {
    pub fn new() -> Self {
        let (toast_added_relay, toast_added_stream) = relay::<ErrorAlert>();
        let (toast_dismissed_relay, toast_dismissed_stream) = relay::<String>();

        let active_toasts = ActorVec::new(vec![], async move |toasts| {
            let mut added = toast_added_stream.fuse();
            let mut dismissed = toast_dismissed_stream.fuse();
            loop {
                select! {
                    alert = added.next() => match alert {
                        Some(alert) => {
                            zoon::println!("{}: {}", alert.title, alert.technical_error);
                            toasts.lock_mut().push_cloned(alert);
                        }
                        None => break,
                    },
                    id = dismissed.next() => match id {
                        Some(id) => toasts.lock_mut().retain(|alert| alert.id != id),
                        None => break,
                    },
                }
            }
        });

        Self {
            active_toasts,
            toast_added_relay,
            toast_dismissed_relay,
        }
    }

    pub fn raise(&self, alert: ErrorAlert) {
        self.toast_added_relay.send(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_get_a_friendly_message() {
        assert_eq!(
            make_error_user_friendly("TypeError: Failed to fetch"),
            "Cannot reach the visualization service. Is it running?"
        );
        assert_eq!(make_error_user_friendly("  boom  "), "boom");
    }

    #[test]
    fn alert_ids_are_unique() {
        let first = ErrorAlert::advisory("a");
        let second = ErrorAlert::advisory("a");
        assert_ne!(first.id, second.id);
    }
}
