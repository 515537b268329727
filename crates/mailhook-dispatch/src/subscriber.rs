//! Subscriber registration and capability introspection.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use mailhook_notify::{Notification, NotificationKind, Value};

use crate::error::HandlerError;

/// Outcome of one handler execution.
pub type HandlerResult = std::result::Result<Value, HandlerError>;

/// A boxed handler future.
type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// A registered handler callback.
///
/// Handlers receive the notification payload and the isolated-call flag
/// (always `true`: the handler runs on its own task, not the transport's).
pub(crate) type Handler = Arc<dyn Fn(Notification, bool) -> HandlerFuture + Send + Sync>;

const KIND_COUNT: usize = NotificationKind::ALL.len();

/// A set of named notification handlers, fixed at construction.
///
/// Each notification kind has at most one handler. Registration is
/// builder-style; once the subscriber is handed to a
/// [`Dispatcher`](crate::Dispatcher) the set never changes, so capability
/// introspection and routing need no synchronization.
///
/// Handlers for the four label/star kinds can also be registered under their
/// legacy method names (see
/// [`NotificationKind::legacy_handler_name`]); both spellings bind the same
/// slot.
///
/// # Example
///
/// ```
/// use mailhook_dispatch::{HandlerError, Subscriber};
/// use serde_json::json;
///
/// let subscriber = Subscriber::new()
///     .on_new_email(|notification, _isolated| async move {
///         let id = notification.get("messageId").cloned();
///         id.ok_or_else(|| HandlerError::new("missing messageId"))
///     })
///     .on_new_thread(|_, _| async { Ok(json!({"status": "ok"})) });
///
/// assert_eq!(subscriber.handler_names(), vec!["onNewEmail", "onNewThread"]);
/// ```
#[derive(Default)]
pub struct Subscriber {
    handlers: [Option<Handler>; KIND_COUNT],
}

impl Subscriber {
    /// Creates a subscriber with no handlers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for an arbitrary notification kind.
    ///
    /// The named `on_*` methods delegate here; use this form when the kind
    /// is only known at runtime (e.g. driven by a routing table).
    #[must_use]
    pub fn with_handler<F, Fut>(mut self, kind: NotificationKind, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let boxed: Handler =
            Arc::new(move |notification, isolated| Box::pin(handler(notification, isolated)));
        self.handlers[slot(kind)] = Some(boxed);
        self
    }

    /// Registers the `onMailboxChanges` handler.
    #[must_use]
    pub fn on_mailbox_changes<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::MailboxChanged, handler)
    }

    /// Registers the `onNewEmail` handler.
    #[must_use]
    pub fn on_new_email<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::NewEmail, handler)
    }

    /// Registers the `onNewThread` handler.
    #[must_use]
    pub fn on_new_thread<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::NewThread, handler)
    }

    /// Registers the `onEmailLabelAdded` handler.
    #[must_use]
    pub fn on_email_label_added<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::EmailLabelAdded, handler)
    }

    /// Registers the `onEmailStarred` handler.
    #[must_use]
    pub fn on_email_starred<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::EmailStarred, handler)
    }

    /// Registers the `onEmailLabelRemoved` handler.
    #[must_use]
    pub fn on_email_label_removed<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::EmailLabelRemoved, handler)
    }

    /// Registers the `onEmailStarRemoved` handler.
    #[must_use]
    pub fn on_email_star_removed<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::EmailStarRemoved, handler)
    }

    /// Registers the `onNewAttachment` handler.
    #[must_use]
    pub fn on_new_attachment<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.with_handler(NotificationKind::NewAttachment, handler)
    }

    /// Legacy spelling of [`on_email_label_added`](Self::on_email_label_added).
    #[must_use]
    pub fn on_new_labeled_email<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.on_email_label_added(handler)
    }

    /// Legacy spelling of [`on_email_starred`](Self::on_email_starred).
    #[must_use]
    pub fn on_new_stared_email<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.on_email_starred(handler)
    }

    /// Legacy spelling of [`on_email_label_removed`](Self::on_email_label_removed).
    #[must_use]
    pub fn on_label_removed_email<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.on_email_label_removed(handler)
    }

    /// Legacy spelling of [`on_email_star_removed`](Self::on_email_star_removed).
    #[must_use]
    pub fn on_star_removed_email<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(Notification, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.on_email_star_removed(handler)
    }

    /// Canonical names of the registered handlers, in declared kind order.
    ///
    /// Recomputed on every call. A transport uses this to decide which
    /// notification kinds to subscribe to upstream.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.kinds().into_iter().map(NotificationKind::handler_name).collect()
    }

    /// Kinds with a registered handler, in declared order.
    #[must_use]
    pub fn kinds(&self) -> Vec<NotificationKind> {
        NotificationKind::ALL
            .into_iter()
            .filter(|kind| self.handlers[slot(*kind)].is_some())
            .collect()
    }

    /// Returns true if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.iter().all(Option::is_none)
    }

    /// The handler registered for a kind, if any.
    pub(crate) fn handler(&self, kind: NotificationKind) -> Option<Handler> {
        self.handlers[slot(kind)].clone()
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

/// Slot of a kind in the handler table: its position in declared order.
fn slot(kind: NotificationKind) -> usize {
    NotificationKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok_handler(
        _notification: Notification,
        _isolated: bool,
    ) -> impl Future<Output = HandlerResult> {
        async { Ok(json!(null)) }
    }

    mod capability_tests {
        use super::*;

        #[test]
        fn empty_subscriber_has_no_names() {
            let subscriber = Subscriber::new();
            assert!(subscriber.is_empty());
            assert!(subscriber.handler_names().is_empty());
        }

        #[test]
        fn names_follow_declared_order_not_registration_order() {
            let subscriber = Subscriber::new()
                .on_new_attachment(ok_handler)
                .on_mailbox_changes(ok_handler);
            assert_eq!(
                subscriber.handler_names(),
                vec!["onMailboxChanges", "onNewAttachment"]
            );
        }

        #[test]
        fn two_handlers_report_two_names() {
            let subscriber = Subscriber::new()
                .on_new_email(ok_handler)
                .on_new_thread(ok_handler);
            assert_eq!(subscriber.handler_names(), vec!["onNewEmail", "onNewThread"]);
            assert_eq!(
                subscriber.kinds(),
                vec![NotificationKind::NewEmail, NotificationKind::NewThread]
            );
        }

        #[test]
        fn legacy_registration_reports_canonical_name() {
            let subscriber = Subscriber::new().on_new_stared_email(ok_handler);
            assert_eq!(subscriber.handler_names(), vec!["onEmailStarred"]);
        }
    }

    mod registration_tests {
        use super::*;

        #[test]
        fn re_registering_replaces_the_handler() {
            let subscriber = Subscriber::new()
                .on_new_email(|_, _| async { Ok(json!("first")) })
                .on_new_email(|_, _| async { Ok(json!("second")) });
            assert_eq!(subscriber.handler_names(), vec!["onNewEmail"]);
        }

        #[test]
        fn handler_lookup_misses_unregistered_kind() {
            let subscriber = Subscriber::new().on_new_email(ok_handler);
            assert!(subscriber.handler(NotificationKind::NewThread).is_none());
            assert!(subscriber.handler(NotificationKind::NewEmail).is_some());
        }

        #[tokio::test]
        async fn registered_handler_receives_payload_and_flag() {
            let subscriber = Subscriber::new().on_new_email(|notification, isolated| async move {
                assert!(isolated);
                Ok(notification.get("messageId").cloned().unwrap_or(json!(null)))
            });
            let handler = subscriber.handler(NotificationKind::NewEmail).unwrap();
            let payload = Notification::new().with_field("messageId", json!("m-7"));
            let result = handler(payload, true).await.unwrap();
            assert_eq!(result, json!("m-7"));
        }
    }
}
