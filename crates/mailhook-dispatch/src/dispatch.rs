//! Notification routing and the asynchronous invocation engine.
//!
//! The dispatcher exposes one entry point per notification kind. Each entry
//! point schedules the subscriber's handler on its own tokio task and returns
//! a [`PendingResult`] immediately; the transport that delivered the
//! notification is never blocked and never sees a handler failure as a
//! panic or synchronous error. The outcome - the handler's value, or the
//! wrapped failure - arrives exclusively through the returned future.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::{Instrument, debug, debug_span, warn};

use mailhook_notify::{Notification, NotificationKind};

use crate::error::{DispatchError, DispatchResult, HandlerError};
use crate::identity::ModuleIdentity;
use crate::subscriber::Subscriber;

/// Handlers always run isolated from the dispatching context.
const ISOLATED_CALL: bool = true;

/// Routes mailbox notifications to a subscriber's handlers.
///
/// The subscriber is bound once at construction and shared read-only across
/// all in-flight invocations; the dispatcher imposes no serialization between
/// them. If a handler needs exclusive access to some state, that is the
/// handler's concern.
///
/// # Example
///
/// ```
/// use mailhook_dispatch::{Dispatcher, ModuleIdentity, Notification, Subscriber};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let subscriber = Subscriber::new()
///     .on_new_email(|_, _| async { Ok(json!({"status": "ok"})) });
/// let dispatcher = Dispatcher::new(
///     subscriber,
///     ModuleIdentity::new("googleapis", "gmail", "2.0.0"),
/// );
///
/// let pending = dispatcher.notify_new_email(Notification::new());
/// assert_eq!(pending.await.unwrap(), json!({"status": "ok"}));
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    subscriber: Arc<Subscriber>,
    identity: ModuleIdentity,
}

impl Dispatcher {
    /// Binds a subscriber and a diagnostic identity.
    #[must_use]
    pub fn new(subscriber: Subscriber, identity: ModuleIdentity) -> Self {
        Self {
            subscriber: Arc::new(subscriber),
            identity,
        }
    }

    /// Canonical names of the bound subscriber's handlers.
    ///
    /// Recomputed on every call; see [`Subscriber::handler_names`].
    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.subscriber.handler_names()
    }

    /// Kinds the bound subscriber handles.
    #[must_use]
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.subscriber.kinds()
    }

    /// Dispatches a mailbox-changed notification (`onMailboxChanges`).
    pub fn notify_mailbox_changes(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::MailboxChanged, notification)
    }

    /// Dispatches a new-email notification (`onNewEmail`).
    pub fn notify_new_email(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::NewEmail, notification)
    }

    /// Dispatches a new-thread notification (`onNewThread`).
    pub fn notify_new_thread(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::NewThread, notification)
    }

    /// Dispatches a label-added notification (`onEmailLabelAdded`).
    pub fn notify_email_label_added(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::EmailLabelAdded, notification)
    }

    /// Dispatches a starred notification (`onEmailStarred`).
    pub fn notify_email_starred(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::EmailStarred, notification)
    }

    /// Dispatches a label-removed notification (`onEmailLabelRemoved`).
    pub fn notify_email_label_removed(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::EmailLabelRemoved, notification)
    }

    /// Dispatches a star-removed notification (`onEmailStarRemoved`).
    pub fn notify_email_star_removed(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::EmailStarRemoved, notification)
    }

    /// Dispatches a new-attachment notification (`onNewAttachment`).
    pub fn notify_new_attachment(&self, notification: Notification) -> PendingResult {
        self.dispatch(NotificationKind::NewAttachment, notification)
    }

    /// Schedules the handler for `kind` and returns without waiting for it.
    ///
    /// The returned [`PendingResult`] completes exactly once:
    /// - with the handler's value on success;
    /// - with the wrapped failure if the handler fails, if no handler is
    ///   registered for `kind`, or if the handler task dies before
    ///   delivering an outcome.
    ///
    /// Dropping the `PendingResult` does not cancel the handler; the
    /// invocation runs to completion and its outcome is discarded.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, kind: NotificationKind, notification: Notification) -> PendingResult {
        let (sender, receiver) = oneshot::channel();

        let span = debug_span!(
            "handler_invocation",
            organization = %self.identity.organization(),
            module = %self.identity.name(),
            version = %self.identity.version(),
            entry_point = kind.entry_point(),
            handler = kind.handler_name(),
        );

        match self.subscriber.handler(kind) {
            Some(handler) => {
                tokio::spawn(
                    async move {
                        debug!("invoking handler");
                        let outcome = handler(notification, ISOLATED_CALL)
                            .await
                            .map_err(DispatchError::new);
                        if let Err(error) = &outcome {
                            warn!(%error, "handler failed");
                        }
                        // Receiver may already be dropped; the outcome is
                        // then intentionally discarded.
                        let _ = sender.send(outcome);
                    }
                    .instrument(span),
                );
            }
            None => {
                let _guard = span.enter();
                let error = DispatchError::new(HandlerError::new(format!(
                    "no handler registered for {}",
                    kind.handler_name()
                )));
                warn!(%error, "dispatch without handler");
                let _ = sender.send(Err(error));
            }
        }

        PendingResult { receiver }
    }
}

/// The pending outcome of one handler invocation.
///
/// Backed by a oneshot channel, so completion is single-shot by
/// construction: the invocation task owns the only sender and sends exactly
/// one outcome. If the task dies without sending (a panicking handler),
/// awaiting resolves to the same wrapped failure shape instead of hanging.
#[derive(Debug)]
pub struct PendingResult {
    receiver: oneshot::Receiver<DispatchResult>,
}

impl Future for PendingResult {
    type Output = DispatchResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(DispatchError::new(HandlerError::new(
                "handler task terminated before delivering a result",
            )))),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dispatcher_with(subscriber: Subscriber) -> Dispatcher {
        Dispatcher::new(subscriber, ModuleIdentity::new("test-org", "mailhook", "0.1.0"))
    }

    #[tokio::test]
    async fn dispatch_resolves_with_handler_value() {
        let dispatcher = dispatcher_with(
            Subscriber::new().on_new_email(|_, _| async { Ok(json!({"seen": 1})) }),
        );
        let value = dispatcher
            .notify_new_email(Notification::new())
            .await
            .unwrap();
        assert_eq!(value, json!({"seen": 1}));
    }

    #[tokio::test]
    async fn dispatch_forwards_payload_unmodified() {
        let dispatcher = dispatcher_with(Subscriber::new().on_new_thread(
            |notification, _| async move { Ok(serde_json::to_value(&notification).unwrap_or(json!(null))) },
        ));
        let payload = Notification::new()
            .with_field("threadId", json!("t-1"))
            .with_field("historyId", json!("99"));
        let value = dispatcher.notify_new_thread(payload).await.unwrap();
        assert_eq!(value, json!({"threadId": "t-1", "historyId": "99"}));
    }

    #[tokio::test]
    async fn missing_handler_resolves_with_wrapped_error() {
        let dispatcher = dispatcher_with(Subscriber::new());
        let error = dispatcher
            .notify_new_attachment(Notification::new())
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "service method invocation failed: no handler registered for onNewAttachment"
        );
    }

    #[tokio::test]
    async fn panicking_handler_resolves_with_wrapped_error() {
        let dispatcher = dispatcher_with(
            Subscriber::new().on_new_email(|_, _| async { panic!("handler blew up") }),
        );
        let error = dispatcher
            .notify_new_email(Notification::new())
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "service method invocation failed: handler task terminated before delivering a result"
        );
    }

    #[tokio::test]
    async fn pending_result_stays_pending_until_the_handler_finishes() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let handler_gate = Arc::clone(&gate);
        let dispatcher = dispatcher_with(Subscriber::new().on_new_email(move |_, _| {
            let gate = Arc::clone(&handler_gate);
            async move {
                gate.notified().await;
                Ok(json!("done"))
            }
        }));

        let mut pending = tokio_test::task::spawn(dispatcher.notify_new_email(Notification::new()));
        tokio::task::yield_now().await;
        assert!(pending.poll().is_pending());

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), json!("done"));
    }

    #[tokio::test]
    async fn dropping_pending_result_does_not_cancel_the_handler() {
        let (done_tx, done_rx) = oneshot::channel();
        let done_tx = std::sync::Mutex::new(Some(done_tx));
        let dispatcher = dispatcher_with(Subscriber::new().on_new_email(move |_, _| {
            let sent = done_tx.lock().ok().and_then(|mut tx| tx.take());
            async move {
                if let Some(tx) = sent {
                    let _ = tx.send(());
                }
                Ok(json!(null))
            }
        }));

        drop(dispatcher.notify_new_email(Notification::new()));
        done_rx.await.unwrap();
    }
}
